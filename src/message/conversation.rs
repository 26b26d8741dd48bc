use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::message_models::{GroupListItem, Message, MessageView};
use crate::user::UserSummary;

/// The direct-message thread between the current user and one partner.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Conversation {
    pub partner: UserSummary,
    pub last_message: Message,
    /// Messages from the partner the current user has not read.
    pub unread_count: i64,
}

impl Conversation {
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message.created_at
    }
}

/// Folds the user's direct messages into one entry per partner.
///
/// Input order does not matter. Messages whose partner cannot be resolved
/// (deleted receiver, missing profile) are skipped, as are group messages.
/// The result is unordered.
pub fn aggregate_conversations(user_id: Uuid, messages: Vec<MessageView>) -> Vec<Conversation> {
    let mut conversations: HashMap<Uuid, Conversation> = HashMap::new();

    for view in messages {
        if !view.message.is_direct() {
            continue;
        }

        let sent_by_user = view.message.sender_id == user_id;
        let (partner_id, partner) = if sent_by_user {
            (view.message.receiver_id, view.receiver)
        } else {
            (Some(view.message.sender_id), view.sender)
        };
        let (Some(partner_id), Some(partner)) = (partner_id, partner) else {
            continue;
        };

        let unread = i64::from(!sent_by_user && !view.message.is_read);

        match conversations.get_mut(&partner_id) {
            Some(conversation) => {
                if view.message.created_at > conversation.last_message.created_at {
                    conversation.last_message = view.message;
                }
                conversation.unread_count += unread;
            }
            None => {
                conversations.insert(
                    partner_id,
                    Conversation {
                        partner,
                        last_message: view.message,
                        unread_count: unread,
                    },
                );
            }
        }
    }

    conversations.into_values().collect()
}

/// Most recent conversation first.
pub fn sort_by_recency(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
}

/// Marks every message `partner_id` sent to `user_id` as read and returns the
/// ids that changed, which are the only rows the store then updates. Applying
/// it twice changes nothing the second time.
pub fn apply_read_receipt<'a, I>(user_id: Uuid, partner_id: Uuid, messages: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = &'a mut Message>,
{
    let mut flipped = Vec::new();
    for message in messages {
        if message.sender_id == partner_id
            && message.receiver_id == Some(user_id)
            && !message.is_read
        {
            message.is_read = true;
            flipped.push(message.id);
        }
    }
    flipped
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Inbox {
    pub conversations: Vec<Conversation>,
    pub groups: Vec<GroupListItem>,
    /// Unread direct messages across every conversation, filtered or not.
    pub total_unread: i64,
}

/// Applies the optional case-insensitive name filter to partners and groups.
pub fn build_inbox(
    conversations: Vec<Conversation>,
    groups: Vec<GroupListItem>,
    search: Option<&str>,
) -> Inbox {
    let total_unread = conversations.iter().map(|c| c.unread_count).sum();
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let (conversations, groups) = match needle {
        Some(needle) => (
            conversations
                .into_iter()
                .filter(|c| c.partner.name.to_lowercase().contains(&needle))
                .collect(),
            groups
                .into_iter()
                .filter(|g| g.name.to_lowercase().contains(&needle))
                .collect(),
        ),
        None => (conversations, groups),
    };

    Inbox {
        conversations,
        groups,
        total_unread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    struct Fixture {
        a: UserSummary,
        b: UserSummary,
        c: UserSummary,
        epoch: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            let profile = |name: &str| UserSummary {
                id: Uuid::new_v4(),
                name: name.into(),
                image: None,
            };
            Self {
                a: profile("Alice"),
                b: profile("Bob"),
                c: profile("Carol"),
                epoch: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            }
        }

        fn direct(&self, from: &UserSummary, to: &UserSummary, t: i64, is_read: bool) -> MessageView {
            MessageView {
                message: Message {
                    id: Uuid::new_v4(),
                    content: format!("{} -> {} at {}", from.name, to.name, t),
                    sender_id: from.id,
                    receiver_id: Some(to.id),
                    group_id: None,
                    is_read,
                    created_at: self.epoch + Duration::seconds(t),
                },
                sender: Some(from.clone()),
                receiver: Some(to.clone()),
            }
        }
    }

    fn find<'a>(conversations: &'a [Conversation], partner: &UserSummary) -> &'a Conversation {
        conversations
            .iter()
            .find(|c| c.partner.id == partner.id)
            .expect("conversation for partner")
    }

    #[test]
    fn test_single_partner_example() {
        let f = Fixture::new();
        let messages = vec![
            f.direct(&f.a, &f.b, 1, false),
            f.direct(&f.b, &f.a, 2, false),
            f.direct(&f.b, &f.a, 3, true),
        ];

        let conversations = aggregate_conversations(f.a.id, messages);

        assert_eq!(conversations.len(), 1);
        let conversation = &conversations[0];
        assert_eq!(conversation.partner, f.b);
        assert_eq!(conversation.last_message.created_at, f.epoch + Duration::seconds(3));
        assert_eq!(conversation.unread_count, 1);
    }

    #[test]
    fn test_last_message_independent_of_input_order() {
        let f = Fixture::new();
        let ordered = vec![
            f.direct(&f.a, &f.b, 1, false),
            f.direct(&f.b, &f.a, 5, false),
            f.direct(&f.a, &f.b, 3, false),
        ];
        let latest_id = ordered[1].message.id;

        let mut reversed = ordered.clone();
        reversed.reverse();
        let mut shuffled = ordered.clone();
        shuffled.swap(0, 1);

        for input in [ordered, reversed, shuffled] {
            let conversations = aggregate_conversations(f.a.id, input);
            assert_eq!(conversations.len(), 1);
            assert_eq!(conversations[0].last_message.id, latest_id);
            assert_eq!(conversations[0].unread_count, 1);
        }
    }

    #[test]
    fn test_one_entry_per_partner() {
        let f = Fixture::new();
        let messages = vec![
            f.direct(&f.a, &f.b, 1, true),
            f.direct(&f.c, &f.a, 2, false),
            f.direct(&f.b, &f.a, 3, false),
            f.direct(&f.c, &f.a, 4, false),
            f.direct(&f.a, &f.c, 5, false),
        ];

        let conversations = aggregate_conversations(f.a.id, messages);

        assert_eq!(conversations.len(), 2);
        assert_eq!(find(&conversations, &f.b).unread_count, 1);
        let with_carol = find(&conversations, &f.c);
        assert_eq!(with_carol.unread_count, 2);
        assert_eq!(with_carol.last_message.sender_id, f.a.id);
    }

    #[test]
    fn test_own_unread_messages_are_not_counted() {
        let f = Fixture::new();
        let messages = vec![
            f.direct(&f.a, &f.b, 1, false),
            f.direct(&f.a, &f.b, 2, false),
        ];

        let conversations = aggregate_conversations(f.a.id, messages);
        assert_eq!(conversations[0].unread_count, 0);
    }

    #[test]
    fn test_equal_timestamps_keep_first_seen() {
        let f = Fixture::new();
        let first = f.direct(&f.b, &f.a, 7, true);
        let second = f.direct(&f.a, &f.b, 7, true);
        let first_id = first.message.id;

        let conversations = aggregate_conversations(f.a.id, vec![first, second]);
        assert_eq!(conversations[0].last_message.id, first_id);
    }

    #[test]
    fn test_unresolvable_partners_are_skipped() {
        let f = Fixture::new();

        let mut deleted_receiver = f.direct(&f.a, &f.b, 1, false);
        deleted_receiver.message.receiver_id = None;
        deleted_receiver.receiver = None;

        let mut missing_profile = f.direct(&f.c, &f.a, 2, false);
        missing_profile.sender = None;

        let mut group_message = f.direct(&f.b, &f.a, 3, false);
        group_message.message.group_id = Some(Uuid::new_v4());

        let conversations =
            aggregate_conversations(f.a.id, vec![deleted_receiver, missing_profile, group_message]);
        assert!(conversations.is_empty());
    }

    #[test]
    fn test_sort_by_recency() {
        let f = Fixture::new();
        let messages = vec![
            f.direct(&f.a, &f.b, 10, true),
            f.direct(&f.c, &f.a, 20, true),
        ];

        let mut conversations = aggregate_conversations(f.a.id, messages);
        sort_by_recency(&mut conversations);

        assert_eq!(conversations[0].partner, f.c);
        assert_eq!(conversations[1].partner, f.b);
    }

    #[test]
    fn test_read_receipt_flips_only_partner_messages() {
        let f = Fixture::new();
        let mut messages: Vec<Message> = vec![
            f.direct(&f.a, &f.b, 1, false),
            f.direct(&f.b, &f.a, 2, false),
            f.direct(&f.c, &f.a, 3, false),
            f.direct(&f.b, &f.a, 4, false),
        ]
        .into_iter()
        .map(|v| v.message)
        .collect();

        let expected = vec![messages[1].id, messages[3].id];
        let flipped = apply_read_receipt(f.a.id, f.b.id, messages.iter_mut());

        assert_eq!(flipped, expected);
        let read: Vec<bool> = messages.iter().map(|m| m.is_read).collect();
        assert_eq!(read, vec![false, true, false, true]);
    }

    #[test]
    fn test_read_receipt_is_idempotent() {
        let f = Fixture::new();
        let mut messages: Vec<Message> = vec![
            f.direct(&f.b, &f.a, 1, false),
            f.direct(&f.b, &f.a, 2, true),
        ]
        .into_iter()
        .map(|v| v.message)
        .collect();

        assert_eq!(apply_read_receipt(f.a.id, f.b.id, messages.iter_mut()).len(), 1);
        let after_first = messages.clone();
        assert!(apply_read_receipt(f.a.id, f.b.id, messages.iter_mut()).is_empty());
        assert_eq!(messages, after_first);
    }

    #[test]
    fn test_read_receipt_leaves_reverse_direction_unread() {
        let f = Fixture::new();
        // B has not opened the thread, so A's message to B stays unread
        let mut messages: Vec<Message> = vec![
            f.direct(&f.a, &f.b, 1, false),
            f.direct(&f.b, &f.a, 2, false),
        ]
        .into_iter()
        .map(|v| v.message)
        .collect();
        let b_to_a = messages[1].id;

        let flipped = apply_read_receipt(f.a.id, f.b.id, messages.iter_mut());

        assert_eq!(flipped, vec![b_to_a]);
        assert!(!messages[0].is_read);
    }

    #[test]
    fn test_read_receipt_then_aggregate_has_no_unread() {
        let f = Fixture::new();
        let mut views = vec![
            f.direct(&f.b, &f.a, 1, false),
            f.direct(&f.b, &f.a, 2, false),
        ];
        apply_read_receipt(f.a.id, f.b.id, views.iter_mut().map(|v| &mut v.message));

        let conversations = aggregate_conversations(f.a.id, views);
        assert_eq!(conversations[0].unread_count, 0);
    }

    #[test]
    fn test_inbox_filter_keeps_total_unread() {
        let f = Fixture::new();
        let conversations = aggregate_conversations(
            f.a.id,
            vec![
                f.direct(&f.b, &f.a, 1, false),
                f.direct(&f.c, &f.a, 2, false),
                f.direct(&f.c, &f.a, 3, false),
            ],
        );
        let groups = vec![GroupListItem {
            id: Uuid::new_v4(),
            name: "Cohort Bravo".into(),
            program_id: None,
            member_count: 3,
            last_message: None,
            last_message_at: None,
            updated_at: f.epoch,
        }];

        let inbox = build_inbox(conversations, groups, Some("  BO "));

        assert_eq!(inbox.total_unread, 3);
        assert_eq!(inbox.conversations.len(), 1);
        assert_eq!(inbox.conversations[0].partner, f.b);
        assert!(inbox.groups.is_empty());
    }

    #[test]
    fn test_inbox_blank_search_keeps_everything() {
        let f = Fixture::new();
        let conversations = aggregate_conversations(f.a.id, vec![f.direct(&f.b, &f.a, 1, true)]);

        let inbox = build_inbox(conversations, Vec::new(), Some("   "));
        assert_eq!(inbox.conversations.len(), 1);
        assert_eq!(inbox.total_unread, 0);
    }
}
