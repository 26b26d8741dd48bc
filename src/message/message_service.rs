use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::message::conversation::{
    aggregate_conversations, apply_read_receipt, build_inbox, sort_by_recency, Conversation, Inbox,
};
use crate::message::message_dto::{CreateGroupRequest, SendMessageRequest};
use crate::message::message_models::{GroupListItem, Message, MessageGroup, MessageView};
use crate::message::message_repository::MessageRepository;
use crate::user::UserRepository;
use uuid::Uuid;

/// Where a new message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    Direct(Uuid),
    Group(Uuid),
}

pub fn resolve_target(receiver_id: Option<Uuid>, group_id: Option<Uuid>) -> Result<MessageTarget> {
    match (receiver_id, group_id) {
        (Some(receiver_id), None) => Ok(MessageTarget::Direct(receiver_id)),
        (None, Some(group_id)) => Ok(MessageTarget::Group(group_id)),
        _ => Err(AppError::Validation(
            "Either receiver_id or group_id is required, but not both".into(),
        )),
    }
}

/// Creator first, then the requested members in order, without duplicates.
pub fn group_member_ids(created_by: Uuid, member_ids: &[Uuid]) -> Vec<Uuid> {
    let mut members = vec![created_by];
    for id in member_ids {
        if !members.contains(id) {
            members.push(*id);
        }
    }
    members
}

#[derive(Clone)]
pub struct MessageService {
    db: DbPool,
    repo: MessageRepository,
    user_repo: UserRepository,
}

impl MessageService {
    pub fn new(db: DbPool, repo: MessageRepository, user_repo: UserRepository) -> Self {
        Self { db, repo, user_repo }
    }

    pub async fn send_message(&self, sender_id: Uuid, payload: SendMessageRequest) -> Result<Message> {
        let content = payload.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Message content is required".into()));
        }

        match resolve_target(payload.receiver_id, payload.group_id)? {
            MessageTarget::Direct(receiver_id) => {
                if receiver_id == sender_id {
                    return Err(AppError::BadRequest("Cannot send a message to yourself".into()));
                }
                self.user_repo
                    .find_by_id(receiver_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Receiver not found".into()))?;

                self.repo.create_direct(sender_id, receiver_id, content).await
            }
            MessageTarget::Group(group_id) => {
                self.ensure_member(group_id, sender_id).await?;
                self.repo.create_group_message(sender_id, group_id, content).await
            }
        }
    }

    /// Conversations with every direct-message partner, most recent first.
    pub async fn get_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>> {
        let messages = self.repo.find_direct_messages(user_id).await?;
        let mut conversations = aggregate_conversations(user_id, messages);
        sort_by_recency(&mut conversations);
        Ok(conversations)
    }

    /// The thread with `partner_id`, oldest first. Opening it marks the
    /// partner's messages as read, and the returned thread reflects that.
    pub async fn open_conversation(&self, user_id: Uuid, partner_id: Uuid) -> Result<Vec<MessageView>> {
        let (thread, _) = self.read_thread(user_id, partner_id).await?;
        Ok(thread)
    }

    pub async fn mark_conversation_read(&self, user_id: Uuid, partner_id: Uuid) -> Result<u64> {
        let (_, marked) = self.read_thread(user_id, partner_id).await?;
        Ok(marked)
    }

    /// Loads the thread, applies the read receipt and persists the flipped ids.
    async fn read_thread(&self, user_id: Uuid, partner_id: Uuid) -> Result<(Vec<MessageView>, u64)> {
        let mut thread = self.repo.find_conversation(user_id, partner_id).await?;

        let flipped = apply_read_receipt(user_id, partner_id, thread.iter_mut().map(|v| &mut v.message));
        if flipped.is_empty() {
            return Ok((thread, 0));
        }

        let marked = self.repo.mark_ids_as_read(&flipped).await?;
        tracing::debug!("Marked {} messages from {} as read for {}", marked, partner_id, user_id);

        Ok((thread, marked))
    }

    /// Only the receiver may mark a message read.
    pub async fn mark_read(&self, user_id: Uuid, message_id: Uuid) -> Result<()> {
        let message = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

        if message.receiver_id != Some(user_id) {
            return Err(AppError::Forbidden("Only the receiver can mark a message as read".into()));
        }

        if !message.is_read {
            self.repo.mark_ids_as_read(&[message_id]).await?;
        }
        Ok(())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.count_unread(user_id).await
    }

    pub async fn get_group_messages(&self, user_id: Uuid, group_id: Uuid) -> Result<Vec<MessageView>> {
        self.ensure_member(group_id, user_id).await?;
        self.repo.find_group_messages(group_id).await
    }

    pub async fn create_group(&self, created_by: Uuid, payload: CreateGroupRequest) -> Result<MessageGroup> {
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Group name is required".into()));
        }

        let members = group_member_ids(created_by, &payload.member_ids);
        let found = self.user_repo.count_existing(&members).await?;
        if found != members.len() as i64 {
            return Err(AppError::NotFound("One or more members not found".into()));
        }

        let mut tx = self.db.begin().await?;
        let group = self
            .repo
            .create_group_with_tx(&mut tx, name, payload.program_id, created_by)
            .await?;
        self.repo.add_members_with_tx(&mut tx, group.id, &members).await?;
        tx.commit().await?;

        tracing::info!("Group {} created by {} with {} members", group.id, created_by, members.len());
        Ok(group)
    }

    pub async fn list_groups(&self, user_id: Uuid) -> Result<Vec<GroupListItem>> {
        self.repo.find_groups_for_user(user_id).await
    }

    pub async fn inbox(&self, user_id: Uuid, search: Option<&str>) -> Result<Inbox> {
        let conversations = self.get_conversations(user_id).await?;
        let groups = self.repo.find_groups_for_user(user_id).await?;
        Ok(build_inbox(conversations, groups, search))
    }

    async fn ensure_member(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
        if !self.repo.is_group_member(group_id, user_id).await? {
            return Err(AppError::Forbidden("You are not a member of this group".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_target_requires_exactly_one() {
        let receiver = Uuid::new_v4();
        let group = Uuid::new_v4();

        assert_eq!(
            resolve_target(Some(receiver), None).unwrap(),
            MessageTarget::Direct(receiver)
        );
        assert_eq!(
            resolve_target(None, Some(group)).unwrap(),
            MessageTarget::Group(group)
        );
        assert_eq!(
            resolve_target(None, None).unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            resolve_target(Some(receiver), Some(group)).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_group_members_include_creator_once() {
        let creator = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();

        let members = group_member_ids(creator, &[bob, creator, carol, bob]);
        assert_eq!(members, vec![creator, bob, carol]);
    }
}
