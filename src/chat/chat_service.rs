use crate::chat::assistant::AssistantClient;
use crate::chat::chat_dto::SendChatMessageRequest;
use crate::chat::chat_models::{session_title, ChatExchange, ChatMessage, ChatSession};
use crate::chat::chat_repository::ChatRepository;
use crate::error::{AppError, Result};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    assistant: AssistantClient,
}

impl ChatService {
    pub fn new(repo: ChatRepository, assistant: AssistantClient) -> Self {
        Self { repo, assistant }
    }

    /// Asks the assistant and stores both sides of the exchange.
    pub async fn send_message(&self, user_id: Uuid, payload: SendChatMessageRequest) -> Result<ChatExchange> {
        let content = payload.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Message content is required".into()));
        }

        let existing = match payload.session_id {
            Some(session_id) => Some(self.owned_session(user_id, session_id).await?),
            None => None,
        };

        let reply = self.assistant.reply(content).await;

        let mut tx = self.repo.begin().await?;
        let session_id = match existing {
            Some(session) => {
                self.repo.touch_session_with_tx(&mut tx, session.id).await?;
                session.id
            }
            None => {
                self.repo
                    .create_session_with_tx(&mut tx, user_id, &session_title(content))
                    .await?
                    .id
            }
        };
        let question = self
            .repo
            .create_message_with_tx(&mut tx, session_id, content, true)
            .await?;
        let answer = self
            .repo
            .create_message_with_tx(&mut tx, session_id, &reply, false)
            .await?;
        tx.commit().await?;

        Ok(ChatExchange {
            session_id,
            messages: vec![question, answer],
        })
    }

    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<ChatSession>> {
        self.repo.find_sessions_by_user(user_id).await
    }

    pub async fn list_messages(&self, user_id: Uuid, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        self.owned_session(user_id, session_id).await?;
        self.repo.find_messages(session_id).await
    }

    /// Another user's session is reported as missing.
    async fn owned_session(&self, user_id: Uuid, session_id: Uuid) -> Result<ChatSession> {
        self.repo
            .find_session(session_id)
            .await?
            .filter(|session| session.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Chat session not found".into()))
    }
}
