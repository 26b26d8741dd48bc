pub mod message_models;
pub mod message_dto;
pub mod conversation;
pub mod message_repository;
pub mod message_handlers;
pub mod message_service;

pub use conversation::{aggregate_conversations, apply_read_receipt, Conversation};
pub use message_models::{Message, MessageView};
pub use message_repository::MessageRepository;
pub use message_service::MessageService;
