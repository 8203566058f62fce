//! Chat transport abstraction
//!
//! Handlers only talk to the chat service through [`ChatTransport`], which
//! keeps them testable without network access.

use crate::error::BotResult;
use async_trait::async_trait;

pub type ChatId = i64;
pub type MessageId = i64;

/// File uploaded along with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send plain text, optionally as a reply; returns the new message id
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> BotResult<MessageId>;

    /// Send an image with an HTML caption
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: Attachment,
        caption_html: &str,
    ) -> BotResult<MessageId>;

    async fn send_document(&self, chat_id: ChatId, document: Attachment) -> BotResult<MessageId>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> BotResult<()>;

    async fn set_webhook(&self, url: &str) -> BotResult<()>;

    async fn delete_webhook(&self) -> BotResult<()>;
}
