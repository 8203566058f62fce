//! Telegram Bot API via REST (no SDK dependency)
//!
//! Only the handful of methods the bot needs: text replies, photo and
//! document uploads, message deletion and webhook management.

use crate::error::{BotError, BotResult};
use crate::transport::{Attachment, ChatId, ChatTransport, MessageId};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

/// Incoming webhook update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: MessageId,
}

/// Bot API client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    /// `{api_url}/bot{token}`
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Send a prepared request and unwrap the `{ok, result}` envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> BotResult<T> {
        let resp: ApiResponse<T> = request.send().await?.json().await?;
        match (resp.ok, resp.result) {
            (true, Some(result)) => {
                debug!(method, "Telegram call succeeded");
                Ok(result)
            }
            _ => Err(BotError::Api {
                method,
                description: resp
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: serde_json::Value,
    ) -> BotResult<T> {
        let request = self.http.post(self.method_url(method)).json(&body);
        self.call(method, request).await
    }

    async fn call_multipart<T: DeserializeOwned>(
        &self,
        method: &'static str,
        form: Form,
    ) -> BotResult<T> {
        let request = self.http.post(self.method_url(method)).multipart(form);
        self.call(method, request).await
    }
}

fn file_part(attachment: Attachment, mime: &str) -> BotResult<Part> {
    Ok(Part::bytes(attachment.bytes)
        .file_name(attachment.file_name)
        .mime_str(mime)?)
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    #[instrument(skip(self, text))]
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> BotResult<MessageId> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(message_id) = reply_to {
            body["reply_parameters"] = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }
        let sent: SentMessage = self.call_json("sendMessage", body).await?;
        Ok(sent.message_id)
    }

    #[instrument(skip(self, photo, caption_html), fields(file_name = %photo.file_name))]
    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: Attachment,
        caption_html: &str,
    ) -> BotResult<MessageId> {
        let mime = mime_for(&photo.file_name);
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption_html.to_string())
            .text("parse_mode", "HTML")
            .part("photo", file_part(photo, mime)?);
        let sent: SentMessage = self.call_multipart("sendPhoto", form).await?;
        Ok(sent.message_id)
    }

    #[instrument(skip(self, document), fields(file_name = %document.file_name, bytes = document.bytes.len()))]
    async fn send_document(&self, chat_id: ChatId, document: Attachment) -> BotResult<MessageId> {
        let mime = mime_for(&document.file_name);
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", file_part(document, mime)?);
        let sent: SentMessage = self.call_multipart("sendDocument", form).await?;
        Ok(sent.message_id)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> BotResult<()> {
        let _: bool = self
            .call_json(
                "deleteMessage",
                json!({ "chat_id": chat_id, "message_id": message_id }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_webhook(&self, url: &str) -> BotResult<()> {
        let _: bool = self.call_json("setWebhook", json!({ "url": url })).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_webhook(&self) -> BotResult<()> {
        let _: bool = self.call_json("deleteWebhook", json!({})).await?;
        Ok(())
    }
}
