//! Update handlers
//!
//! `/start` answers with the logo and usage caption; every other text
//! message is treated as a batch of label lines.

use crate::error::BotResult;
use crate::state::{AppState, Welcome};
use crate::telegram::{Message, Update};
use crate::transport::Attachment;
use label_sheet::{LabelBatch, SkippedRecord};
use tracing::{debug, error, info, instrument, warn};

pub const FORMAT_HINT: &str = "❌ Use format: Barcode, Part Name, Rack";
pub const GENERATING: &str = "⏳ Generating your PDF...";
pub const WELCOME_FAILED: &str = "❌ Error: Could not send the welcome message with logo.";

/// Skipped records listed one by one; the rest are only counted
const SKIPPED_REPORT_MAX_ENTRIES: usize = 20;
/// Bot API limit for message text, in characters
const MESSAGE_MAX_CHARS: usize = 4096;

/// Dispatch one webhook update
pub async fn handle_update(state: &AppState, update: Update) {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "update without message ignored");
        return;
    };
    let Some(text) = message.text.as_deref() else {
        debug!(update_id = update.update_id, "non-text message ignored");
        return;
    };

    if is_start_command(text) {
        send_welcome(state, &message).await;
    } else {
        handle_label_request(state, &message, text).await;
    }
}

/// `/start`, `/start@SomeBot` and `/start <payload>`
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    command == "/start" || command.starts_with("/start@")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML caption of the welcome photo
pub fn welcome_caption(welcome: &Welcome) -> String {
    let mut caption = format!(
        "👋 <b>Welcome to {}!</b>\n\n\
         🔹 Create ready-to-print barcode labels for your spare parts.\n\n\
         <b>📄 Manual entry:</b>\n\
         Send one label per line:\n\
         <code>123456789012, Motor Gear, R12</code>\n\
         <code>987654321098, Brake Unit, R34</code>\n\n\
         ✅ You get back a PDF with one 10x15 cm label per line.\n\n\
         ⚡ Let's get started!",
        escape_html(&welcome.bot_name)
    );
    if let Some(contact) = &welcome.support_contact {
        caption.push_str(&format!("\n\nFor support contact {}", escape_html(contact)));
    }
    caption
}

#[instrument(skip_all, fields(chat_id = message.chat.id))]
async fn send_welcome(state: &AppState, message: &Message) {
    if let Err(e) = try_send_welcome(state, message).await {
        error!(error = %e, "Error sending welcome message");
        if let Err(e) = state
            .transport
            .send_message(message.chat.id, WELCOME_FAILED, Some(message.message_id))
            .await
        {
            error!(error = %e, "Failed to report welcome error");
        }
    }
}

async fn try_send_welcome(state: &AppState, message: &Message) -> BotResult<()> {
    let path = state
        .generator
        .config()
        .logo_path
        .clone()
        .unwrap_or_else(|| "logo.png".into());
    let bytes = tokio::fs::read(&path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("logo.png")
        .to_string();

    state
        .transport
        .send_photo(
            message.chat.id,
            Attachment::new(file_name, bytes),
            &welcome_caption(&state.welcome),
        )
        .await?;
    Ok(())
}

#[instrument(skip_all, fields(chat_id = message.chat.id))]
async fn handle_label_request(state: &AppState, message: &Message, text: &str) {
    let batch = match LabelBatch::parse(text) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, "rejected label request");
            if let Err(e) = state
                .transport
                .send_message(message.chat.id, FORMAT_HINT, Some(message.message_id))
                .await
            {
                error!(error = %e, "Failed to send format hint");
            }
            return;
        }
    };

    if let Err(e) = generate_and_send(state, message, batch).await {
        error!(error = %e, "Manual entry error");
        if let Err(e) = state
            .transport
            .send_message(
                message.chat.id,
                &format!("❌ Error: {e}"),
                Some(message.message_id),
            )
            .await
        {
            error!(error = %e, "Failed to report generation error");
        }
    }
}

async fn generate_and_send(
    state: &AppState,
    message: &Message,
    batch: LabelBatch,
) -> BotResult<()> {
    let chat_id = message.chat.id;
    let progress = state
        .transport
        .send_message(chat_id, GENERATING, Some(message.message_id))
        .await?;

    // Rendering is CPU-bound
    let generator = state.generator.clone();
    let document = tokio::task::spawn_blocking(move || generator.generate(&batch)).await??;
    info!(file_name = %document.file_name, pages = document.pages, "sending label sheet");

    let skipped = document.skipped;
    state
        .transport
        .send_document(chat_id, Attachment::new(document.file_name, document.bytes))
        .await?;

    // The sheet is delivered; later failures are only logged
    if !skipped.is_empty()
        && let Err(e) = state
            .transport
            .send_message(chat_id, &skipped_report(&skipped), Some(message.message_id))
            .await
    {
        warn!(error = %e, skipped = skipped.len(), "Failed to send skipped-record report");
    }

    if let Err(e) = state.transport.delete_message(chat_id, progress).await {
        warn!(error = %e, "Failed to delete progress message");
    }
    Ok(())
}

/// Follow-up text listing records left out of the sheet
///
/// At most [`SKIPPED_REPORT_MAX_ENTRIES`] records are listed and the text
/// always fits in one message.
pub fn skipped_report(skipped: &[SkippedRecord]) -> String {
    let mut report = format!("⚠️ Skipped {} label(s):", skipped.len());
    let mut listed = 0;
    for record in skipped.iter().take(SKIPPED_REPORT_MAX_ENTRIES) {
        let entry = format!("\n• {}: {}", record.identifier, record.reason);
        // Leave room for the trailing "and N more" line
        if report.chars().count() + entry.chars().count() + 32 > MESSAGE_MAX_CHARS {
            break;
        }
        report.push_str(&entry);
        listed += 1;
    }
    if listed < skipped.len() {
        report.push_str(&format!("\n…and {} more", skipped.len() - listed));
    }
    report
}
