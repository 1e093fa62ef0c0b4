//! Telegram gateway built on teloxide.
//!
//! The bot drives `getUpdates` itself instead of using a dispatcher: the
//! conversation loop owns the update cursor, so polling has to stay an
//! explicit call with an explicit offset.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ParseMode, UpdateKind};
use tracing::warn;

/// Maximum updates requested per poll.
const POLL_LIMIT: u8 = 100;

/// One long-poll update. `update_id` is transport-assigned and monotonic;
/// updates that carry no usable message still advance the cursor.
#[derive(Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<InboundMessage>,
}

/// The fields of an inbound message the loop cares about.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub text: String,
}

/// Chat transport seam. Every failure is a `String` the loop treats as
/// non-fatal.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn poll(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>, String>;

    /// Send one message, returning its message id.
    async fn send(&self, chat_id: i64, text: &str) -> Result<i64, String>;

    async fn edit(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), String>;

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), String>;

    /// Fire-and-forget "typing" affordance.
    async fn send_typing(&self, chat_id: i64);
}

/// Telegram API client.
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn poll(&self, offset: i64, timeout_secs: u32) -> Result<Vec<Update>, String> {
        let updates = self
            .bot
            .get_updates()
            .offset(offset as i32)
            .timeout(timeout_secs)
            .limit(POLL_LIMIT)
            .await
            .map_err(|e| format!("Failed to get updates: {e}"))?;

        Ok(updates
            .into_iter()
            .map(|update| {
                let message = match update.kind {
                    UpdateKind::Message(msg) => {
                        let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
                        Some(InboundMessage {
                            chat_id: msg.chat.id.0,
                            user_id,
                            text: msg.text().unwrap_or("").to_string(),
                        })
                    }
                    _ => None,
                };
                Update {
                    update_id: update.id.0 as i64,
                    message,
                }
            })
            .collect())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|msg| msg.id.0 as i64)
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    async fn edit(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), String> {
        self.bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id as i32), text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to edit message: {e}");
                warn!("{}", msg);
                msg
            })
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<(), String> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id as i32))
            .await
            .map(|_| ())
            .map_err(|e| {
                let msg = format!("Failed to delete message: {e}");
                warn!("{}", msg);
                msg
            })
    }

    async fn send_typing(&self, chat_id: i64) {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .ok();
    }
}

/// Deliver `text` to a chat, splitting it into hard slices of `max_len`
/// characters when it is too long for one message.
///
/// Slices after the first get a `"(continuation i/N)\n\n"` prefix and go out
/// as independent calls in order. The first failed call aborts the rest;
/// already-sent slices stay up.
pub async fn send_chunked<G: Gateway + ?Sized>(
    gateway: &G,
    chat_id: i64,
    text: &str,
    max_len: usize,
) -> Result<(), String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        gateway.send(chat_id, text).await?;
        return Ok(());
    }

    let total = chars.len().div_ceil(max_len);
    for (i, slice) in chars.chunks(max_len).enumerate() {
        let mut part: String = slice.iter().collect();
        if i > 0 {
            part = format!("(continuation {}/{})\n\n{}", i + 1, total, part);
        }
        gateway.send(chat_id, &part).await.map_err(|e| {
            let msg = format!("Failed to send message part {}/{}: {e}", i + 1, total);
            warn!("{}", msg);
            msg
        })?;
    }
    Ok(())
}
