//! Conversation loop - long-polls Telegram and relays questions to YandexGPT.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::bot::format::fix_telegram_formatting;
use crate::bot::knowledge::KnowledgeSource;
use crate::bot::prompts;
use crate::bot::telegram::{Gateway, Update, send_chunked};
use crate::bot::yandex::{Completion, CompletionClient};

/// Pause between poll batches.
const BATCH_PAUSE: Duration = Duration::from_secs(1);
/// Backoff after a failed poll.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);
/// Delay between thinking-indicator edits.
const THINKING_PACING: Duration = Duration::from_millis(1500);

/// Loop tunables, filled from `Config`.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_message_length: usize,
    pub poll_timeout_secs: u32,
    pub thinking_pacing: Duration,
    pub batch_pause: Duration,
    pub error_backoff: Duration,
}

impl EngineSettings {
    /// Settings from config values, with the standard pacing intervals.
    pub fn new(
        temperature: f32,
        max_tokens: u32,
        max_message_length: usize,
        poll_timeout_secs: u32,
    ) -> Self {
        Self {
            temperature,
            max_tokens,
            max_message_length,
            poll_timeout_secs,
            thinking_pacing: THINKING_PACING,
            batch_pause: BATCH_PAUSE,
            error_backoff: ERROR_BACKOFF,
        }
    }
}

/// The conversation loop. Owns the update cursor; there is no other state
/// carried across turns.
pub struct CurriculumBot<G, C, K> {
    settings: EngineSettings,
    gateway: G,
    completion: C,
    knowledge: K,
    cursor: i64,
}

impl<G, C, K> CurriculumBot<G, C, K>
where
    G: Gateway,
    C: CompletionClient,
    K: KnowledgeSource,
{
    pub fn new(settings: EngineSettings, gateway: G, completion: C, knowledge: K) -> Self {
        Self {
            settings,
            gateway,
            completion,
            knowledge,
            cursor: 0,
        }
    }

    /// The next update id to request from the transport.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Poll forever. Poll failures are logged and retried after a backoff;
    /// only the external stop signal (ctrl-c in main) ends this loop.
    pub async fn run(&mut self) {
        info!("Starting curriculum bot loop");

        loop {
            let updates = match self
                .gateway
                .poll(self.cursor, self.settings.poll_timeout_secs)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("Error getting updates: {e}");
                    sleep(self.settings.error_backoff).await;
                    continue;
                }
            };

            self.process_batch(updates).await;
            sleep(self.settings.batch_pause).await;
        }
    }

    /// Handle one poll batch in arrival order, then advance the cursor past
    /// every update the transport returned - including the ones whose
    /// handling failed, so the batch always makes forward progress.
    pub async fn process_batch(&mut self, updates: Vec<Update>) {
        for update in &updates {
            self.handle_update(update).await;
        }

        if let Some(max_id) = updates.iter().map(|u| u.update_id).max() {
            self.cursor = max_id + 1;
        }
    }

    async fn handle_update(&self, update: &Update) {
        let Some(msg) = &update.message else {
            return;
        };
        let text = msg.text.trim();
        if text.is_empty() {
            return;
        }

        let preview: String = text.chars().take(100).collect();
        info!(
            "Processing message from user {} in chat {}: {preview}",
            msg.user_id, msg.chat_id
        );

        if text.starts_with("/start") {
            self.send_reply(msg.chat_id, prompts::WELCOME).await;
        } else if text.starts_with("/help") {
            self.send_reply(msg.chat_id, prompts::HELP).await;
        } else {
            // Unrecognized /commands are deliberately answered as questions.
            self.handle_question(msg.chat_id, text).await;
        }
    }

    /// Answer one question. Every failure inside is mapped to a fallback
    /// reply or logged; nothing escapes to the batch loop.
    async fn handle_question(&self, chat_id: i64, question: &str) {
        self.gateway.send_typing(chat_id).await;

        let thinking_id = self.show_thinking(chat_id).await;

        let system_text = prompts::build_system_prompt(&self.knowledge.curriculum_text());
        let answer = match self
            .completion
            .complete(
                &system_text,
                question,
                self.settings.temperature,
                self.settings.max_tokens,
            )
            .await
        {
            Completion::Answer(text) => text,
            Completion::Empty => prompts::NO_RESPONSE.to_string(),
            Completion::Failed => prompts::ERROR_REPLY.to_string(),
        };

        // The indicator goes away before the answer lands, success or not.
        if let Some(message_id) = thinking_id {
            if let Err(e) = self.gateway.delete(chat_id, message_id).await {
                warn!("Could not delete thinking message: {e}");
            }
        }

        self.send_reply(chat_id, &fix_telegram_formatting(&answer))
            .await;
        info!("Handled question for chat {chat_id}");
    }

    /// Send the first status line, then edit the same message through the
    /// rest of the sequence with a pacing delay between edits. A transport
    /// failure stops the sequence on its last successful text; the question
    /// proceeds regardless. Returns the indicator's message id if the
    /// initial send succeeded.
    async fn show_thinking(&self, chat_id: i64) -> Option<i64> {
        let mut message_id = None;

        for (i, status) in prompts::THINKING_SEQUENCE.iter().enumerate() {
            let result = match message_id {
                None => match self.gateway.send(chat_id, status).await {
                    Ok(id) => {
                        message_id = Some(id);
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                Some(id) => self.gateway.edit(chat_id, id, status).await,
            };

            if let Err(e) = result {
                warn!("Thinking indicator stopped: {e}");
                break;
            }

            if i < prompts::THINKING_SEQUENCE.len() - 1 {
                sleep(self.settings.thinking_pacing).await;
            }
        }

        message_id
    }

    async fn send_reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = send_chunked(
            &self.gateway,
            chat_id,
            text,
            self.settings.max_message_length,
        )
        .await
        {
            warn!("Failed to deliver reply to chat {chat_id}: {e}");
        }
    }
}
