//! Converts model markdown into the HTML subset Telegram accepts.
//!
//! The model is instructed to emit Telegram HTML directly, but it still slips
//! into markdown often enough that every answer is passed through this fixer.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static CODE_INLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Rewrite markdown markup as Telegram HTML.
///
/// Rules are applied in a fixed order: `**bold**` first (so the italic rule
/// only sees single asterisks), then `*italic*`, then fenced code blocks,
/// then inline code. Unmatched markup passes through unchanged, and the
/// transform is idempotent on its own output.
pub fn fix_telegram_formatting(text: &str) -> String {
    let text = BOLD.replace_all(text, "<b>$1</b>");
    let text = ITALIC.replace_all(&text, "<i>$1</i>");
    let text = CODE_BLOCK.replace_all(&text, "<code>$1</code>");
    let text = CODE_INLINE.replace_all(&text, "<code>$1</code>");
    text.into_owned()
}
