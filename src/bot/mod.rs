//! Curriculum Q&A bot - long-polls Telegram and answers from the study plans.

pub mod engine;
pub mod format;
pub mod knowledge;
pub mod prompts;
pub mod telegram;
pub mod yandex;


pub use engine::{CurriculumBot, EngineSettings};
pub use knowledge::CurriculumFiles;
pub use telegram::TelegramGateway;
pub use yandex::YandexGpt;
