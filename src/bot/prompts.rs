//! Prompt templates and user-facing reply strings.

/// Ordered status lines shown while a completion request is in flight.
/// The first is sent as a fresh message, the rest are applied as edits.
pub const THINKING_SEQUENCE: [&str; 4] = [
    "🤔 Анализирую учебные планы...",
    "📚 Ищу информацию в базе данных...",
    "🔍 Проверяю детали программ...",
    "💭 Формулирую ответ...",
];

/// Sent when the model returns no usable text.
pub const NO_RESPONSE: &str =
    "Извините, не удалось получить ответ от модели. Попробуйте позже.";

/// Sent when the completion call fails outright.
pub const ERROR_REPLY: &str =
    "Извините, произошла ошибка при обработке вашего вопроса. Попробуйте позже.";

/// Reply to /start.
pub const WELCOME: &str = "🎓 Добро пожаловать в бот по учебным планам ИТМО!

Я помогу вам найти информацию о магистерских программах:
• <b>Искусственный интеллект</b>
• <b>Управление ИИ-продуктами</b>

Вы можете спросить:
• Какие дисциплины есть в программе?
• Сколько зачетных единиц у дисциплины?
• В каком семестре изучается предмет?
• Какие практики предусмотрены?
• И многое другое!

Просто задайте свой вопрос! 💬";

/// Reply to /help.
pub const HELP: &str = "📚 <b>Помощь по боту</b>

<b>Доступные программы:</b>
• Искусственный интеллект
• Управление ИИ-продуктами/AI Product

<b>Примеры вопросов:</b>
• \"Какие дисциплины по машинному обучению есть в программе ИИ?\"
• \"Сколько зачетных единиц у дисциплины 'Глубокое обучение'?\"
• \"Какие практики в 3 семестре?\"
• \"Расскажи про программу Управление ИИ-продуктами\"

<b>Команды:</b>
/start - начать работу
/help - эта справка

Задавайте вопросы на русском языке! 🇷🇺";

const MAIN_TEMPLATE: &str = r#"Ты - помощник по учебным планам ИТМО для магистерских программ "Искусственный интеллект" и "Управление ИИ-продуктами".

ВАЖНЫЕ ПРАВИЛА:
1. Отвечай СТРОГО по предоставленным учебным планам
2. Если информации нет в учебных планах - честно скажи об этом
3. Не придумывай информацию, которой нет в планах
4. Всегда указывай конкретные названия дисциплин, количество зачетных единиц и часов
5. Если спрашивают про конкретную дисциплину - найди её в планах и дай точную информацию
6. Отвечай на русском языке
7. Будь конкретным и информативным
8. Если вопрос не касается учебных планов ИТМО, вежливо перенаправь к теме учебных планов

КРИТИЧЕСКИ ВАЖНО - ФОРМАТИРОВАНИЕ ДЛЯ TELEGRAM:
- ОБЯЗАТЕЛЬНО используй <b>жирный текст</b> (НЕ **текст**) для выделения названий программ и важных терминов
- ОБЯЗАТЕЛЬНО используй <i>курсив</i> (НЕ *текст*) для выделения названий дисциплин
- ОБЯЗАТЕЛЬНО используй <code>код</code> для выделения цифр (зачетные единицы, часы)
- Используй • для списков дисциплин
- Используй 📚 📊 🎓 и другие эмодзи для улучшения читаемости
- Структурируй ответ с абзацами и переносами строк
- Для больших списков группируй информацию по семестрам или блокам

ЗАПРЕЩЕНО использовать:
- **жирный** (двойные звездочки) - НЕ РАБОТАЕТ в Telegram
- *курсив* (одинарные звездочки) - НЕ РАБОТАЕТ в Telegram
- ```код``` (тройные обратные кавычки) - используй <code>код</code>

УЧЕБНЫЕ ПЛАНЫ:

{curriculum_text}

Отвечай только на основе этой информации с правильным форматированием для Telegram."#;

/// Build the system prompt with the current curriculum text substituted in.
pub fn build_system_prompt(curriculum_text: &str) -> String {
    MAIN_TEMPLATE.replace("{curriculum_text}", curriculum_text)
}
