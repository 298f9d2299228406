//! Transcript messages

use serde::Serialize;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Bot,
    User,
}

/// A single transcript entry.
///
/// Fields are private so the only way to build one is through [`Message::bot`] or
/// [`Message::user`]; quick-reply options can therefore only ever hang off bot messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    text: String,
    author: Author,
    options: Vec<String>,
}

impl Message {
    pub fn bot<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            author: Author::Bot,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Bot message without quick replies
    pub fn bot_text(text: impl Into<String>) -> Self {
        Self::bot(text, Vec::<String>::new())
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: Author::User,
            options: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> Author {
        self.author
    }

    /// Quick-reply options, in display order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_bot(&self) -> bool {
        self.author == Author::Bot
    }
}
