//! Parsed chat message and its media classification.
//!
//! A [`Message`] is one bubble in the viewer: a header line
//! `[date, time] user: content` plus any continuation lines, or a raw line
//! that carried no header at all.
//!
//! # Examples
//!
//! ```
//! use chatview::{Message, MessageKind};
//!
//! let msg = Message::new(0, "Alice", "Hello!");
//! assert_eq!(msg.user(), Some("Alice"));
//! assert_eq!(msg.kind, MessageKind::Text);
//! assert!(!msg.is_headerless());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ChatviewError;

/// What a message carries, decided from its attachment marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text, or an attachment that is not image/audio/video.
    #[default]
    Text,
    /// Photo, sticker or GIF attachment
    Image,
    /// Voice note or audio file
    Audio,
    /// Video attachment
    Video,
}

impl MessageKind {
    /// Returns all kinds in display order.
    pub fn all() -> &'static [MessageKind] {
        &[
            MessageKind::Text,
            MessageKind::Image,
            MessageKind::Video,
            MessageKind::Audio,
        ]
    }

    /// Lowercase name used on the command line and in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Audio => "audio",
            MessageKind::Video => "video",
        }
    }

    /// Returns `true` for image, audio and video.
    pub fn is_media(self) -> bool {
        !matches!(self, MessageKind::Text)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = ChatviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(MessageKind::Text),
            "image" | "images" | "photo" => Ok(MessageKind::Image),
            "audio" => Ok(MessageKind::Audio),
            "video" | "videos" => Ok(MessageKind::Video),
            _ => Err(ChatviewError::invalid_value(
                "message type",
                s,
                "text, image, video, audio",
            )),
        }
    }
}

/// One parsed chat message.
///
/// `date_text`/`time_text` keep the header exactly as exported so the
/// viewer can show it verbatim; `date`/`time` are the parsed values used for
/// navigation. Both are `None` for headerless lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Position in the loaded chat.
    pub index: usize,

    /// Date as written in the header, e.g. `15/01/24`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,

    /// Time as written in the header, e.g. `10:30:45`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_text: Option<String>,

    /// Author. `None` for system lines and headerless lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Message body. Continuation lines are joined with `\n`.
    pub content: String,

    /// Media classification.
    pub kind: MessageKind,

    /// File name from an `<attached: ...>` marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
}

impl Message {
    /// Creates a text message from `user` with no date information.
    pub fn new(index: usize, user: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            index,
            user: Some(user.into()),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Creates a message for a line without a `[date, time]` header.
    pub fn headerless(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the parsed date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the parsed time.
    #[must_use]
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sets the kind and attachment name.
    #[must_use]
    pub fn with_attachment(mut self, kind: MessageKind, name: impl Into<String>) -> Self {
        self.kind = kind;
        self.attachment = Some(name.into());
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns `true` when the line had no `[date, time]` header.
    pub fn is_headerless(&self) -> bool {
        self.date_text.is_none() && self.user.is_none() && self.time_text.is_none()
    }

    /// Returns `true` for header lines without an author
    /// (e.g. "Messages and calls are end-to-end encrypted").
    pub fn is_system(&self) -> bool {
        self.user.is_none() && self.date_text.is_some()
    }

    /// Case-insensitive substring match over user and content.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if self.content.to_lowercase().contains(needle) {
            return true;
        }
        self.user
            .as_deref()
            .is_some_and(|u| u.to_lowercase().contains(needle))
    }
}
