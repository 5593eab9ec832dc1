//! In-memory bookmarks with optional notes.
//!
//! Bookmarks live for one viewing session and are not written to disk.
//!
//! # Example
//!
//! ```
//! use chatview::bookmarks::Bookmarks;
//! use chatview::Message;
//!
//! let msg = Message::new(7, "Alice", "Remember the train leaves at 9");
//! let mut bookmarks = Bookmarks::new();
//!
//! let pos = bookmarks.add(&msg);
//! assert!(bookmarks.add_note(pos, "check platform")?);
//! assert_eq!(bookmarks.target(pos)?, 7);
//! # Ok::<(), chatview::ChatviewError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Message;
use crate::error::ChatviewError;

/// Number of characters kept in a bookmark preview.
pub const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    /// Index of the bookmarked message.
    pub message_index: usize,
    /// Start of the message content.
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ordered list of bookmarks.
#[derive(Debug, Clone, Default)]
pub struct Bookmarks {
    items: Vec<Bookmark>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmarks `message` and returns the bookmark position.
    ///
    /// A message that is already bookmarked keeps its existing bookmark.
    pub fn add(&mut self, message: &Message) -> usize {
        self.add_at(message, Utc::now())
    }

    fn add_at(&mut self, message: &Message, now: DateTime<Utc>) -> usize {
        if let Some(pos) = self.position_of(message.index) {
            return pos;
        }
        self.items.push(Bookmark {
            message_index: message.index,
            preview: preview(&message.content),
            note: None,
            created_at: now,
        });
        tracing::debug!(message = message.index, "bookmark added");
        self.items.len() - 1
    }

    /// Sets the note of bookmark `pos`. Blank notes are ignored and return
    /// `false`.
    pub fn add_note(&mut self, pos: usize, note: &str) -> Result<bool, ChatviewError> {
        let len = self.items.len();
        let bookmark = self
            .items
            .get_mut(pos)
            .ok_or_else(|| ChatviewError::bookmark_not_found(pos, len))?;

        let note = note.trim();
        if note.is_empty() {
            return Ok(false);
        }
        bookmark.note = Some(note.to_string());
        Ok(true)
    }

    /// Removes bookmark `pos` and returns it.
    pub fn delete(&mut self, pos: usize) -> Result<Bookmark, ChatviewError> {
        if pos >= self.items.len() {
            return Err(ChatviewError::bookmark_not_found(pos, self.items.len()));
        }
        Ok(self.items.remove(pos))
    }

    pub fn get(&self, pos: usize) -> Option<&Bookmark> {
        self.items.get(pos)
    }

    /// Message index to jump to for bookmark `pos`.
    pub fn target(&self, pos: usize) -> Result<usize, ChatviewError> {
        self.get(pos)
            .map(|b| b.message_index)
            .ok_or_else(|| ChatviewError::bookmark_not_found(pos, self.items.len()))
    }

    pub fn position_of(&self, message_index: usize) -> Option<usize> {
        self.items
            .iter()
            .position(|b| b.message_index == message_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
