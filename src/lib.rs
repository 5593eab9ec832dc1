//! # Chatview
//!
//! A Rust library and terminal viewer for exported WhatsApp chat logs.
//!
//! ## Overview
//!
//! Chatview loads a `_chat.txt` export (iOS `[date, time] user: text` lines)
//! and lets you:
//! - **filter** by message type (text, image, video, audio) and by user
//! - **search** message text and user names, case-insensitively
//! - **jump** to a date, or the closest date that has messages
//! - **page** through results in windows of 50, 100, 200 or all messages
//! - **resolve** attachments to files in the export folder
//! - **bookmark** messages with optional notes
//!
//! ## Quick Start
//!
//! ```rust
//! use chatview::prelude::*;
//!
//! let text = "[15/01/24, 10:30:45] Alice: Hello\n\
//!             [15/01/24, 10:31:00] Bob: <attached: 00000012-PHOTO.jpg>\n\
//!             [16/01/24, 09:00:00] Alice: Morning";
//!
//! let messages = ChatParser::new().parse_str(text);
//! let mut store = MessageStore::new(messages, LoadCount::default());
//!
//! store.set_filters(Filters::new().with_kind(KindFilter::Only(MessageKind::Image)));
//! assert_eq!(store.displayed_indices(), &[1]);
//!
//! store.clear_filters();
//! let jump = store.jump_to_date(chrono::NaiveDate::from_ymd_opt(2024, 1, 16).unwrap())?;
//! assert_eq!(jump.offset, 2);
//! # Ok::<(), ChatviewError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - line parsing, date/time detection, [`ChatParser`](parser::ChatParser)
//! - [`message`] - [`Message`] and [`MessageKind`]
//! - [`store`] - [`MessageStore`](store::MessageStore): filters, search, paging, jumps
//! - [`filter`] - type/user filters and text search
//! - [`navigation`] - date index and closest-date resolution
//! - [`media`] - attachment lookup on disk
//! - [`bookmarks`] - bookmarks with notes
//! - [`render`] - chat bubbles, JSON and CSV output
//! - [`session`] - interactive command session
//! - [`config`] - [`ViewerConfig`](config::ViewerConfig), [`LoadCount`](config::LoadCount)
//! - [`error`] - [`ChatviewError`], [`Result`]
//! - `cli` - clap argument types (feature `cli`)

pub mod bookmarks;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod media;
pub mod message;
pub mod navigation;
pub mod parser;
pub mod render;
pub mod session;
pub mod store;

pub use error::{ChatviewError, Result};
pub use message::{Message, MessageKind};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatview::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Message, MessageKind};

    pub use crate::error::{ChatviewError, Result};

    pub use crate::config::{LoadCount, ViewerConfig};
    pub use crate::parser::{ChatParser, DateOrder, parse_chat};

    pub use crate::filter::{Filters, KindFilter, Search, UserFilter};
    pub use crate::navigation::{DateIndex, DateJump};
    pub use crate::store::{ChatStats, MessageStore};

    pub use crate::bookmarks::{Bookmark, Bookmarks};
    pub use crate::media::{MediaRef, MediaResolver};

    pub use crate::render::{ViewFormat, render_bubble, write_view};
    pub use crate::session::Session;
}
