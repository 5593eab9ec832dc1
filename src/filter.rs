//! Filter messages by type, author and search text.
//!
//! | Filter | Type | Description |
//! |--------|------|-------------|
//! | Message type | [`KindFilter`] | text, image, video or audio only |
//! | User | [`UserFilter`] | messages from one author |
//! | Search | [`Search`] | case-insensitive text match over user and content |
//!
//! All active filters are combined with AND logic.
//!
//! # Example
//!
//! ```
//! use chatview::filter::{Filters, KindFilter, Search, UserFilter};
//! use chatview::{Message, MessageKind};
//!
//! let messages = vec![
//!     Message::new(0, "Alice", "Hello"),
//!     Message::new(1, "Bob", "photo").with_attachment(MessageKind::Image, "a.jpg"),
//!     Message::new(2, "Alice", "Bye"),
//! ];
//!
//! let filters = Filters::new().with_user("Alice");
//! let search = Search::new("bye");
//! let hits: Vec<_> = messages
//!     .iter()
//!     .filter(|m| filters.matches(m) && search.matches(m))
//!     .collect();
//!
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].index, 2);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::ChatviewError;
use crate::message::MessageKind;

/// Message type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Only(MessageKind),
}

impl KindFilter {
    pub fn matches(self, kind: MessageKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(k) => k == kind,
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("all"),
            KindFilter::Only(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for KindFilter {
    type Err = ChatviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        s.parse::<MessageKind>()
            .map(KindFilter::Only)
            .map_err(|_| {
                ChatviewError::invalid_value("message type", s, "all, text, image, video, audio")
            })
    }
}

/// Author selector. Matches the user name exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFilter {
    #[default]
    All,
    User(String),
}

impl UserFilter {
    /// Parses a user selector; `all` (any case) selects everyone.
    ///
    /// A name in double quotes is taken literally, so `"all"` selects a
    /// member called `all`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(quoted) = s.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return UserFilter::User(quoted.to_string());
        }
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            UserFilter::All
        } else {
            UserFilter::User(s.to_string())
        }
    }

    pub fn matches(&self, user: Option<&str>) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::User(wanted) => user == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserFilter::All => f.write_str("all"),
            UserFilter::User(name) => f.write_str(name),
        }
    }
}

/// Type and user filters, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filters {
    pub kind: KindFilter,
    pub user: UserFilter,
}

impl Filters {
    /// Creates filters that let every message through.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = UserFilter::parse(&user.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.kind != KindFilter::All || self.user != UserFilter::All
    }

    pub fn matches(&self, message: &Message) -> bool {
        self.kind.matches(message.kind) && self.user.matches(message.user())
    }
}

/// Case-insensitive search over user and content.
///
/// A blank query is inactive and matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Search {
    query: String,
    needle: String,
}

impl Search {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let needle = query.trim().to_lowercase();
        Self { query, needle }
    }

    /// The query as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    pub fn matches(&self, message: &Message) -> bool {
        !self.is_active() || message.matches_lowercase(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::new(0, "Alice", "Hello"),
            Message::new(1, "Bob", "<attached: a.jpg>").with_attachment(MessageKind::Image, "a.jpg"),
            Message::new(2, "Alice", "<attached: b.opus>").with_attachment(MessageKind::Audio, "b.opus"),
            Message::headerless(3, "orphan"),
        ]
    }

    #[test]
    fn test_kind_filter_parse() {
        assert_eq!("all".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!(
            "image".parse::<KindFilter>().unwrap(),
            KindFilter::Only(MessageKind::Image)
        );
        let err = "gifs".parse::<KindFilter>().unwrap_err();
        assert!(err.to_string().contains("gifs"));
    }

    #[test]
    fn test_user_filter_parse() {
        assert_eq!(UserFilter::parse("ALL"), UserFilter::All);
        assert_eq!(UserFilter::parse("  "), UserFilter::All);
        assert_eq!(UserFilter::parse(" Bob "), UserFilter::User("Bob".into()));
    }

    #[test]
    fn test_user_filter_quoted_name() {
        assert_eq!(UserFilter::parse("\"all\""), UserFilter::User("all".into()));
        assert_eq!(UserFilter::parse(" \"Mary Ann\" "), UserFilter::User("Mary Ann".into()));
        assert!(UserFilter::parse("\"all\"").matches(Some("all")));
        assert!(!UserFilter::parse("\"all\"").matches(Some("Bob")));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let messages = sample();
        let filters = Filters::new()
            .with_user("Alice")
            .with_kind(KindFilter::Only(MessageKind::Audio));
        let hits: Vec<usize> = messages
            .iter()
            .filter(|m| filters.matches(m))
            .map(|m| m.index)
            .collect();
        assert_eq!(hits, vec![2]);
        assert!(filters.is_active());
    }

    #[test]
    fn test_user_filter_is_exact() {
        let filters = Filters::new().with_user("alice");
        assert!(!sample().iter().any(|m| filters.matches(m)));
    }

    #[test]
    fn test_headerless_excluded_by_user_filter() {
        let messages = sample();
        let filters = Filters::new().with_user("Bob");
        assert!(!filters.matches(&messages[3]));
        assert!(Filters::new().matches(&messages[3]));
    }

    #[test]
    fn test_search() {
        let messages = sample();
        let search = Search::new("  HELLO ");
        assert!(search.is_active());
        assert!(search.matches(&messages[0]));
        assert!(!search.matches(&messages[1]));
        assert!(Search::new("bob").matches(&messages[1]));

        let blank = Search::new("   ");
        assert!(!blank.is_active());
        assert!(messages.iter().all(|m| blank.matches(m)));
    }
}
