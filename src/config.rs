//! Configuration types for loading and viewing a chat.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. The binary maps its flags onto
//! [`ViewerConfig`].
//!
//! # Example
//!
//! ```rust
//! use chatview::config::{LoadCount, ViewerConfig};
//! use chatview::parser::DateOrder;
//!
//! let config = ViewerConfig::new()
//!     .with_load_count(LoadCount::Count(100))
//!     .with_date_order(DateOrder::MonthFirst)
//!     .with_merge_continuations(false);
//!
//! assert_eq!(config.load_count, LoadCount::Count(100));
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChatviewError;
use crate::parser::DateOrder;

/// How many matching messages the viewer shows at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawLoadCount")]
pub enum LoadCount {
    /// Show at most this many messages; always greater than zero.
    Count(usize),
    /// Show every matching message.
    All,
}

impl LoadCount {
    /// Quick-pick sizes offered by the viewer.
    pub const PRESETS: [usize; 3] = [50, 100, 200];

    /// Creates a bounded load count, rejecting zero.
    pub fn count(n: usize) -> Result<Self, ChatviewError> {
        if n == 0 {
            return Err(ChatviewError::invalid_value(
                "load count",
                "0",
                "a positive number or 'all'",
            ));
        }
        Ok(LoadCount::Count(n))
    }

    /// Replaces `Count(0)` with the default page size.
    pub fn or_default_if_zero(self) -> Self {
        match self {
            LoadCount::Count(0) => {
                tracing::warn!("load count 0 replaced by {}", LoadCount::default());
                LoadCount::default()
            }
            other => other,
        }
    }

    /// Number of messages for a window over `available` matches.
    pub fn take(self, available: usize) -> usize {
        match self {
            LoadCount::Count(n) => n.min(available),
            LoadCount::All => available,
        }
    }
}

// Unchecked wire form; zero is rejected in `TryFrom`.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawLoadCount {
    Count(usize),
    All,
}

impl TryFrom<RawLoadCount> for LoadCount {
    type Error = ChatviewError;

    fn try_from(raw: RawLoadCount) -> Result<Self, Self::Error> {
        match raw {
            RawLoadCount::Count(n) => LoadCount::count(n),
            RawLoadCount::All => Ok(LoadCount::All),
        }
    }
}

impl Default for LoadCount {
    fn default() -> Self {
        LoadCount::Count(Self::PRESETS[0])
    }
}

impl fmt::Display for LoadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadCount::Count(n) => write!(f, "{n}"),
            LoadCount::All => f.write_str("all"),
        }
    }
}

impl FromStr for LoadCount {
    type Err = ChatviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(LoadCount::All);
        }
        let n: usize = s.parse().map_err(|_| {
            ChatviewError::invalid_value("load count", s, "a positive number or 'all'")
        })?;
        LoadCount::count(n)
    }
}

/// Configuration for loading and browsing a chat export.
///
/// # Example
///
/// ```rust
/// use chatview::config::ViewerConfig;
///
/// let config = ViewerConfig::new().with_media_dir("/data/chat-media");
/// assert!(config.merge_continuations);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Page size for the displayed window (default: 50)
    pub load_count: LoadCount,

    /// Append non-header lines to the previous message (default: true).
    /// When disabled each such line is shown as its own raw bubble.
    pub merge_continuations: bool,

    /// Component order of header dates. `None` detects it from the file.
    pub date_order: Option<DateOrder>,

    /// Directory holding attachments. `None` uses the export's directory.
    pub media_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            load_count: LoadCount::default(),
            merge_continuations: true,
            date_order: None,
            media_dir: None,
        }
    }
}

impl ViewerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size. `Count(0)` falls back to the default.
    #[must_use]
    pub fn with_load_count(mut self, load_count: LoadCount) -> Self {
        self.load_count = load_count.or_default_if_zero();
        self
    }

    /// Enables or disables merging of continuation lines.
    #[must_use]
    pub fn with_merge_continuations(mut self, merge: bool) -> Self {
        self.merge_continuations = merge;
        self
    }

    /// Forces a date component order instead of detecting it.
    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = Some(order);
        self
    }

    /// Sets the attachment directory.
    #[must_use]
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_config_default() {
        let config = ViewerConfig::default();
        assert_eq!(config.load_count, LoadCount::Count(50));
        assert!(config.merge_continuations);
        assert!(config.date_order.is_none());
        assert!(config.media_dir.is_none());
    }

    #[test]
    fn test_viewer_config_builder() {
        let config = ViewerConfig::new()
            .with_load_count(LoadCount::All)
            .with_merge_continuations(false)
            .with_date_order(DateOrder::YearFirst)
            .with_media_dir("media");
        assert_eq!(config.load_count, LoadCount::All);
        assert!(!config.merge_continuations);
        assert_eq!(config.date_order, Some(DateOrder::YearFirst));
        assert_eq!(config.media_dir, Some(PathBuf::from("media")));
    }

    #[test]
    fn test_load_count_parse() {
        assert_eq!("200".parse::<LoadCount>().unwrap(), LoadCount::Count(200));
        assert_eq!("ALL".parse::<LoadCount>().unwrap(), LoadCount::All);
        assert!("0".parse::<LoadCount>().is_err());
        assert!("-5".parse::<LoadCount>().is_err());
        assert!("lots".parse::<LoadCount>().is_err());
    }

    #[test]
    fn test_load_count_take() {
        assert_eq!(LoadCount::Count(50).take(10), 10);
        assert_eq!(LoadCount::Count(50).take(500), 50);
        assert_eq!(LoadCount::All.take(500), 500);
    }

    #[test]
    fn test_zero_load_count_falls_back_to_default() {
        assert_eq!(LoadCount::Count(0).or_default_if_zero(), LoadCount::Count(50));
        assert_eq!(LoadCount::Count(7).or_default_if_zero(), LoadCount::Count(7));
        let config = ViewerConfig::new().with_load_count(LoadCount::Count(0));
        assert_eq!(config.load_count, LoadCount::Count(50));
    }

    #[test]
    fn test_zero_load_count_rejected_on_deserialize() {
        let json = r#"{"load_count":{"count":0},"merge_continuations":true,"date_order":null,"media_dir":null}"#;
        let err = serde_json::from_str::<ViewerConfig>(json).unwrap_err();
        assert!(err.to_string().contains("load count"));

        assert_eq!(serde_json::from_str::<LoadCount>(r#"{"count":20}"#).unwrap(), LoadCount::Count(20));
        assert_eq!(serde_json::from_str::<LoadCount>(r#""all""#).unwrap(), LoadCount::All);
    }

    #[test]
    fn test_viewer_config_serde_roundtrip() {
        let config = ViewerConfig::new().with_load_count(LoadCount::Count(100));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ViewerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
