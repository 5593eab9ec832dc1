//! Line parser for WhatsApp chat exports.
//!
//! Each header line has the shape `[date, time] user: content`. The user part
//! is optional: lines like `[15/01/24, 10:00:00] Messages and calls are
//! end-to-end encrypted.` are system lines with no author. Any line without a
//! header continues the previous message.
//!
//! # Example
//!
//! ```rust
//! use chatview::parser::ChatParser;
//! use chatview::MessageKind;
//!
//! let export = "[15/01/24, 10:30:45] Alice: Hello\n\
//!               [15/01/24, 10:31:02] Bob: \u{200E}<attached: 00000001-PHOTO-2024-01-15.jpg>";
//!
//! let messages = ChatParser::new().parse_str(export);
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[1].kind, MessageKind::Image);
//! assert_eq!(messages[1].attachment.as_deref(), Some("00000001-PHOTO-2024-01-15.jpg"));
//! ```

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::ViewerConfig;
use crate::error::ChatviewError;
use crate::message::MessageKind;

// [date, time] user: content   (user is optional)
static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^,\]]+),\s+([^\]]+)\]\s+(?:(.+?):\s+)?(.*)$").unwrap()
});

// iOS: <attached: 00000012-PHOTO-2024-01-15-10-30-45.jpg>
static ATTACHED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<attached:\s*([^>]+?)\s*>").unwrap());

// Android: IMG-20240115-WA0001.jpg (file attached)
static FILE_ATTACHED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\S.*?\.\w+)\s+\(file attached\)").unwrap());

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["opus", "mp3", "m4a", "aac", "ogg", "wav", "amr"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "3gp", "webm", "m4v"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Order of the day, month and year components in header dates.
///
/// Exports follow the phone's locale, so `01/02/24` is the 1st of February
/// on most phones and January 2nd on US phones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `DD/MM/YY`
    #[default]
    DayFirst,
    /// `MM/DD/YY`
    MonthFirst,
    /// `YYYY-MM-DD`
    YearFirst,
}

impl std::str::FromStr for DateOrder {
    type Err = ChatviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day-first" | "dmy" | "eu" => Ok(DateOrder::DayFirst),
            "month-first" | "mdy" | "us" => Ok(DateOrder::MonthFirst),
            "year-first" | "ymd" | "iso" => Ok(DateOrder::YearFirst),
            _ => Err(ChatviewError::invalid_value(
                "date order",
                s,
                "day-first, month-first, year-first",
            )),
        }
    }
}

/// Pieces of a header line, borrowed from the cleaned line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParts<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub user: Option<&'a str>,
    pub content: &'a str,
}

/// Removes invisible direction marks that WhatsApp sprinkles into exports.
///
/// U+202F (narrow no-break space, used by iOS before AM/PM) becomes a plain
/// space so times stay parseable.
pub fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '\u{200E}' | '\u{200F}' | '\u{FEFF}'))
        .map(|c| if c == '\u{202F}' { ' ' } else { c })
        .collect()
}

/// Splits a cleaned line into its header parts.
///
/// Returns `None` for lines without a `[date, time]` header.
pub fn parse_line(line: &str) -> Option<LineParts<'_>> {
    let caps = LINE_RE.captures(line)?;
    Some(LineParts {
        date: caps.get(1).map_or("", |m| m.as_str().trim()),
        time: caps.get(2).map_or("", |m| m.as_str().trim()),
        user: caps.get(3).map(|m| m.as_str().trim()),
        content: caps.get(4).map_or("", |m| m.as_str()),
    })
}

/// Maps a file extension to a media kind.
pub fn kind_for_extension(ext: &str) -> MessageKind {
    let ext = ext.to_lowercase();
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        MessageKind::Image
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MessageKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MessageKind::Video
    } else {
        MessageKind::Text
    }
}

/// Classifies message content by its attachment marker.
///
/// Returns the kind and the attached file name, if any. Attachments with an
/// unknown extension (PDFs, contacts) stay [`MessageKind::Text`] but still
/// report their name.
pub fn classify_content(content: &str) -> (MessageKind, Option<String>) {
    let name = ATTACHED_RE
        .captures(content)
        .or_else(|| FILE_ATTACHED_RE.captures(content.trim_start()))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());

    match name {
        Some(name) => {
            let kind = name
                .rsplit_once('.')
                .map_or(MessageKind::Text, |(_, ext)| kind_for_extension(ext));
            (kind, Some(name))
        }
        None => (MessageKind::Text, None),
    }
}

fn split_date(text: &str) -> Option<[&str; 3]> {
    let mut parts = text.split(['/', '.', '-']).map(str::trim);
    let a = parts.next()?;
    let b = parts.next()?;
    let c = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    (numeric(a) && numeric(b) && numeric(c)).then_some([a, b, c])
}

/// Detects the date component order from a sample of header dates.
///
/// A first component above 12 proves day-first, a second component above 12
/// proves month-first and a four-digit first component means year-first. The
/// order with the most evidence wins; with no evidence day-first is assumed.
pub fn detect_date_order<'a>(dates: impl IntoIterator<Item = &'a str>) -> DateOrder {
    // [day-first, month-first, year-first]
    let mut scores = [0usize; 3];

    for date in dates {
        let Some([a, b, _]) = split_date(date) else {
            continue;
        };
        if a.len() == 4 {
            scores[2] += 1;
            continue;
        }
        let first: u32 = a.parse().unwrap_or(0);
        let second: u32 = b.parse().unwrap_or(0);
        if first > 12 {
            scores[0] += 1;
        } else if second > 12 {
            scores[1] += 1;
        }
    }

    let max_score = scores.iter().copied().max().unwrap_or(0);
    if max_score == 0 {
        return DateOrder::DayFirst;
    }
    match scores.iter().position(|&s| s == max_score) {
        Some(1) => DateOrder::MonthFirst,
        Some(2) => DateOrder::YearFirst,
        _ => DateOrder::DayFirst,
    }
}

/// Parses a header date. Two-digit years are taken as `20YY`.
pub fn parse_date(text: &str, order: DateOrder) -> Option<NaiveDate> {
    let [a, b, c] = split_date(text)?;
    let (y, m, d) = if a.len() == 4 {
        (a, b, c)
    } else {
        match order {
            DateOrder::DayFirst => (c, b, a),
            DateOrder::MonthFirst => (c, a, b),
            DateOrder::YearFirst => (a, b, c),
        }
    };

    let mut year: i32 = y.parse().ok()?;
    if y.len() <= 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

/// Parses a header time: `HH:MM`, `HH:MM:SS`, optionally with AM/PM.
/// Dot separators (`10.30.45`) are accepted too.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let mut normalized = text
        .trim()
        .to_uppercase()
        .replace("A.M.", "AM")
        .replace("P.M.", "PM")
        .replace('.', ":");
    for suffix in ["AM", "PM"] {
        if let Some(stripped) = normalized.strip_suffix(suffix) {
            normalized = format!("{} {suffix}", stripped.trim_end());
            break;
        }
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
}

/// Parses a whole export into messages.
pub fn parse_chat(text: &str, config: &ViewerConfig) -> Vec<Message> {
    let lines: Vec<String> = text.lines().map(clean_line).collect();

    let order = config.date_order.unwrap_or_else(|| {
        detect_date_order(lines.iter().filter_map(|l| parse_line(l)).map(|p| p.date))
    });

    let mut messages: Vec<Message> = Vec::new();
    let mut last_had_header = false;
    let mut unmatched = 0usize;

    for line in &lines {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(parts) = parse_line(line) {
            let (kind, attachment) = classify_content(parts.content);
            messages.push(Message {
                index: messages.len(),
                date_text: Some(parts.date.to_string()),
                time_text: Some(parts.time.to_string()),
                user: parts.user.map(str::to_string),
                content: parts.content.to_string(),
                kind,
                attachment,
                date: parse_date(parts.date, order),
                time: parse_time(parts.time),
            });
            last_had_header = true;
            continue;
        }

        unmatched += 1;
        match messages.last_mut() {
            Some(last) if config.merge_continuations && last_had_header => {
                last.content.push('\n');
                last.content.push_str(line);
            }
            _ => {
                tracing::debug!(line = %line, "line has no [date, time] header");
                messages.push(Message::headerless(messages.len(), line.as_str()));
                last_had_header = false;
            }
        }
    }

    tracing::debug!(
        messages = messages.len(),
        unmatched,
        order = ?order,
        "parsed chat export"
    );
    messages
}

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust,no_run
/// use chatview::parser::ChatParser;
///
/// let parser = ChatParser::new();
/// let messages = parser.parse("WhatsApp Chat - Family.txt".as_ref())?;
/// # Ok::<(), chatview::ChatviewError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChatParser {
    config: ViewerConfig,
}

impl ChatParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Reads and parses an export file.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn parse(&self, path: &Path) -> Result<Vec<Message>, ChatviewError> {
        let bytes = fs::read(path).map_err(|e| ChatviewError::read_export(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        let messages = self.parse_str(&text);
        tracing::info!(path = %path.display(), messages = messages.len(), "loaded chat export");
        Ok(messages)
    }

    /// Parses export text already in memory.
    pub fn parse_str(&self, text: &str) -> Vec<Message> {
        parse_chat(text, &self.config)
    }
}
