//! Render messages as terminal chat bubbles or export them.
//!
//! | Format | Output |
//! |--------|--------|
//! | [`ViewFormat::Text`] | Chat bubbles for the terminal |
//! | [`ViewFormat::Json`] | JSON array of messages (feature `json-output`) |
//! | [`ViewFormat::Csv`] | `;`-delimited CSV (feature `csv-output`) |
//!
//! # Example
//!
//! ```rust
//! use chatview::render::render_bubble;
//! use chatview::Message;
//!
//! let mut msg = Message::new(4, "Alice", "See you\nat 9");
//! msg.date_text = Some("15/01/24".into());
//! msg.time_text = Some("10:30:45".into());
//!
//! let bubble = render_bubble(&msg, None);
//! assert_eq!(bubble, "#4 [15/01/24, 10:30:45] Alice\n    See you\n    at 9");
//! ```

use std::fmt;
use std::io::Write;
#[cfg(any(feature = "json-output", feature = "csv-output"))]
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::error::ChatviewError;
use crate::media::MediaResolver;
use crate::message::MessageKind;
use crate::navigation::DateIndex;
use crate::store::ChatStats;

const INDENT: &str = "    ";

/// Output format for a list of messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ViewFormat {
    /// Chat bubbles (default)
    #[default]
    Text,
    /// JSON array of messages
    #[cfg(feature = "json-output")]
    Json,
    /// CSV with semicolon delimiter
    #[cfg(feature = "csv-output")]
    Csv,
}

impl ViewFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewFormat::Text => "text",
            #[cfg(feature = "json-output")]
            ViewFormat::Json => "json",
            #[cfg(feature = "csv-output")]
            ViewFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ViewFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewFormat {
    type Err = ChatviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ViewFormat::Text),
            #[cfg(feature = "json-output")]
            "json" => Ok(ViewFormat::Json),
            #[cfg(feature = "csv-output")]
            "csv" => Ok(ViewFormat::Csv),
            _ => Err(ChatviewError::invalid_value("format", s, "text, json, csv")),
        }
    }
}

/// Formats one message as a bubble.
///
/// With a resolver, attachments get a line naming the resolved file or
/// `(missing)`.
pub fn render_bubble(message: &Message, media: Option<&MediaResolver>) -> String {
    if message.is_headerless() {
        return format!("#{} {}", message.index, message.content);
    }

    let date = message.date_text.as_deref().unwrap_or_default();
    let time = message.time_text.as_deref().unwrap_or_default();
    let mut out = format!("#{} [{date}, {time}]", message.index);

    match message.user() {
        Some(user) => {
            out.push(' ');
            out.push_str(user);
            for line in message.content.lines() {
                out.push('\n');
                out.push_str(INDENT);
                out.push_str(line);
            }
        }
        // System lines stay on the header line
        None => {
            out.push_str(" · ");
            out.push_str(&message.content.replace('\n', " "));
        }
    }

    if let (Some(resolver), Some(name)) = (media, message.attachment.as_deref()) {
        let location = resolver
            .resolve(name)
            .map_or_else(|| "(missing)".to_string(), |p| p.display().to_string());
        out.push_str(&format!("\n{INDENT}📎 {}: {name} -> {location}", message.kind));
    }

    out
}

/// Writes `messages` to `out` in the given format.
pub fn write_view<W: Write>(
    out: &mut W,
    messages: &[&Message],
    format: ViewFormat,
    media: Option<&MediaResolver>,
) -> Result<(), ChatviewError> {
    match format {
        ViewFormat::Text => {
            for msg in messages {
                writeln!(out, "{}", render_bubble(msg, media))?;
            }
        }
        #[cfg(feature = "json-output")]
        ViewFormat::Json => {
            let records: Vec<ViewRecord<'_>> = messages
                .iter()
                .map(|m| ViewRecord::new(m, media))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
        #[cfg(feature = "csv-output")]
        ViewFormat::Csv => write_csv(out, messages, media)?,
    }
    Ok(())
}

/// Writes chat statistics as an aligned summary.
pub fn write_stats<W: Write>(out: &mut W, stats: &ChatStats) -> Result<(), ChatviewError> {
    writeln!(out, "Total:       {}", stats.total)?;
    for kind in MessageKind::all() {
        writeln!(out, "  {:<10}{}", format!("{kind}:"), stats.count(*kind))?;
    }
    writeln!(out, "System:      {}", stats.system)?;
    writeln!(out, "No header:   {}", stats.headerless)?;
    if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        writeln!(out, "Dates:       {first} .. {last}")?;
    }
    if !stats.per_user.is_empty() {
        writeln!(out, "Users:")?;
        let width = stats
            .per_user
            .iter()
            .map(|(u, _)| u.chars().count())
            .max()
            .unwrap_or(0);
        for (user, count) in &stats.per_user {
            writeln!(out, "  {user:<width$}  {count}")?;
        }
    }
    Ok(())
}

/// Writes the date selector lists and every date with its first message.
pub fn write_dates<W: Write>(out: &mut W, index: &DateIndex) -> Result<(), ChatviewError> {
    if index.is_empty() {
        writeln!(out, "No dated messages")?;
        return Ok(());
    }

    let join = |values: Vec<String>| values.join(" ");
    writeln!(out, "Years:  {}", join(index.years().iter().map(ToString::to_string).collect()))?;
    writeln!(
        out,
        "Months: {}",
        join(index.months().iter().map(|m| format!("{m:02}")).collect())
    )?;
    writeln!(
        out,
        "Days:   {}",
        join(index.days().iter().map(|d| format!("{d:02}")).collect())
    )?;
    for date in index.dates() {
        if let Some(offset) = index.offset_of(date) {
            writeln!(out, "{date}  #{offset}")?;
        }
    }
    Ok(())
}

/// A message plus its resolved media path, for structured exports.
#[cfg(any(feature = "json-output", feature = "csv-output"))]
#[derive(Debug, Serialize)]
struct ViewRecord<'a> {
    #[serde(flatten)]
    message: &'a Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_path: Option<PathBuf>,
}

#[cfg(any(feature = "json-output", feature = "csv-output"))]
impl<'a> ViewRecord<'a> {
    fn new(message: &'a Message, media: Option<&MediaResolver>) -> Self {
        let media_path = media
            .zip(message.attachment.as_deref())
            .and_then(|(resolver, name)| resolver.resolve(name));
        Self {
            message,
            media_path,
        }
    }
}

#[cfg(feature = "csv-output")]
fn write_csv<W: Write>(
    out: &mut W,
    messages: &[&Message],
    media: Option<&MediaResolver>,
) -> Result<(), ChatviewError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    writer.write_record([
        "Index",
        "Date",
        "Time",
        "User",
        "Type",
        "Content",
        "Attachment",
        "MediaPath",
    ])?;

    for msg in messages {
        let record = ViewRecord::new(msg, media);
        writer.write_record([
            msg.index.to_string(),
            msg.date_text.clone().unwrap_or_default(),
            msg.time_text.clone().unwrap_or_default(),
            msg.user.clone().unwrap_or_default(),
            msg.kind.to_string(),
            msg.content.clone(),
            msg.attachment.clone().unwrap_or_default(),
            record
                .media_path
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
