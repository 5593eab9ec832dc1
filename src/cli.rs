//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - global options (input file, media folder, date order)
//! - [`Command`] - what to do with the loaded chat
//! - [`ShowArgs`] - filters and paging for `chatview show`
//!
//! Value types ([`KindFilter`], [`LoadCount`], [`ViewFormat`], [`DateOrder`])
//! are parsed through their `FromStr` impls, so the CLI accepts exactly what
//! the library and the interactive session accept.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{LoadCount, ViewerConfig};
use crate::filter::{Filters, KindFilter};
use crate::parser::DateOrder;
use crate::render::ViewFormat;

/// Browse exported WhatsApp chats: search, filter, jump to dates,
/// find attached media and bookmark messages.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatview")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatview _chat.txt
    chatview _chat.txt show --type image --user Alice
    chatview _chat.txt show --search birthday --all --format json
    chatview _chat.txt show --date 2024-01-15 -n 20
    chatview _chat.txt stats
    chatview _chat.txt browse")]
pub struct Args {
    /// Path to the exported chat (.txt)
    pub input: PathBuf,

    /// Folder with the exported attachments [default: the chat file's folder]
    #[arg(long, value_name = "DIR", global = true)]
    pub media_dir: Option<PathBuf>,

    /// Show lines without a [date, time] header as separate messages
    #[arg(long, global = true)]
    pub no_merge: bool,

    /// Date component order: day-first, month-first, year-first [default: detect]
    #[arg(long, value_name = "ORDER", global = true)]
    pub date_order: Option<DateOrder>,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Builds the library configuration from the global flags.
    pub fn viewer_config(&self) -> ViewerConfig {
        let mut config = ViewerConfig::new().with_merge_continuations(!self.no_merge);
        if let Some(order) = self.date_order {
            config = config.with_date_order(order);
        }
        if let Some(dir) = &self.media_dir {
            config = config.with_media_dir(dir.clone());
        }
        if let Some(Command::Show(show)) = &self.command {
            config = config.with_load_count(show.load_count());
        }
        config
    }

    /// The subcommand to run; `show` when none was given.
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Show(ShowArgs::default()))
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print messages (default)
    Show(ShowArgs),

    /// List users in order of first appearance
    Users,

    /// List dates that have messages
    Dates,

    /// Message counts per type and user
    Stats,

    /// Interactive session reading commands from stdin
    Browse,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ShowArgs {
    /// Message type: all, text, image, video, audio
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "all")]
    pub kind: KindFilter,

    /// Only messages from this user
    #[arg(short, long, value_name = "USER")]
    pub user: Option<String>,

    /// Case-insensitive text search
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Messages to show [default: 50]
    #[arg(short = 'n', long, value_name = "N|all")]
    pub limit: Option<LoadCount>,

    /// Show every matching message
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,

    /// Start at this date, or the closest one with messages
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "goto")]
    pub date: Option<String>,

    /// Start at this message index
    #[arg(long, value_name = "INDEX")]
    pub goto: Option<usize>,

    /// Output format: text, json, csv
    #[arg(short, long, default_value = "text")]
    pub format: ViewFormat,
}

impl ShowArgs {
    pub fn load_count(&self) -> LoadCount {
        if self.all {
            LoadCount::All
        } else {
            self.limit.unwrap_or_default()
        }
    }

    pub fn filters(&self) -> Filters {
        let filters = Filters::new().with_kind(self.kind);
        match &self.user {
            Some(user) => filters.with_user(user.clone()),
            None => filters,
        }
    }
}
