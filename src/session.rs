//! Interactive browsing session.
//!
//! A [`Session`] reads one command per line and drives the store, date
//! navigation and bookmarks, printing the current view after every change.
//! Errors are reported inline and never end the session.
//!
//! # Example
//!
//! ```rust
//! use chatview::config::LoadCount;
//! use chatview::parser::ChatParser;
//! use chatview::session::Session;
//! use chatview::store::MessageStore;
//!
//! let messages = ChatParser::new().parse_str(
//!     "[15/01/24, 10:30:45] Alice: Hello\n[16/01/24, 08:00:00] Bob: Morning",
//! );
//! let mut session = Session::new(MessageStore::new(messages, LoadCount::Count(50)), None);
//!
//! let mut out = Vec::new();
//! session.run("user Bob\nbookmark 1\nbookmarks\nquit\n".as_bytes(), &mut out)?;
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("Morning"));
//! assert!(text.contains("0: #1"));
//! # Ok::<(), chatview::ChatviewError>(())
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::bookmarks::Bookmarks;
use crate::config::LoadCount;
use crate::error::ChatviewError;
use crate::filter::{Filters, KindFilter, UserFilter};
use crate::media::MediaResolver;
use crate::navigation::parse_target_date;
use crate::render::{ViewFormat, write_dates, write_stats, write_view};
use crate::store::MessageStore;

const HELP: &str = "\
commands:
  show                 print the current page
  more                 load one more page
  load <n|all>         set the page size
  search [text]        search user and content (no text clears)
  type <kind>          all, text, image, video, audio
  user <name|all>      only messages from one user (\"all\" for a user named all)
  users                list users
  dates                list dates with messages
  date <YYYY-MM-DD>    jump to a date (or the closest one)
  goto <index>         jump to a message
  bookmark <index>     bookmark a message
  note <pos> <text>    attach a note to a bookmark
  unbookmark <pos>     delete a bookmark
  bookmarks            list bookmarks
  jump <pos>           jump to a bookmarked message
  stats                message counts
  help                 this text
  quit                 leave";

/// One parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    More,
    Load(LoadCount),
    Search(String),
    Type(KindFilter),
    User(UserFilter),
    Users,
    Dates,
    Date(NaiveDate),
    Goto(usize),
    Bookmark(usize),
    Note(usize, String),
    Unbookmark(usize),
    Bookmarks,
    Jump(usize),
    Stats,
    Help,
    Quit,
}

fn parse_number(what: &'static str, arg: &str) -> Result<usize, ChatviewError> {
    arg.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| ChatviewError::invalid_value(what, arg, "a non-negative number"))
}

impl FromStr for Command {
    type Err = ChatviewError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(n, a)| (n, a.trim()));

        let command = match name.to_lowercase().as_str() {
            "show" | "ls" => Command::Show,
            "more" | "m" => Command::More,
            "load" => Command::Load(arg.parse()?),
            "search" | "/" => Command::Search(arg.to_string()),
            "type" => Command::Type(arg.parse()?),
            "user" => Command::User(UserFilter::parse(arg)),
            "users" => Command::Users,
            "dates" => Command::Dates,
            "date" => Command::Date(parse_target_date(arg)?),
            "goto" | "g" => Command::Goto(parse_number("message index", arg)?),
            "bookmark" | "b" => Command::Bookmark(parse_number("message index", arg)?),
            "note" => {
                let (pos, text) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
                Command::Note(parse_number("bookmark", pos)?, text.trim().to_string())
            }
            "unbookmark" => Command::Unbookmark(parse_number("bookmark", arg)?),
            "bookmarks" => Command::Bookmarks,
            "jump" | "j" => Command::Jump(parse_number("bookmark", arg)?),
            "stats" => Command::Stats,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(ChatviewError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Browsing state for one loaded chat.
#[derive(Debug)]
pub struct Session {
    store: MessageStore,
    bookmarks: Bookmarks,
    media: Option<MediaResolver>,
}

impl Session {
    pub fn new(store: MessageStore, media: Option<MediaResolver>) -> Self {
        Self {
            store,
            bookmarks: Bookmarks::new(),
            media,
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    /// Reads commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), ChatviewError> {
        writeln!(
            out,
            "{} messages from {} users. Type `help` for commands.",
            self.store.len(),
            self.store.users().len()
        )?;
        self.show(out)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let result = line
                .parse::<Command>()
                .and_then(|command| self.execute(command, out));
            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(ChatviewError::Io(e)) => return Err(e.into()),
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }
        Ok(())
    }

    /// Applies one command and prints its result.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow, ChatviewError> {
        tracing::debug!(?command, "session command");
        match command {
            Command::Show => self.show(out)?,
            Command::More => {
                if self.store.load_more() {
                    self.show(out)?;
                } else {
                    writeln!(out, "nothing more to load")?;
                }
            }
            Command::Load(count) => {
                self.store.set_load_count(count)?;
                self.show(out)?;
            }
            Command::Search(query) => {
                self.store.set_search(query);
                self.show(out)?;
            }
            Command::Type(kind) => {
                let filters = Filters {
                    kind,
                    ..self.store.filters().clone()
                };
                self.store.set_filters(filters);
                self.show(out)?;
            }
            Command::User(user) => {
                let filters = Filters {
                    user,
                    ..self.store.filters().clone()
                };
                self.store.set_filters(filters);
                self.show(out)?;
            }
            Command::Users => {
                for user in self.store.users() {
                    writeln!(out, "{user}")?;
                }
            }
            Command::Dates => write_dates(out, self.store.date_index())?,
            Command::Date(target) => {
                let jump = self.store.jump_to_date(target)?;
                if !jump.exact {
                    writeln!(
                        out,
                        "No messages on {target}. Jumping to closest date: {}",
                        jump.date
                    )?;
                }
                self.show(out)?;
            }
            Command::Goto(index) => {
                self.store.jump_to(index)?;
                self.show(out)?;
            }
            Command::Bookmark(index) => {
                let message = self
                    .store
                    .get(index)
                    .ok_or_else(|| ChatviewError::message_out_of_range(index, self.store.len()))?;
                let pos = self.bookmarks.add(message);
                writeln!(out, "bookmark {pos} -> #{index}")?;
            }
            Command::Note(pos, text) => {
                if self.bookmarks.add_note(pos, &text)? {
                    writeln!(out, "note saved on bookmark {pos}")?;
                } else {
                    writeln!(out, "empty note ignored")?;
                }
            }
            Command::Unbookmark(pos) => {
                let removed = self.bookmarks.delete(pos)?;
                writeln!(out, "removed bookmark to #{}", removed.message_index)?;
            }
            Command::Bookmarks => self.list_bookmarks(out)?,
            Command::Jump(pos) => {
                let index = self.bookmarks.target(pos)?;
                self.store.jump_to(index)?;
                self.show(out)?;
            }
            Command::Stats => write_stats(out, &self.store.stats())?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<(), ChatviewError> {
        let shown = self.store.displayed();
        if shown.is_empty() {
            writeln!(out, "(no messages)")?;
            return Ok(());
        }

        write_view(out, &shown, ViewFormat::Text, self.media.as_ref())?;

        let first = self.store.window_start() + 1;
        let last = self.store.window_start() + shown.len();
        let total = self.store.matching().len();
        if self.store.has_more() {
            writeln!(out, "-- {first}-{last} of {total}, `more` for the next page --")?;
        } else {
            writeln!(out, "-- {first}-{last} of {total} --")?;
        }
        Ok(())
    }

    fn list_bookmarks<W: Write>(&self, out: &mut W) -> Result<(), ChatviewError> {
        if self.bookmarks.is_empty() {
            writeln!(out, "No bookmarks yet")?;
            return Ok(());
        }
        for (pos, bookmark) in self.bookmarks.iter().enumerate() {
            writeln!(
                out,
                "{pos}: #{} ({}) {}",
                bookmark.message_index,
                bookmark.created_at.format("%Y-%m-%d"),
                bookmark.preview.replace('\n', " ")
            )?;
            if let Some(note) = &bookmark.note {
                writeln!(out, "    note: {note}")?;
            }
        }
        Ok(())
    }
}
