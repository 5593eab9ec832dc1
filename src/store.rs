//! In-memory message store with a filtered, paged view.
//!
//! The store keeps every parsed message in file order and derives the
//! displayed subset from three inputs: [`Filters`], [`Search`] and the
//! [`LoadCount`] window. The subset is recomputed whenever one of them
//! changes.
//!
//! # Example
//!
//! ```
//! use chatview::config::LoadCount;
//! use chatview::filter::Filters;
//! use chatview::store::MessageStore;
//! use chatview::Message;
//!
//! let messages = (0..120).map(|i| Message::new(i, "Alice", format!("msg {i}"))).collect();
//! let mut store = MessageStore::new(messages, LoadCount::Count(50));
//!
//! assert_eq!(store.displayed().len(), 50);
//! store.load_more();
//! assert_eq!(store.displayed().len(), 100);
//!
//! store.set_search("msg 11");
//! // "msg 11" and "msg 110".."msg 119"
//! assert_eq!(store.matching().len(), 11);
//! ```

use chrono::NaiveDate;
use serde::Serialize;

use crate::Message;
use crate::config::LoadCount;
use crate::error::ChatviewError;
use crate::filter::{Filters, Search};
use crate::message::MessageKind;
use crate::navigation::{DateIndex, DateJump};

/// Per-kind and per-user counts for a loaded chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatStats {
    pub total: usize,
    pub text: usize,
    pub image: usize,
    pub audio: usize,
    pub video: usize,
    /// Lines without a `[date, time]` header.
    pub headerless: usize,
    /// Header lines without an author.
    pub system: usize,
    /// Messages per user, in order of first appearance.
    pub per_user: Vec<(String, usize)>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ChatStats {
    /// Count for one message kind.
    pub fn count(&self, kind: MessageKind) -> usize {
        match kind {
            MessageKind::Text => self.text,
            MessageKind::Image => self.image,
            MessageKind::Audio => self.audio,
            MessageKind::Video => self.video,
        }
    }
}

/// All messages of one chat plus the current view over them.
#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    dates: DateIndex,
    users: Vec<String>,
    filters: Filters,
    search: Search,
    page_size: LoadCount,
    load_count: LoadCount,
    start: usize,
    matching: Vec<usize>,
}

impl MessageStore {
    /// Creates a store. `messages[i].index` must equal `i`, which
    /// [`crate::parser::parse_chat`] guarantees. A `Count(0)` page size
    /// falls back to the default.
    pub fn new(messages: Vec<Message>, load_count: LoadCount) -> Self {
        let load_count = load_count.or_default_if_zero();
        let dates = DateIndex::build(&messages);

        let mut users: Vec<String> = Vec::new();
        for user in messages.iter().filter_map(Message::user) {
            if !users.iter().any(|u| u == user) {
                users.push(user.to_string());
            }
        }

        let matching = (0..messages.len()).collect();
        Self {
            messages,
            dates,
            users,
            filters: Filters::default(),
            search: Search::default(),
            page_size: load_count,
            load_count,
            start: 0,
            matching,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Distinct authors in order of first appearance.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn date_index(&self) -> &DateIndex {
        &self.dates
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn load_count(&self) -> LoadCount {
        self.load_count
    }

    /// Position of the window inside [`matching`](Self::matching).
    pub fn window_start(&self) -> usize {
        self.start
    }

    /// Replaces the type/user filters and resets the window.
    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.reset_window();
        self.recompute();
    }

    /// Replaces the search text and resets the window. Blank clears it.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = Search::new(query);
        self.reset_window();
        self.recompute();
    }

    /// Drops filters and search.
    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.search = Search::default();
        self.recompute();
    }

    /// Sets the page size. The window keeps its start.
    pub fn set_load_count(&mut self, load_count: LoadCount) -> Result<(), ChatviewError> {
        if load_count == LoadCount::Count(0) {
            return Err(ChatviewError::invalid_value(
                "load count",
                "0",
                "a positive number or 'all'",
            ));
        }
        self.page_size = load_count;
        self.load_count = load_count;
        Ok(())
    }

    /// Extends the window by one page. Returns `false` when nothing was
    /// left to load.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        if let (LoadCount::Count(current), LoadCount::Count(page)) =
            (self.load_count, self.page_size)
        {
            self.load_count = LoadCount::Count(current + page);
        }
        true
    }

    /// Indices of all messages passing filters and search, in file order.
    pub fn matching(&self) -> &[usize] {
        &self.matching
    }

    /// Indices of the messages in the current window.
    pub fn displayed_indices(&self) -> &[usize] {
        let start = self.start.min(self.matching.len());
        let take = self.load_count.take(self.matching.len() - start);
        &self.matching[start..start + take]
    }

    /// Messages in the current window.
    pub fn displayed(&self) -> Vec<&Message> {
        self.displayed_indices()
            .iter()
            .map(|&i| &self.messages[i])
            .collect()
    }

    /// Returns `true` if matches exist past the end of the window.
    pub fn has_more(&self) -> bool {
        self.start + self.displayed_indices().len() < self.matching.len()
    }

    /// Moves the window so it starts at message `index`.
    ///
    /// If the message is hidden by the current filters or search, those are
    /// cleared first so the target is always shown.
    pub fn jump_to(&mut self, index: usize) -> Result<(), ChatviewError> {
        if index >= self.messages.len() {
            return Err(ChatviewError::message_out_of_range(index, self.messages.len()));
        }

        let position = match self.matching.binary_search(&index) {
            Ok(position) => position,
            Err(_) => {
                tracing::debug!(index, "jump target hidden by filters, clearing them");
                self.clear_filters();
                index
            }
        };
        self.start = position;
        self.load_count = self.page_size;
        Ok(())
    }

    /// Resolves `target` through the date index and jumps there.
    pub fn jump_to_date(&mut self, target: NaiveDate) -> Result<DateJump, ChatviewError> {
        let jump = self.dates.resolve(target)?;
        self.jump_to(jump.offset)?;
        Ok(jump)
    }

    /// Counts over the whole chat, ignoring filters.
    pub fn stats(&self) -> ChatStats {
        let mut stats = ChatStats {
            total: self.messages.len(),
            per_user: self.users.iter().map(|u| (u.clone(), 0)).collect(),
            ..ChatStats::default()
        };

        for msg in &self.messages {
            match msg.kind {
                MessageKind::Text => stats.text += 1,
                MessageKind::Image => stats.image += 1,
                MessageKind::Audio => stats.audio += 1,
                MessageKind::Video => stats.video += 1,
            }
            if msg.is_headerless() {
                stats.headerless += 1;
            } else if msg.is_system() {
                stats.system += 1;
            }
            if let Some(user) = msg.user() {
                if let Some(entry) = stats.per_user.iter_mut().find(|(u, _)| u == user) {
                    entry.1 += 1;
                }
            }
        }

        if let Some((first, last)) = self.dates.range() {
            stats.first_date = Some(first);
            stats.last_date = Some(last);
        }
        stats
    }

    fn reset_window(&mut self) {
        self.start = 0;
        self.load_count = self.page_size;
    }

    fn recompute(&mut self) {
        self.matching = self
            .messages
            .iter()
            .filter(|m| self.filters.matches(m) && self.search.matches(m))
            .map(|m| m.index)
            .collect();
        tracing::debug!(
            matching = self.matching.len(),
            total = self.messages.len(),
            "recomputed displayed messages"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::KindFilter;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn store(load: usize) -> MessageStore {
        let mut messages = Vec::new();
        for i in 0..10 {
            let user = if i % 2 == 0 { "Alice" } else { "Bob" };
            let mut msg = Message::new(i, user, format!("message {i}")).with_date(day(1 + i as u32 / 3));
            if i % 4 == 3 {
                msg = msg.with_attachment(MessageKind::Image, format!("IMG-{i}.jpg"));
            }
            messages.push(msg);
        }
        MessageStore::new(messages, LoadCount::Count(load))
    }

    #[test]
    fn test_initial_window() {
        let store = store(4);
        assert_eq!(store.displayed_indices(), &[0, 1, 2, 3]);
        assert!(store.has_more());
        assert_eq!(store.users(), &["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_load_more_until_exhausted() {
        let mut store = store(4);
        assert!(store.load_more());
        assert_eq!(store.displayed().len(), 8);
        assert!(store.load_more());
        assert_eq!(store.displayed().len(), 10);
        assert!(!store.has_more());
        assert!(!store.load_more());
    }

    #[test]
    fn test_load_all() {
        let mut store = store(4);
        store.set_load_count(LoadCount::All).unwrap();
        assert_eq!(store.displayed().len(), 10);
        assert!(!store.load_more());
    }

    #[test]
    fn test_zero_page_size_on_new_uses_default() {
        let messages = (0..3).map(|i| Message::new(i, "Alice", "hi")).collect();
        let mut store = MessageStore::new(messages, LoadCount::Count(0));
        assert_eq!(store.load_count(), LoadCount::default());
        assert_eq!(store.displayed().len(), 3);
        assert!(!store.has_more());
        assert!(!store.load_more());
    }

    #[test]
    fn test_zero_load_count_rejected() {
        let mut store = store(4);
        assert!(store.set_load_count(LoadCount::Count(0)).is_err());
        assert_eq!(store.load_count(), LoadCount::Count(4));
    }

    #[test]
    fn test_filters_reset_window() {
        let mut store = store(2);
        store.jump_to(6).unwrap();
        assert_eq!(store.window_start(), 6);

        store.set_filters(Filters::new().with_user("Bob"));
        assert_eq!(store.window_start(), 0);
        assert_eq!(store.matching(), &[1, 3, 5, 7, 9]);
        assert_eq!(store.displayed_indices(), &[1, 3]);
    }

    #[test]
    fn test_kind_filter_and_search() {
        let mut store = store(10);
        store.set_filters(Filters::new().with_kind(KindFilter::Only(MessageKind::Image)));
        assert_eq!(store.matching(), &[3, 7]);

        store.set_search("message 7");
        assert_eq!(store.matching(), &[7]);

        store.set_search("");
        assert_eq!(store.matching(), &[3, 7]);
    }

    #[test]
    fn test_jump_to_hidden_message_clears_filters() {
        let mut store = store(3);
        store.set_filters(Filters::new().with_user("Alice"));
        store.set_search("message");
        store.jump_to(5).unwrap();

        assert!(!store.filters().is_active());
        assert!(!store.search().is_active());
        assert_eq!(store.displayed_indices(), &[5, 6, 7]);
    }

    #[test]
    fn test_jump_to_visible_message_keeps_filters() {
        let mut store = store(2);
        store.set_filters(Filters::new().with_user("Bob"));
        store.jump_to(5).unwrap();
        assert!(store.filters().is_active());
        assert_eq!(store.displayed_indices(), &[5, 7]);
    }

    #[test]
    fn test_jump_out_of_range() {
        let mut store = store(2);
        let err = store.jump_to(99).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_jump_resets_grown_window() {
        let mut store = store(2);
        store.load_more();
        store.jump_to(4).unwrap();
        assert_eq!(store.displayed_indices(), &[4, 5]);
    }

    #[test]
    fn test_jump_to_date() {
        let mut store = store(2);
        // messages 6..=8 are on the 3rd
        let jump = store.jump_to_date(day(3)).unwrap();
        assert!(jump.exact);
        assert_eq!(store.displayed_indices(), &[6, 7]);

        let jump = store.jump_to_date(day(20)).unwrap();
        assert!(!jump.exact);
        assert_eq!(jump.date, day(4));
        assert_eq!(store.displayed_indices(), &[9]);
    }

    #[test]
    fn test_stats() {
        let stats = store(5).stats();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.image, 2);
        assert_eq!(stats.count(MessageKind::Text), 8);
        assert_eq!(stats.per_user, vec![("Alice".to_string(), 5), ("Bob".to_string(), 5)]);
        assert_eq!(stats.first_date, Some(day(1)));
        assert_eq!(stats.last_date, Some(day(4)));
    }

    #[test]
    fn test_empty_store() {
        let mut store = MessageStore::new(Vec::new(), LoadCount::default());
        assert!(store.is_empty());
        assert!(store.displayed().is_empty());
        assert!(!store.has_more());
        assert!(store.jump_to_date(day(1)).is_err());
    }
}
