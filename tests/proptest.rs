//! Property-based tests for chatview.
//!
//! These tests generate random chats to check the store, date navigation and
//! parser invariants.

use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;

use chatview::prelude::*;

/// Generate (user, content, day) triples using fast strategies (no regex!)
fn arb_message() -> impl Strategy<Value = (Option<&'static str>, &'static str, Option<u32>)> {
    (
        prop::sample::select(vec![Some("Alice"), Some("Bob"), Some("Иван"), None]),
        prop::sample::select(vec![
            "Hello",
            "Good morning",
            "<attached: 00000001-PHOTO.jpg>",
            "<attached: 00000002-AUDIO.opus>",
            "<attached: 00000003-VIDEO.mp4>",
            "Привет мир",
            "🎉🔥💀 emoji",
            "",
        ]),
        // Day offset from 2024-01-01, or no date
        prop::option::weighted(0.9, 0u32..400),
    )
}

fn build(specs: Vec<(Option<&'static str>, &'static str, Option<u32>)>) -> Vec<Message> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut days: Vec<Option<u32>> = specs.iter().map(|s| s.2).collect();
    // Exports are chronological
    days.sort_unstable();

    specs
        .into_iter()
        .zip(days)
        .enumerate()
        .map(|(index, ((user, content, _), day))| {
            let (kind, attachment) = chatview::parser::classify_content(content);
            let mut msg = match user {
                Some(user) => Message::new(index, user, content),
                None => Message::headerless(index, content),
            };
            if let Some(d) = day {
                let date = base + chrono::Days::new(u64::from(d));
                msg = msg
                    .with_date(date)
                    .with_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
                msg.date_text = Some(date.format("%d/%m/%y").to_string());
                msg.time_text = Some("12:00:00".to_string());
            }
            if let Some(name) = attachment {
                msg = msg.with_attachment(kind, name);
            }
            msg
        })
        .collect()
}

fn arb_chat(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message(), 0..max_len).prop_map(build)
}

fn arb_kind_filter() -> impl Strategy<Value = KindFilter> {
    prop::sample::select(vec![
        KindFilter::All,
        KindFilter::Only(MessageKind::Text),
        KindFilter::Only(MessageKind::Image),
        KindFilter::Only(MessageKind::Audio),
        KindFilter::Only(MessageKind::Video),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // WINDOW PROPERTIES
    // ============================================

    /// The window never shows more than the load count
    #[test]
    fn window_respects_load_count(messages in arb_chat(60), page in 1usize..20, loads in 0usize..5) {
        let total = messages.len();
        let mut store = MessageStore::new(messages, LoadCount::Count(page));
        for _ in 0..loads {
            store.load_more();
        }
        let shown = store.displayed_indices().len();
        prop_assert!(shown <= page * (loads + 1));
        prop_assert!(shown <= total);
    }

    /// Loading more eventually shows everything
    #[test]
    fn load_more_reaches_end(messages in arb_chat(60), page in 1usize..20) {
        let total = messages.len();
        let mut store = MessageStore::new(messages, LoadCount::Count(page));
        while store.load_more() {}
        prop_assert!(!store.has_more());
        prop_assert_eq!(store.displayed_indices().len(), total);
    }

    // ============================================
    // FILTER PROPERTIES
    // ============================================

    /// Every matching message passes the filters, in file order
    #[test]
    fn matching_is_ordered_subset(messages in arb_chat(40), kind in arb_kind_filter()) {
        let mut store = MessageStore::new(messages, LoadCount::All);
        store.set_filters(Filters::new().with_kind(kind));

        let matching = store.matching();
        prop_assert!(matching.windows(2).all(|w| w[0] < w[1]));
        for &i in matching {
            prop_assert!(kind.matches(store.messages()[i].kind));
        }
    }

    /// Adding a user filter never adds matches
    #[test]
    fn user_filter_narrows(messages in arb_chat(40), kind in arb_kind_filter()) {
        let mut store = MessageStore::new(messages, LoadCount::All);
        store.set_filters(Filters::new().with_kind(kind));
        let wide = store.matching().len();

        store.set_filters(Filters::new().with_kind(kind).with_user("Alice"));
        prop_assert!(store.matching().len() <= wide);
        for &i in store.matching() {
            prop_assert_eq!(store.messages()[i].user(), Some("Alice"));
        }
    }

    /// Jumping always shows the target first, whatever the filters
    #[test]
    fn jump_shows_target(messages in arb_chat(40), kind in arb_kind_filter(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!messages.is_empty());
        let target = pick.index(messages.len());
        let mut store = MessageStore::new(messages, LoadCount::Count(5));
        store.set_filters(Filters::new().with_kind(kind));

        store.jump_to(target).unwrap();
        prop_assert_eq!(store.displayed_indices().first().copied(), Some(target));
    }

    // ============================================
    // DATE PROPERTIES
    // ============================================

    /// The resolved date always exists in the index and nothing is closer
    #[test]
    fn closest_date_is_closest(messages in arb_chat(40), day in 0u32..500) {
        let index = DateIndex::build(&messages);
        let target = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap() + chrono::Days::new(u64::from(day));

        match index.resolve(target) {
            Ok(jump) => {
                prop_assert_eq!(index.offset_of(jump.date), Some(jump.offset));
                prop_assert_eq!(jump.exact, jump.date == target);
                let best = (jump.date - target).num_days().abs();
                for date in index.dates() {
                    prop_assert!((date - target).num_days().abs() >= best);
                }
            }
            Err(e) => {
                prop_assert!(index.is_empty());
                prop_assert!(e.is_invalid_date());
            }
        }
    }

    // ============================================
    // PARSER PROPERTIES
    // ============================================

    /// Cleaning a line twice changes nothing
    #[test]
    fn clean_line_idempotent(line in "[a-z \u{200E}\u{200F}\u{202F}\u{FEFF}:\\[\\],/0-9]{0,40}") {
        let once = chatview::parser::clean_line(&line);
        prop_assert_eq!(chatview::parser::clean_line(&once), once);
    }

    /// Parsing never panics and indexes messages in order
    #[test]
    fn parse_chat_indexes_in_order(text in "[\\[\\]0-9/,:. a-zA-Z\n]{0,200}") {
        let messages = parse_chat(&text, &ViewerConfig::default());
        for (i, msg) in messages.iter().enumerate() {
            prop_assert_eq!(msg.index, i);
        }
    }
}
