//! # chatview CLI
//!
//! Command-line interface for the chatview library.

use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use chatview::ChatviewError;
use chatview::cli::{Args, Command, ShowArgs};
use chatview::media::MediaResolver;
use chatview::navigation::parse_target_date;
use chatview::parser::ChatParser;
use chatview::render::{ViewFormat, write_dates, write_stats, write_view};
use chatview::session::Session;
use chatview::store::MessageStore;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), ChatviewError> {
    let config = args.viewer_config();
    let messages = ChatParser::with_config(config.clone()).parse(&args.input)?;
    let media = match &config.media_dir {
        Some(dir) => MediaResolver::new(dir),
        None => MediaResolver::for_chat_file(&args.input),
    };
    let mut store = MessageStore::new(messages, config.load_count);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match args.command_or_default() {
        Command::Show(show) => run_show(&mut store, &show, &media, &mut out)?,
        Command::Users => {
            for user in store.users() {
                writeln!(out, "{user}")?;
            }
        }
        Command::Dates => write_dates(&mut out, store.date_index())?,
        Command::Stats => write_stats(&mut out, &store.stats())?,
        Command::Browse => {
            let stdin = io::stdin();
            let mut session = Session::new(store, Some(media));
            session.run(stdin.lock(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn run_show<W: Write>(
    store: &mut MessageStore,
    show: &ShowArgs,
    media: &MediaResolver,
    out: &mut W,
) -> Result<(), ChatviewError> {
    store.set_filters(show.filters());
    if let Some(query) = &show.search {
        store.set_search(query.clone());
    }

    if let Some(date) = &show.date {
        let target = parse_target_date(date)?;
        let jump = store.jump_to_date(target)?;
        if !jump.exact {
            eprintln!(
                "No messages on {}. Jumping to closest date: {}",
                target, jump.date
            );
        }
    } else if let Some(index) = show.goto {
        store.jump_to(index)?;
    }

    let shown = store.displayed();
    write_view(out, &shown, show.format, Some(media))?;

    if show.format == ViewFormat::Text {
        let total = store.matching().len();
        if shown.is_empty() {
            writeln!(out, "(no messages)")?;
        } else {
            let first = store.window_start() + 1;
            let last = store.window_start() + shown.len();
            writeln!(out, "-- {first}-{last} of {total} --")?;
        }
    }
    Ok(())
}
