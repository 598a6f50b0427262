//! Drive a session end to end against the configured service and print what
//! the panel would show.
//!
//!     panel_check notes.zip
//!     panel_check --connect
//!     panel_check --connect --email me@example.com --password ...

use sift::config::PanelConfig;
use sift::panel;
use sift::session::SourceSession;
use sift::sync::{Credentials, HttpBackend};
use sift::ArchiveTextExtractor;

/// Journal logger that passes this crate at info/debug and everything else at warn.
struct FilteredJournal {
    inner: systemd_journal_logger::JournalLog,
}

impl log::Log for FilteredJournal {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        if metadata.target().starts_with("sift") || metadata.target().starts_with("panel_check") {
            let max = if sift::debug_logging() {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            };
            metadata.level() <= max
        } else {
            metadata.level() <= log::LevelFilter::Warn
        }
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

fn init_logging(config: &PanelConfig) {
    sift::set_debug_logging(config.debug_logging);
    match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => {
            let journal = journal.with_syslog_identifier("sift-panel-check".to_string());
            if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                // Global max must be Debug so the toggle can let debug records through
                log::set_max_level(log::LevelFilter::Debug);
            }
        }
        Err(e) => eprintln!("Journal logging unavailable: {}", e),
    }
}

enum Source {
    Archive(String),
    Account(Option<Credentials>),
}

fn parse_args(args: &[String]) -> Result<Source, String> {
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    if args.iter().any(|a| a == "--connect") {
        let creds = match (value_of("--email"), value_of("--password")) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            (None, None) => None,
            _ => return Err("--email and --password must be given together".to_string()),
        };
        return Ok(Source::Account(creds));
    }

    args.iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .map(Source::Archive)
        .ok_or_else(|| "usage: panel_check <archive.zip> | --connect [--email E --password P]".to_string())
}

fn print_events(view: &sift::core::view::CalendarView) {
    if view.is_empty() {
        println!("  No tasks available");
        return;
    }
    for group in &view.groups {
        println!("  {}", group.label);
        for task in &group.tasks {
            println!("    {:<12} {}", task.time_label(), task.title_label());
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = PanelConfig::default_path();
    let config = match PanelConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    init_logging(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let source = match parse_args(&args) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let backend = match HttpBackend::new(&config.backend_url, config.request_timeout()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("=== Panel check ({}) ===\n", backend.base_url());

    let mut session = SourceSession::new(ArchiveTextExtractor::new(config.text_suffix.clone()));
    let phase = match source {
        Source::Archive(path) => {
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Cannot read {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            let name = std::path::Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            session.select_upload(&name, None, &bytes)
        }
        Source::Account(Some(creds)) => session.connect_with_credentials(&backend, &creds).await,
        Source::Account(None) => session.connect_account(&backend).await,
    };

    let state = session.state();
    println!("Phase:      {:?}", phase);
    println!("Source:     {:?}", state.active_source);
    println!("Connection: {:?}", state.connection);
    if let Some(line) = state.status_line() {
        println!("Status:     {}", line);
    }
    if let Some(err) = &state.error {
        println!("Error:      {}", err);
    }

    let Some(text) = session.text() else {
        println!("\nNo text available");
        return;
    };

    println!("\n--- Calendar ---");
    match panel::load_calendar(&backend, text).await {
        Ok(view) => print_events(&view),
        Err(e) => println!("  Error fetching events: {}", e),
    }

    println!("\n--- Summary ---");
    match panel::summarize(&backend, text, config.summary_word_limit).await {
        panel::Summary::Remote(s) => println!("  {}", s),
        panel::Summary::Preview(s) => println!("  (local preview) {}", s),
    }

    println!("\n=== Done ===");
}
