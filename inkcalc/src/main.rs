#![warn(clippy::pedantic)]

mod http;
mod replay;
mod script;
mod settings;
mod typeset;

use anyhow::Result as AnyResult;
use clap::Parser;

/// Replay a recorded drawing session against the recognition service.
#[derive(Parser, Debug)]
#[command(name = "inkcalc", version, about)]
struct Args {
    /// Session script to replay.
    script: std::path::PathBuf,
    /// Settings file. Defaults to `settings.toml` in the user's preferences, created if missing.
    #[arg(long)]
    settings: Option<std::path::PathBuf>,
    /// Where `save` without a path writes.
    #[arg(long, default_value = "math-drawing.png")]
    out: std::path::PathBuf,
    /// Don't contact the recognition service. Submissions recognize nothing.
    #[arg(long)]
    offline: bool,
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => settings::Settings::load_or_default(path),
        None => match settings::Settings::default_path() {
            Some(path) => {
                let settings = settings::Settings::load_or_default(&path);
                if !path.exists() {
                    if let Err(e) = settings.save(&path) {
                        log::warn!("Failed to save settings:\n{e:?}");
                    }
                }
                settings
            }
            None => {
                log::warn!("No preferences dir found, using default settings.");
                settings::Settings::default()
            }
        },
    };

    let text = std::fs::read_to_string(&args.script)?;
    let events = script::parse(&text)?;
    log::info!("{} events in {:?}", events.len(), args.script);

    let recognizer: Box<dyn inkcalc_core::recognize::Recognizer> = if args.offline {
        Box::new(replay::OfflineRecognizer)
    } else {
        let timeout = settings
            .request_timeout_secs
            .map(std::time::Duration::from_secs);
        let http = http::HttpRecognizer::new(&settings.api_url, timeout)?;
        log::info!("recognizing with {}", http.endpoint());
        Box::new(http)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let session =
        replay::Replay::new(settings, Box::<typeset::LogTypesetter>::default(), args.out)?;
    let report = runtime.block_on(session.run(events, recognizer.as_ref()));

    log::info!("{report:?}");
    println!(
        "{} events, {} submissions ({} failed), {} results revealed, {} rejected",
        report.events,
        report.submissions,
        report.failed_submissions,
        report.revealed,
        report.rejected
    );
    for path in &report.saved {
        println!("saved {}", path.display());
    }
    Ok(())
}
