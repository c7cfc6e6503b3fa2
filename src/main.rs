use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;
use welcometale_core::config::{ConfigStore, DEFAULT_CONFIG_FILE};
use welcometale_core::messages::MessageKind;
use welcometale_core::update::UpdateStatus;
use welcometale_text::{
    encode_json, strip_color_codes, to_ansi, FormatOptions, Formatter, Segment,
};

/// WelcomeTale message tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the config file. Missing keys are filled in with defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print JSON chat components instead of colored text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the join, welcome and leave messages for a player.
    Preview {
        #[arg(default_value = "Steve")]
        player: String,
    },
    /// Format a message written with color codes.
    Format {
        text: String,
        /// Leave URLs as plain text.
        #[arg(long)]
        no_links: bool,
    },
    /// Remove color codes from a message.
    Strip { text: String },
    /// Compare this build against a saved GitHub release response.
    CheckUpdate { release_json: PathBuf },
}

fn print_segments(segments: &[Segment], json: bool) -> Result<()> {
    if json {
        anstream::println!("{}", encode_json(segments)?);
    } else {
        anstream::println!("{}", to_ansi(segments));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "welcometale.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("WELCOMETALE_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stderr))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Preview { player } => {
            let store = ConfigStore::open(&args.config)
                .with_context(|| format!("loading {}", args.config.display()))?;
            info!("Loaded config from {}", store.path().display());
            let config = store.get();
            for kind in MessageKind::ALL {
                match kind.render(&config, &player) {
                    Some(segments) => {
                        anstream::println!("[{}]", kind.name());
                        print_segments(&segments, args.json)?;
                    }
                    None => info!("The {} message is empty and won't be sent", kind.name()),
                }
            }
            if !config.disable_default_join_message {
                info!("The server's default join message is still broadcast");
            }
        }
        Command::Format { text, no_links } => {
            let formatter = Formatter::new(FormatOptions { links: !no_links });
            print_segments(&formatter.format(&text), args.json)?;
        }
        Command::Strip { text } => {
            anstream::println!("{}", strip_color_codes(&text));
        }
        Command::CheckUpdate { release_json } => {
            let store = ConfigStore::open(&args.config)
                .with_context(|| format!("loading {}", args.config.display()))?;
            if !store.get().check_for_updates {
                info!("Update checks are disabled in {}", args.config.display());
                return Ok(());
            }
            let body = fs::read_to_string(&release_json)
                .with_context(|| format!("reading {}", release_json.display()))?;
            let status = UpdateStatus::evaluate(env!("CARGO_PKG_VERSION"), &body);
            status.log_notice();
            if status.using_latest {
                info!("Running the latest version (v{})", status.current);
            }
        }
    }

    Ok(())
}
