use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use attrnorm::{output, pipeline, Engine, InputFormat, Source};
use attrnorm_core::config::Config;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "attrnorm", about = "Normalize scraped specification-table rows into typed attributes")]
struct Cli {
    /// Write debug logs to /tmp/attrnorm-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/attrnorm/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize key/value rows from FILE (or stdin) into JSON lines.
    Normalize {
        file: Option<PathBuf>,
        /// Input line format. Defaults to the config's `[input] format`.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Emit every row with its outcome, not only recognized ones.
        #[arg(long)]
        audit: bool,
    },
    /// Classify a single key/value pair and explain the result.
    Check { key: String, value: String },
    /// List the effective rule table in resolution order.
    Rules,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Tsv,
    Jsonl,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Tsv => InputFormat::Tsv,
            FormatArg::Jsonl => InputFormat::JsonLines,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to built-in config");
            Config::defaults()
        }),
    };
    let engine = Engine::from_config(&config)?;
    tracing::debug!(rules = engine.rules().len(), "rule table built");

    match cli.command {
        Command::Normalize {
            file,
            format,
            audit,
        } => {
            let source = file.map_or(Source::Stdin, Source::File);
            let format = format.map_or(config.input.format, Into::into);
            let audit = audit || config.output.audit;

            let stdout = std::io::stdout();
            let mut out = std::io::BufWriter::new(stdout.lock());
            let summary = pipeline::run(&engine, source, format, audit, &mut out).await?;
            out.flush()?;

            let tally = &summary.tally;
            tracing::info!(
                pairs = tally.total(),
                recognized = tally.recognized,
                unrecognized_key = tally.unrecognized_key,
                malformed_value = tally.malformed_value,
                malformed_lines = summary.feed.malformed,
                non_extraction = %format!("{:.1}%", tally.non_extraction_rate() * 100.0),
                "normalization finished"
            );
        }
        Command::Check { key, value } => {
            print!("{}", output::render_check(&engine, &key, &value));
        }
        Command::Rules => {
            print!("{}", output::render_rules(engine.rules()));
        }
    }

    Ok(())
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/attrnorm-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("attrnorm debug log started; tail -f /tmp/attrnorm-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
    Ok(())
}
