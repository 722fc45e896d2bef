use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use konspekt_core::{
    Digest, Provider, Segment, Service, WhisperTranscriber, default_store_root,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "konspekt")]
#[command(
    about = "Transcribe lecture videos with Whisper and study them with AI-assisted keyword search"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// AI provider for summaries and keyword correlation
    #[arg(short, long, default_value = "grok", global = true)]
    provider: CliProvider,

    /// Transcript store directory. Defaults to the user data dir.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a video and persist its transcript
    Ingest {
        /// Path to the video file
        media: PathBuf,

        /// Spoken language hint (e.g. "en"). Defaults to autodetection.
        #[arg(short, long)]
        lang: Option<String>,

        /// Path to the ggml Whisper model
        #[arg(short, long, default_value = "ggml-base.bin")]
        model: PathBuf,
    },
    /// Search a persisted transcript for a keyword
    Query {
        /// Transcript identifier printed by `ingest`
        id: Uuid,

        /// Keyword to correlate
        keyword: String,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_segments(label: &str, segments: &[Segment]) {
    println!("{}", style(label).bold());
    if segments.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for seg in segments {
        println!("  {} {}", style(seg.timestamp()).yellow(), seg.text);
    }
    println!();
}

fn print_digest(digest: Option<&Digest>, digest_error: Option<&str>) {
    match (digest, digest_error) {
        (Some(digest), _) => {
            println!("{}", style("Summary").bold());
            println!("{}\n", digest.summary);

            if !digest.keywords.is_empty() {
                println!(
                    "{} {}\n",
                    style("Keywords:").bold(),
                    style(digest.keywords.join(", ")).yellow()
                );
            }

            println!("{}", style("Condensed transcript").bold());
            println!("{}\n", digest.condensed_text);

            if let Some(study_guide) = &digest.study_guide {
                println!("{}", style("Study guide").bold());
                println!("{}\n", study_guide);
            }
        }
        (None, Some(error)) => {
            println!(
                "{} {}\n",
                style("Summary unavailable:").red().bold(),
                error
            );
        }
        (None, None) => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let store_root = cli.store.unwrap_or_else(default_store_root);
    let service = Service::new(store_root, provider);

    println!(
        "\n{}  {}\n",
        style("konspekt").cyan().bold(),
        style("Lecture Video Study Tool").dim()
    );

    match cli.command {
        Command::Ingest { media, lang, model } => {
            let transcriber = WhisperTranscriber::new(model);

            let spinner = create_spinner("Transcribing with Whisper...");
            let response = service
                .ingest(&media, lang.as_deref(), &transcriber)
                .await?;
            spinner.finish_with_message(format!(
                "{} Transcribed: {} segments",
                style("✓").green().bold(),
                response.segments.len()
            ));

            println!(
                "\n{} {}\n",
                style("Transcript ID:").dim(),
                style(response.transcript_id).cyan()
            );
            println!("{}", style("─".repeat(60)).dim());

            print_digest(response.digest.as_ref(), response.digest_error.as_deref());
        }
        Command::Query { id, keyword } => {
            let spinner = create_spinner(&format!("Searching for \"{}\"...", keyword));
            let response = service.query(id, &keyword).await?;
            spinner.finish_with_message(format!(
                "{} Found {} explicit, {} related",
                style("✓").green().bold(),
                response.correlation.explicit.len(),
                response.correlation.related.len()
            ));

            println!();
            println!("{}", style("─".repeat(60)).dim());

            print_segments("Explicit matches", &response.correlation.explicit);
            print_segments("Related segments", &response.correlation.related);
            print_digest(response.digest.as_ref(), response.digest_error.as_deref());
        }
    }

    Ok(())
}
