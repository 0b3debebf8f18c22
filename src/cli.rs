use crate::engine::PredictEngine;
use crate::model::RequestConfig;
use crate::{picker, summary};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "breedscan",
    version,
    about = "Dog breed identification for a photo, with optional TUI"
)]
pub struct Cli {
    /// Photo to analyze on launch (jpg, jpeg or png)
    pub image: Option<PathBuf>,

    /// URL of the breed inference service
    #[arg(long, default_value = "http://localhost:5001/service")]
    pub service_url: String,

    /// Directory the photo picker browses
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Print the prediction report as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,
}

pub async fn run(args: Cli) -> Result<()> {
    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_once(args, OutputMode::Text).await;
        }
    }

    if args.json {
        return run_once(args, OutputMode::Json).await;
    }

    run_once(args, OutputMode::Text).await
}

/// Build a `RequestConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RequestConfig {
    RequestConfig {
        service_url: args.service_url.clone(),
        user_agent: format!("breedscan/{}", env!("CARGO_PKG_VERSION")),
    }
}

enum OutputMode {
    Json,
    Text,
}

/// Run one prediction cycle without the TUI and print the report.
async fn run_once(args: Cli, mode: OutputMode) -> Result<()> {
    let image = args
        .image
        .clone()
        .context("an image path is required with --json/--text")?;
    let photo = picker::load_photo(&image)?;
    let engine = PredictEngine::new(&build_config(&args))?;

    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr(format!(
        "Uploading {} ({} bytes) to {}",
        photo.path.display(),
        photo.data.len(),
        args.service_url
    )));

    let report = engine
        .run(&photo)
        .await
        .context("prediction request failed")?;

    match mode {
        OutputMode::Json => {
            let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&report)?));
        }
        OutputMode::Text => {
            for line in summary::build_text_summary(&report).lines {
                let _ = out_tx.send(OutputLine::Stdout(line));
            }
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_service() {
        let cli = Cli::parse_from(["breedscan"]);
        assert_eq!(cli.service_url, "http://localhost:5001/service");
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(cli.image.is_none());
        assert!(!cli.json);
        assert!(!cli.text);
    }

    #[test]
    fn positional_image_and_overrides_parse() {
        let cli = Cli::parse_from([
            "breedscan",
            "photos/rex.jpg",
            "--service-url",
            "http://inference:9000/service",
            "--json",
        ]);
        assert_eq!(cli.image, Some(PathBuf::from("photos/rex.jpg")));
        assert_eq!(cli.service_url, "http://inference:9000/service");
        assert!(cli.json);
    }
}
