use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pdf_summarizer::{
    client::{ClientSession, HttpTransport, SelectedFile},
    prompt::Tone,
    utils::{init_logger, LogFormat},
};

/// Summarize a PDF through a running pdf-summarizer service
#[derive(Debug, Parser)]
#[command(name = "pdf-summarize", version, about)]
struct Args {
    /// PDF file to summarize
    file: PathBuf,

    /// Base URL of the summarizer service
    #[arg(long, env = "PDF_SUMMARIZER_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Request a summary in this tone after the default one
    #[arg(long, value_enum)]
    tone: Option<Tone>,

    /// Ask for a fresh summary in the selected tone once more
    #[arg(long)]
    regenerate: bool,

    /// Directory to save summary.txt into
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(LogFormat::Pretty);
    let args = Args::parse();

    let file = SelectedFile::from_path(&args.file)
        .await
        .with_context(|| format!("could not read {}", args.file.display()))?;

    let mut session = ClientSession::new(HttpTransport::new(&args.server));

    let outcome = async {
        session.handle_file(file).await?;
        eprintln!(
            "Preview: {} page(s) at {}x scale",
            session.preview().len(),
            pdf_summarizer::client::PREVIEW_SCALE
        );
        if let Some(tone) = args.tone {
            session.select_tone(tone).await?;
        }
        if args.regenerate {
            session.regenerate().await?;
        }
        Ok::<_, pdf_summarizer::client::ClientError>(())
    }
    .await;

    if let Err(e) = outcome {
        tracing::error!(state = %session.state(), "{}", session.status());
        return Err(e.into());
    }

    println!("{}", session.copy_summary()?);

    if let Some(dir) = args.output {
        let path = session.download_summary(&dir).await?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}
