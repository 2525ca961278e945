use anyhow::Context;
use clap::Parser;
use scenarist_core::protocol::StoryInput;
use scenarist_engine::config::ConfigLoader;
use scenarist_engine::formatter;
use scenarist_engine::{HttpCompletionClient, ScenarioAssembler};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "scenarist",
    version,
    about = "Derive Gherkin test scenarios from user stories"
)]
struct Args {
    /// User story text ("As a ROLE, I want to ... so that ..."). Reads
    /// stdin when neither this nor --file is given.
    story: Option<String>,

    /// Read the story from a file
    #[arg(long, conflicts_with = "story")]
    file: Option<PathBuf>,

    /// HTML fragment file supplying UI context for the generated text
    #[arg(long)]
    html: Option<PathBuf>,

    /// Emit the scenario records as JSON
    #[arg(long)]
    json: bool,

    /// Skip the LLM enhancement pass even when configured
    #[arg(long)]
    no_enhance: bool,

    /// Explicit configuration file (default: ./scenarist.yaml, then
    /// ~/.scenarist/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so stdout stays clean for the generated output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };

    let story_text = match (&args.story, &args.file) {
        (Some(story), _) => story.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading story from {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading story from stdin")?;
            buffer
        }
    };

    let html = match &args.html {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading html from {}", path.display()))?,
        ),
        None => None,
    };

    let enhancement = config.enhancement;
    let assembler = if enhancement.enabled && !args.no_enhance {
        let client = HttpCompletionClient::from_config(&enhancement);
        ScenarioAssembler::with_client(enhancement, Arc::new(client))
    } else {
        ScenarioAssembler::new(enhancement)
    };

    let input = StoryInput::text(story_text);
    let records = assembler.assemble(&input, html.as_deref()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", formatter::format_records(&records));
    }

    Ok(())
}
