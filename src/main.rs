//! urlgist CLI - Summarise YouTube videos and webpages
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use urlgist::config::{self, Config};
use urlgist::logging::{self, LogTarget};
use urlgist::request::parse_url;
use urlgist::scraper::WebPageLoader;
use urlgist::youtube::YoutubeTranscriptLoader;
use urlgist::{ui, ContentLoader, DispatchError, HostedDispatcher, SourceKind, Summary, SummarizeRequest};

#[derive(Parser)]
#[command(name = "urlgist")]
#[command(author, version, about = "Summarise YouTube videos and webpages with a hosted LLM", long_about = None)]
struct Cli {
    /// Config file to use instead of urlgist.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a YouTube video or webpage by URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Hugging Face API token (defaults to HF_API_TOKEN, then a prompt)
        #[arg(long)]
        token: Option<String>,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Summarise { url, token, raw }) => {
            logging::init(&config.log, LogTarget::Stderr)?;

            if raw {
                return print_raw(&config, &url).await;
            }

            let credential = match token.or_else(config::token_from_env) {
                Some(token) => token,
                None => prompt_token()?,
            };

            let dispatcher = HostedDispatcher::from_config(&config)?;
            println!("⏳ Fetching and summarising: {}", url);

            match dispatcher.dispatch(&SummarizeRequest::new(credential, url)).await {
                Ok(summary) => print_summary(&summary),
                Err(err) => {
                    print_error(&err);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "urlgist", &mut std::io::stdout());
        }
        None => {
            // Default: Launch the TUI
            logging::init(&config.log, LogTarget::FileOnly)?;
            let dispatcher = HostedDispatcher::from_config(&config)?;
            ui::run(&dispatcher, config::token_from_env()).await?;
        }
    }

    Ok(())
}

/// Ask for the token on a terminal; otherwise leave it blank for validation to reject
fn prompt_token() -> anyhow::Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(String::new());
    }

    let token = dialoguer::Password::new()
        .with_prompt("🔐 Hugging Face API token")
        .allow_empty_password(true)
        .interact()?;
    Ok(token)
}

/// Load the URL and print what the loader extracted, without summarising
async fn print_raw(config: &Config, url: &str) -> anyhow::Result<()> {
    let url = parse_url(url)?;

    let documents = match SourceKind::classify(&url) {
        SourceKind::VideoPlatform => YoutubeTranscriptLoader::new(&config.loader)?.load(&url).await?,
        SourceKind::GenericPage => WebPageLoader::new(&config.loader)?.load(&url).await?,
    };

    for doc in &documents {
        let title = doc
            .metadata
            .get("title")
            .map(String::as_str)
            .unwrap_or("No title");
        println!("\n=== {} ===\n", title);

        for (key, value) in doc.metadata.iter().filter(|(k, _)| k.as_str() != "title") {
            println!("{}: {}", key.dimmed(), value);
        }
        println!("\n{}", doc.page_content);
        println!("\n--- Extracted {} characters ---", doc.page_content.len());
    }

    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("\n{}", "✅ Summary generated successfully!".green().bold());
    println!("\n{}\n", "📄 Summary:".bold());
    println!("{}", summary.text);
    println!(
        "\n{}",
        format!(
            "--- {} words from {} {} document(s) ---",
            summary.word_count(),
            summary.document_count,
            summary.source
        )
        .dimmed()
    );
}

fn print_error(err: &DispatchError) {
    eprintln!("\n{}", format!("⚠️  {}", err).red().bold());
    if let Some(detail) = err.detail() {
        eprintln!("{}", detail);
    }
}
