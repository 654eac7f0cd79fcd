//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod chat;
mod config_cmd;
mod documents;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::actions::Actions;
use crate::analysis::Analyzer;
use crate::config::{load_settings_with_options, Config, LoadOptions, Settings};
use crate::llm::LlmClient;
use crate::models::Document;
use crate::store::RecentDocuments;

#[derive(Parser)]
#[command(name = "nomiko")]
#[command(about = "Legal document analysis: summaries, glossary, fairness, contradictions and Q&A")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recently analyzed documents
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },

    /// Summarize each clause of a document in plain English
    Summarize {
        /// Document ID
        id: String,
    },

    /// Build a glossary of legal terms used in a document
    Glossary {
        /// Document ID
        id: String,
        /// Also read each entry aloud into a WAV file in this directory
        #[arg(long, value_name = "DIR")]
        speak: Option<PathBuf>,
    },

    /// Flag clauses that are unfair under the configured jurisdiction
    Benchmark {
        /// Document ID
        id: String,
    },

    /// Find pairs of clauses that contradict each other
    Contradictions {
        /// Document ID
        id: String,
    },

    /// List the clauses relevant to a question
    Ask {
        /// Document ID
        id: String,
        /// Question about the document
        question: String,
    },

    /// Chat with the assistant about a document
    Chat {
        /// Document ID
        id: String,
    },

    /// Read text aloud into an audio file
    Speak {
        /// Text to read
        text: String,
        /// Output file
        #[arg(short, long, default_value = "speech.wav")]
        output: PathBuf,
    },

    /// Extract text from an image, PDF or DOCX file
    Extract {
        /// File to read
        file: PathBuf,
        /// Use OCR instead of general text extraction
        #[arg(long)]
        ocr: bool,
    },

    /// Start the JSON API server
    Serve {
        /// Address to bind to (default: from config, else 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default: from config, else 3030)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum DocsCommands {
    /// Add a document from text, a file, or stdin
    Add {
        /// Display name (default: file name or first words)
        #[arg(short, long)]
        name: Option<String>,
        /// Document text
        #[arg(long, conflicts_with_all = ["file", "stdin"])]
        text: Option<String>,
        /// Text, image, PDF or DOCX file
        #[arg(long, conflicts_with = "stdin")]
        file: Option<PathBuf>,
        /// Read document text from stdin
        #[arg(long)]
        stdin: bool,
        /// Read images with OCR
        #[arg(long)]
        ocr: bool,
    },

    /// List documents, newest first
    List,

    /// Show a document
    Show {
        /// Document ID
        id: String,
    },

    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
}

/// Resolved settings shared by all commands.
pub(crate) struct Context {
    pub settings: Settings,
    pub config: Config,
    pub json: bool,
}

impl Context {
    /// Open the recent-documents store.
    pub fn documents(&self) -> anyhow::Result<RecentDocuments> {
        Ok(self.settings.open_documents()?)
    }

    /// Build the analysis actions against the configured LLM.
    pub fn actions(&self) -> anyhow::Result<Actions> {
        let client = LlmClient::new(self.config.llm.clone())?;
        let analyzer = Analyzer::new(Arc::new(client), self.config.analyzer_settings());
        Ok(Actions::new(analyzer))
    }

    /// Look up a document by ID or fail with a readable error.
    pub fn document(&self, id: &str) -> anyhow::Result<Document> {
        self.documents()?
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };
    let (settings, config) =
        load_settings_with_options(options).await.map_err(|e| anyhow::anyhow!(e))?;

    let ctx = Context {
        settings,
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Docs { command } => match command {
            DocsCommands::Add {
                name,
                text,
                file,
                stdin,
                ocr,
            } => {
                let source = documents::AddSource::from_args(text, file, stdin)?;
                documents::cmd_docs_add(&ctx, source, name.as_deref(), ocr).await
            }
            DocsCommands::List => documents::cmd_docs_list(&ctx),
            DocsCommands::Show { id } => documents::cmd_docs_show(&ctx, &id),
            DocsCommands::Delete { id } => documents::cmd_docs_delete(&ctx, &id),
        },
        Commands::Summarize { id } => analyze::cmd_summarize(&ctx, &id).await,
        Commands::Glossary { id, speak } => {
            analyze::cmd_glossary(&ctx, &id, speak.as_deref()).await
        }
        Commands::Benchmark { id } => analyze::cmd_benchmark(&ctx, &id).await,
        Commands::Contradictions { id } => analyze::cmd_contradictions(&ctx, &id).await,
        Commands::Ask { id, question } => analyze::cmd_ask(&ctx, &id, &question).await,
        Commands::Chat { id } => chat::cmd_chat(&ctx, &id).await,
        Commands::Speak { text, output } => analyze::cmd_speak(&ctx, &text, &output).await,
        Commands::Extract { file, ocr } => analyze::cmd_extract(&ctx, &file, ocr).await,
        Commands::Serve { host, port } => {
            serve::cmd_serve(&ctx, host.as_deref(), port).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&ctx),
        },
    }
}
