// SPDX-License-Identifier: MIT

//! Ordo: Conversational AI File Finder & Organizer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use ordo::config::AppConfig;
use ordo::finder::find_files;
use ordo::gemini::{ChatSession, GeminiClient};
use ordo::organizer::organize_files;
use ordo::session::SessionLoop;
use ordo::Result;

const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Ordo CLI - Conversational AI File Finder & Organizer
#[derive(Parser, Debug)]
#[command(name = "ordo")]
#[command(version = "0.1.0")]
#[command(about = "Conversational AI file finder and organizer", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive chat session (default)
    Chat,

    /// Find files by extension without involving the model
    Find {
        /// File extension to search for (e.g. 'pdf')
        extension: String,

        /// Root directory to search (defaults to the configured root)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Move files of one extension into a target folder, without the model
    Organize {
        /// File extension to move (e.g. 'pdf')
        extension: String,

        /// Directory to search for files
        source: String,

        /// Name of the folder to create inside the source directory
        #[arg(short, long, default_value = "Organized")]
        folder: String,
    },

    /// Show API status and available models
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)?;

    let api_key = std::env::var(API_KEY_VAR).ok();
    if api_key.is_none() {
        warn!(
            "{} not found in environment. Set it in a .env file; API calls will fail until then.",
            API_KEY_VAR
        );
    }

    match cli.command {
        None | Some(Commands::Chat) => run_chat(config, api_key).await,
        Some(Commands::Find { extension, path }) => {
            let root = path.unwrap_or_else(|| config.search.default_root.clone());
            for line in find_files(&extension, &root, config.search.max_results) {
                println!("{}", line);
            }
            Ok(())
        }
        Some(Commands::Organize {
            extension,
            source,
            folder,
        }) => {
            let status = organize_files(&extension, &source, &folder, config.search.max_results);
            println!("{}", status);
            Ok(())
        }
        Some(Commands::Status) => run_status(config, api_key).await,
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
    }
}

/// Run the interactive chat loop
async fn run_chat(config: AppConfig, api_key: Option<String>) -> Result<()> {
    println!("---------------------------------------------------------");
    println!("Ordo File Assistant");
    println!("I can help you find and organize files.");
    println!("Example commands:");
    println!(" - 'Find all PDFs in my documents folder'");
    println!(" - 'Move all text files in /tmp/inbox to a folder named Archive'");
    println!("Type 'exit' to quit.");
    println!("---------------------------------------------------------");

    if api_key.is_none() {
        println!("WARNING: API key missing. Please set {} in a .env file.", API_KEY_VAR);
    }

    // Absent credentials surface as per-call API errors, not a refusal
    // to start the loop.
    let client = GeminiClient::new(&config, api_key.as_deref().unwrap_or(""))?;
    let session = ChatSession::new(client, config.clone());

    SessionLoop::new(session, &config.session).run().await
}

/// Run status check
async fn run_status(config: AppConfig, api_key: Option<String>) -> Result<()> {
    println!("Ordo Status");
    println!("===========");

    match api_key {
        None => {
            println!("API key: missing ({} not set)", API_KEY_VAR);
            return Ok(());
        }
        Some(key) => {
            println!("API key: present");

            let client = GeminiClient::new(&config, &key)?;
            match client.list_models().await {
                Ok(models) => {
                    println!("\nAvailable models:");
                    for m in &models {
                        let marker = if m.starts_with(&config.api.model) {
                            "→"
                        } else {
                            " "
                        };
                        println!("  {} {}", marker, m);
                    }
                    if !models.iter().any(|m| m.starts_with(&config.api.model)) {
                        warn!("Configured model '{}' not found", config.api.model);
                    }
                }
                Err(e) => println!("  Error listing models: {}", e),
            }
        }
    }

    println!("\nConfiguration:");
    println!("  Model: {}", config.api.model);
    println!("  Default search root: {}", config.search.default_root);
    println!("  Max results: {}", config.search.max_results);

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = AppConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  Model: {}", config.api.model);
            println!("  Default search root: {}", config.search.default_root);
            info!("Retry policy: {} attempts, {}s base backoff",
                config.session.max_retries, config.session.backoff_base_secs);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["ordo"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_find_command() {
        let cli = Cli::try_parse_from(["ordo", "find", "pdf", "--path", "/tmp/docs"]).unwrap();

        match cli.command {
            Some(Commands::Find { extension, path }) => {
                assert_eq!(extension, "pdf");
                assert_eq!(path.as_deref(), Some("/tmp/docs"));
            }
            _ => panic!("Expected Find command"),
        }
    }

    #[test]
    fn test_cli_organize_command() {
        let cli = Cli::try_parse_from([
            "ordo", "organize", "txt", "/tmp/inbox", "--folder", "Archive",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Organize {
                extension,
                source,
                folder,
            }) => {
                assert_eq!(extension, "txt");
                assert_eq!(source, "/tmp/inbox");
                assert_eq!(folder, "Archive");
            }
            _ => panic!("Expected Organize command"),
        }
    }
}
