//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, wires the configured backend
//! client together and dispatches to the subcommand runners.

pub mod auth;
pub mod complete;
pub mod conversations;
pub mod settings;
pub mod theme;

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, warn};

use crate::api::{ApiBase, ChatClient};
use crate::core::config::{Config, Endpoints};
use crate::core::theme::ThemeVariant;
use crate::core::token::{KeyringTokenStore, TokenStore};
use settings::SettingRegistry;

#[derive(Parser)]
#[command(name = "palaver")]
#[command(version)]
#[command(about = "Command-line client for a conversational chat backend")]
#[command(
    long_about = "Palaver talks to a chat backend over HTTP: it signs in, replays prompts \
through the playground with streamed completions, browses and deletes conversations and \
records feedback on messages.\n\n\
Authentication:\n\
  Use 'palaver login' (or 'palaver header-login' behind an auth proxy). The access token \
is kept in your system keyring, one entry per backend endpoint.\n\n\
Environment Variables:\n\
  PALAVER_HTTP_ENDPOINT   Backend base URL (overrides the config file)\n\
  PALAVER_WS_ENDPOINT     Realtime session URL (defaults to the HTTP endpoint)\n\
  PALAVER_PASSWORD        Password for 'palaver login' when --password is omitted\n\
  RUST_LOG                Log filter for diagnostics written to stderr"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Log requests and stream events to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a username and password
    Login {
        #[arg(short = 'u', long)]
        username: String,
        /// Password (read from PALAVER_PASSWORD when omitted)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Sign in using identity headers supplied by an auth proxy
    HeaderLogin,
    /// Forget the stored access token
    Logout,
    /// Replay a prompt through the playground and stream the completion
    Complete {
        /// JSON file holding the prompt to replay
        #[arg(long, value_name = "FILE")]
        prompt: std::path::PathBuf,
        /// Replace the text of message INDEX before replaying
        #[arg(long = "edit", value_name = "INDEX=TEXT", value_parser = complete::parse_edit)]
        edits: Vec<(usize, String)>,
        /// Append an empty assistant message before applying edits
        #[arg(long)]
        add_message: bool,
    },
    /// List conversations
    Conversations {
        /// Full-text search
        #[arg(long)]
        search: Option<String>,
        /// Only conversations started by this user
        #[arg(long, value_name = "EMAIL")]
        author: Option<String>,
        /// Only conversations with this feedback score
        #[arg(long, allow_negative_numbers = true)]
        feedback: Option<i32>,
        /// Conversations per page (defaults to the configured page size)
        #[arg(long, value_name = "N")]
        first: Option<u32>,
        /// Resume from a cursor printed by an earlier listing
        #[arg(long)]
        cursor: Option<String>,
        /// Fetch every page instead of just one
        #[arg(long)]
        all: bool,
    },
    /// Delete a conversation
    DeleteConversation { id: String },
    /// Record feedback on a message
    Feedback {
        message_id: String,
        #[arg(allow_negative_numbers = true)]
        score: i32,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Print the URL of the backend logo
    LogoUrl {
        #[arg(long)]
        theme: Option<ThemeVariant>,
    },
    /// Print the URL that starts an OAuth sign-in with PROVIDER
    OauthUrl { provider: String },
    /// Print the resolved color palette
    Theme {
        #[arg(long)]
        variant: Option<ThemeVariant>,
    },
    /// Show or change configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
        /// Narrow the change (e.g. the variable name for user-env)
        value: Option<String>,
    },
}

/// Everything a backend-facing subcommand needs.
pub struct CliContext {
    pub config: Config,
    pub endpoints: Endpoints,
    pub tokens: Arc<dyn TokenStore>,
    pub client: ChatClient,
}

impl CliContext {
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config = Config::load()?;
        let endpoints = config.endpoints();
        let tokens: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore::new(&endpoints.http));
        Ok(Self::with_token_store(config, endpoints, tokens))
    }

    pub fn with_token_store(
        config: Config,
        endpoints: Endpoints,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base = ApiBase::new(endpoints.http.clone())
            .with_token_store(tokens.clone())
            .on_unauthorized(|| {
                eprintln!(
                    "🔒 The backend rejected the stored token. Run 'palaver login' to sign in again."
                );
            })
            .on_error(|err| error!(error = %err, "backend request failed"));

        Self {
            config,
            endpoints,
            tokens,
            client: ChatClient::new(base),
        }
    }

    /// Stored access token, if any. Keyring failures degrade to anonymous
    /// requests.
    pub fn access_token(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "could not read stored access token");
                None
            }
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    crate::logging::init_tracing(args.verbose);

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Commands::Config { command } => {
            run_config(command)?;
            Ok(())
        }
        Commands::Theme { variant } => {
            let config = Config::load()?;
            theme::print_palette(&config, variant);
            Ok(())
        }
        command => {
            let ctx = CliContext::load()?;
            dispatch(&ctx, command).await
        }
    }
}

async fn dispatch(ctx: &CliContext, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Login { username, password } => {
            auth::run_login(ctx, &username, password).await
        }
        Commands::HeaderLogin => auth::run_header_login(ctx).await,
        Commands::Logout => auth::run_logout(ctx),
        Commands::Complete {
            prompt,
            edits,
            add_message,
        } => complete::run_complete(ctx, &prompt, &edits, add_message).await,
        Commands::Conversations {
            search,
            author,
            feedback,
            first,
            cursor,
            all,
        } => {
            let options = conversations::ListOptions {
                search,
                author,
                feedback,
                first,
                cursor,
                all,
            };
            conversations::run_list(ctx, options).await
        }
        Commands::DeleteConversation { id } => conversations::run_delete(ctx, &id).await,
        Commands::Feedback {
            message_id,
            score,
            comment,
        } => conversations::run_feedback(ctx, &message_id, score, comment.as_deref()).await,
        Commands::LogoUrl { theme } => {
            let variant = theme.unwrap_or_else(|| ctx.config.theme_variant());
            println!("{}", ctx.client.logo_endpoint(variant.as_str()));
            Ok(())
        }
        Commands::OauthUrl { provider } => {
            println!("{}", ctx.client.oauth_endpoint(&provider));
            Ok(())
        }
        Commands::Config { .. } | Commands::Theme { .. } => Ok(()),
    }
}

fn run_config(command: ConfigCommands) -> Result<(), Box<dyn Error>> {
    let registry = SettingRegistry::new();
    let outcome = match command {
        ConfigCommands::Show => {
            let config = Config::load()?;
            println!("Current configuration ({}):", config_location());
            for line in registry.format_all(&config) {
                println!("{line}");
            }
            return Ok(());
        }
        ConfigCommands::Set { key, value } => {
            settings::helpers::set_setting(&registry, &key, &value)
        }
        ConfigCommands::Unset { key, value } => {
            settings::helpers::unset_setting(&registry, &key, value.as_deref())
        }
    };

    match outcome {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

fn config_location() -> String {
    Config::path()
        .map(crate::core::config::data::path_display)
        .unwrap_or_else(|_| "no config directory".to_string())
}

#[cfg(test)]
mod tests;
