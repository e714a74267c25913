// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `login` / `logout` / `whoami`: session management
//! - `navigate` / `routes`: route guard inspection
//! - `properties`, `transactions`, `favorites`, `messages`, `admin`: API calls
//! - `validate` / `version`: housekeeping

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use estate_config::LoggingConfig;
use estate_core::ListingQuery;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// estate - command-line client for the estate listing service
///
/// Logs in against the listing API, keeps the session on disk and gates the
/// agent and administrator commands by the role carried in the session token.
#[derive(Parser, Debug)]
#[command(
    name = "estate",
    author = "Sylvex <contact@sylvex.io>",
    version = estate_core::VERSION,
    about = "Command-line client for the estate listing service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "estate.yaml",
        env = "ESTATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "ESTATE_CLI_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "ESTATE_CLI_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the estate CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),

    /// End the stored session
    Logout,

    /// Show the current session
    Whoami(FormatArgs),

    /// Check whether the current session may open a page
    ///
    /// Prints ALLOW with the matched route, or REDIRECT with the target.
    Navigate(NavigateArgs),

    /// List the route table with its role requirements
    Routes(FormatArgs),

    /// Property listings
    #[command(subcommand)]
    Properties(PropertiesCommand),

    /// Sale transactions
    #[command(subcommand)]
    Transactions(TransactionsCommand),

    /// Favorite listings
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// In-app messages
    #[command(subcommand)]
    Messages(MessagesCommand),

    /// User administration (administrators only)
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

/// `properties` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PropertiesCommand {
    /// Search listings
    Search(SearchArgs),
    /// Show one listing
    Show(IdArgs),
    /// Suggest project names or property types
    Suggest(SuggestArgs),
    /// List the listings managed by the logged-in agent
    Mine(FormatArgs),
    /// Delete a listing
    Delete(IdArgs),
}

/// `transactions` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TransactionsCommand {
    /// Search transactions
    Search(SearchArgs),
    /// Show one transaction
    Show(IdArgs),
    /// Show the last five transactions of a project
    Last5(ProjectArgs),
    /// Delete a transaction
    Delete(IdArgs),
}

/// `favorites` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesCommand {
    /// List favorite listings
    List(FormatArgs),
    /// Add a listing to the favorites
    Add(IdArgs),
    /// Remove a listing from the favorites
    Remove(IdArgs),
}

/// `messages` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MessagesCommand {
    /// List received messages, newest first
    Inbox(FormatArgs),
    /// Show one message
    Show(IdArgs),
    /// Send a message
    Send(SendArgs),
    /// Show the conversation with a sender
    Conversation(ConversationArgs),
}

/// `admin` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// List user accounts
    Users(FormatArgs),
    /// Delete a user account
    #[command(name = "delete-user")]
    DeleteUser(IdArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account e-mail
    pub email: String,

    /// Account password
    #[arg(short, long, env = "ESTATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `navigate` command.
#[derive(Args, Debug, Clone)]
pub struct NavigateArgs {
    /// Page path, e.g. /manage-properties
    pub path: String,
}

/// Output format selection.
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// A numeric record identifier.
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Record identifier
    pub id: i64,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Search filters for listings and transactions.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Project name
    #[arg(long)]
    pub project: Option<String>,

    /// Property type
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Year
    #[arg(long)]
    pub year: Option<i32>,

    /// Facilities fragment
    #[arg(long)]
    pub facilities: Option<String>,

    /// Result page (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for `properties suggest`.
#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    /// Partial input (at least two characters)
    pub query: String,

    /// Suggest property types instead of project names
    #[arg(long)]
    pub types: bool,
}

/// Arguments for `transactions last5`.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project name
    pub project: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for `messages send`.
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Recipient e-mail
    pub recipient: String,

    /// Subject line
    #[arg(short, long, default_value = "")]
    pub subject: String,

    /// Message body
    #[arg(short = 'm', long)]
    pub content: String,
}

/// Arguments for `messages conversation`.
#[derive(Args, Debug, Clone)]
pub struct ConversationArgs {
    /// Sender e-mail
    pub email: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show the parsed configuration
    #[arg(long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<estate_config::LogFormat> for LogFormat {
    fn from(format: estate_config::LogFormat) -> Self {
        match format {
            estate_config::LogFormat::Text => LogFormat::Text,
            estate_config::LogFormat::Json => LogFormat::Json,
            estate_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the log level, letting flags win over the config file.
    pub fn effective_log_level(&self, logging: &LoggingConfig) -> String {
        if self.quiet {
            "error".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| logging.level.as_str().to_string())
        }
    }

    /// Returns the log format, letting the flag win over the config file.
    pub fn effective_log_format(&self, logging: &LoggingConfig) -> LogFormat {
        self.log_format.unwrap_or_else(|| logging.format.into())
    }
}

impl SearchArgs {
    /// Builds the listing query from the filters.
    pub fn to_query(&self) -> ListingQuery {
        let mut query = ListingQuery::new().price_range(self.min_price, self.max_price);
        if let Some(project) = &self.project {
            query = query.project_name(project.as_str());
        }
        if let Some(property_type) = &self.property_type {
            query = query.property_type(property_type.as_str());
        }
        if let Some(year) = self.year {
            query = query.year(year);
        }
        if let Some(facilities) = &self.facilities {
            query = query.facilities(facilities.as_str());
        }
        query
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["estate", "-c", "/etc/estate/config.yaml", "routes"]);
        assert_eq!(cli.config, PathBuf::from("/etc/estate/config.yaml"));
    }

    #[test]
    fn test_navigate_command() {
        let cli = Cli::parse_from(["estate", "navigate", "/manage-properties"]);
        match cli.command {
            Commands::Navigate(args) => assert_eq!(args.path, "/manage-properties"),
            other => panic!("Expected Navigate command, got {other:?}"),
        }
    }

    #[test]
    fn test_login_command() {
        let cli = Cli::parse_from(["estate", "login", "a@b.com", "-p", "secret"]);
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.email, "a@b.com");
                assert_eq!(args.password, "secret");
            }
            other => panic!("Expected Login command, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_commands() {
        let cli = Cli::parse_from(["estate", "admin", "delete-user", "7"]);
        assert!(matches!(cli.command, Commands::Admin(AdminCommand::DeleteUser(IdArgs { id: 7, .. }))));

        let cli = Cli::parse_from(["estate", "transactions", "last5", "Sky Tower", "-f", "json"]);
        match cli.command {
            Commands::Transactions(TransactionsCommand::Last5(args)) => {
                assert_eq!(args.project, "Sky Tower");
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("Expected Last5 command, got {other:?}"),
        }
    }

    #[test]
    fn test_search_query() {
        let cli = Cli::parse_from([
            "estate", "properties", "search", "--project", "Sky", "--min-price", "100000",
            "--year", "2020",
        ]);
        let Commands::Properties(PropertiesCommand::Search(args)) = cli.command else {
            panic!("Expected Search command");
        };
        let query = args.to_query();
        assert_eq!(query.project_name.as_deref(), Some("Sky"));
        assert_eq!(query.min_price, Some(100000.0));
        assert_eq!(query.max_price, None);
        assert_eq!(query.year, Some(2020));
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_log_level_precedence() {
        let logging = LoggingConfig::default();

        let cli = Cli::parse_from(["estate", "routes"]);
        assert_eq!(cli.effective_log_level(&logging), "warn");
        assert_eq!(cli.effective_log_format(&logging), LogFormat::Text);

        let cli = Cli::parse_from(["estate", "-l", "info", "--log-format", "json", "routes"]);
        assert_eq!(cli.effective_log_level(&logging), "info");
        assert_eq!(cli.effective_log_format(&logging), LogFormat::Json);

        let cli = Cli::parse_from(["estate", "-v", "routes"]);
        assert_eq!(cli.effective_log_level(&logging), "debug");

        let cli = Cli::parse_from(["estate", "-q", "routes"]);
        assert_eq!(cli.effective_log_level(&logging), "error");
    }
}
