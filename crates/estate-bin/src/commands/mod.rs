// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `session`: login, logout, whoami
//! - `navigate`: navigate, routes
//! - `listings`: properties and transactions
//! - `account`: favorites and messages
//! - `admin`: user administration
//! - `validate`, `version`: housekeeping

mod account;
mod admin;
mod listings;
mod navigate;
mod session;
mod validate;
mod version;

pub use validate::validate;
pub use version::version;

use serde::Serialize;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::context::{load_config, AppContext};
use crate::error::{BinError, BinResult};
use crate::logging::init_logging;

/// Page area that agent-side listing commands belong to.
pub const MANAGE_PROPERTIES_ROUTE: &str = "/manage-properties";

/// Page area that user administration commands belong to.
pub const ADMIN_USERS_ROUTE: &str = "/admin/users";

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    if let Commands::Version = cli.command {
        return version::version(&cli);
    }
    if let Commands::Validate(args) = &cli.command {
        return validate::validate(&cli, args);
    }

    let config = load_config(&cli.config)?;
    init_logging(
        &cli.effective_log_level(&config.logging),
        cli.effective_log_format(&config.logging),
    );
    let ctx = AppContext::from_config(config)?;

    match cli.command {
        Commands::Login(args) => session::login(&ctx, args).await,
        Commands::Logout => session::logout(&ctx),
        Commands::Whoami(args) => session::whoami(&ctx, args.format),
        Commands::Navigate(args) => navigate::navigate(&ctx, &args.path),
        Commands::Routes(args) => navigate::routes(&ctx, args.format),
        Commands::Properties(command) => listings::properties(&ctx, command).await,
        Commands::Transactions(command) => listings::transactions(&ctx, command).await,
        Commands::Favorites(command) => account::favorites(&ctx, command).await,
        Commands::Messages(command) => account::messages(&ctx, command).await,
        Commands::Admin(command) => admin::admin(&ctx, command).await,
        Commands::Validate(_) | Commands::Version => Ok(()),
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> BinResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BinError::runtime(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Prints `items` as JSON, or one `line` per item as text.
pub(crate) fn print_list<T, F>(items: &[T], format: OutputFormat, line: F) -> BinResult<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Text => {
            if items.is_empty() {
                println!("(none)");
            }
            for item in items {
                println!("{}", line(item));
            }
            Ok(())
        }
    }
}

pub(crate) fn id_label(id: Option<i64>) -> String {
    id.map(|id| format!("#{id}")).unwrap_or_else(|| "#-".to_string())
}
