// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `navigate` and `routes` commands.

use estate_auth::Navigation;
use serde_json::json;

use super::print_json;
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::error::BinResult;

/// Resolves a page path against the live session and prints the outcome.
pub fn navigate(ctx: &AppContext, path: &str) -> BinResult<()> {
    match ctx.navigator.navigate(path) {
        Navigation::Allowed { route, params } => {
            println!("ALLOW {route}");
            for (name, value) in &params {
                println!("  {name} = {value}");
            }
        }
        Navigation::Redirected { to } => println!("REDIRECT {to}"),
    }
    Ok(())
}

/// Prints the route table.
pub fn routes(ctx: &AppContext, format: OutputFormat) -> BinResult<()> {
    let table = ctx.navigator.routes();
    match format {
        OutputFormat::Json => {
            let routes: Vec<_> = table
                .routes()
                .iter()
                .map(|r| json!({ "pattern": r.pattern(), "required": r.required() }))
                .collect();
            print_json(&json!({ "fallback": table.fallback(), "routes": routes }))
        }
        OutputFormat::Text => {
            let width = table.routes().iter().map(|r| r.pattern().len()).max().unwrap_or(0);
            for route in table.routes() {
                println!("{:<width$}  {}", route.pattern(), route.required());
            }
            println!();
            println!("Fallback: {}", table.fallback());
            Ok(())
        }
    }
}
