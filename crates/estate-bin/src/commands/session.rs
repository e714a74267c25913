// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `login`, `logout` and `whoami` commands.

use serde_json::json;

use super::print_json;
use crate::cli::{LoginArgs, OutputFormat};
use crate::context::AppContext;
use crate::error::BinResult;

/// Logs in and persists the session.
pub async fn login(ctx: &AppContext, args: LoginArgs) -> BinResult<()> {
    let logged_in = ctx.client.login(&args.email, &args.password).await?;
    println!("Logged in as {} ({})", args.email, logged_in.role);
    if let Some(message) = logged_in.message.filter(|m| !m.is_empty()) {
        println!("{message}");
    }
    Ok(())
}

/// Clears the persisted session.
pub fn logout(ctx: &AppContext) -> BinResult<()> {
    let was_authenticated = ctx.store().is_authenticated();
    ctx.client.logout()?;
    if was_authenticated {
        println!("Logged out");
    } else {
        println!("No active session");
    }
    Ok(())
}

/// Shows the current session without revealing the token.
pub fn whoami(ctx: &AppContext, format: OutputFormat) -> BinResult<()> {
    ctx.store().enforce_expiry();
    let session = ctx.store().snapshot();
    let expires_at = ctx
        .store()
        .current_claims()
        .and_then(|c| c.expires_at())
        .map(|t| t.to_rfc3339());

    match format {
        OutputFormat::Json => print_json(&json!({
            "authenticated": session.is_authenticated(),
            "role": session.role,
            "user_id": session.user_id,
            "expires_at": expires_at,
            "backend": ctx.store().backend(),
        })),
        OutputFormat::Text => {
            match (session.role, session.user_id) {
                (Some(role), Some(user_id)) => {
                    println!("User:    {user_id}");
                    println!("Role:    {role}");
                    println!("Expires: {}", expires_at.as_deref().unwrap_or("never"));
                }
                _ => println!("Not logged in"),
            }
            Ok(())
        }
    }
}
