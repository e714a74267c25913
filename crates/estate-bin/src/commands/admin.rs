// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `admin` commands.

use estate_core::UserProfile;

use super::{print_list, ADMIN_USERS_ROUTE};
use crate::cli::AdminCommand;
use crate::context::AppContext;
use crate::error::BinResult;

/// Runs an `admin` subcommand. Every subcommand requires the admin area.
pub async fn admin(ctx: &AppContext, command: AdminCommand) -> BinResult<()> {
    ctx.require(ADMIN_USERS_ROUTE)?;

    match command {
        AdminCommand::Users(args) => {
            let users = ctx.client.admin_users().await?;
            print_list(&users, args.format, user_line)
        }
        AdminCommand::DeleteUser(args) => {
            ctx.client.admin_delete_user(args.id).await?;
            println!("Deleted user #{}", args.id);
            Ok(())
        }
    }
}

fn user_line(user: &UserProfile) -> String {
    let role = user.role.map(|r| r.as_str()).unwrap_or("-");
    format!("#{} {:<6} {} <{}>", user.id, role, user.name, user.email)
}
