// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `favorites` and `messages` commands.

use estate_core::{Message, NewMessage};

use super::listings::property_line;
use super::{print_json, print_list};
use crate::cli::{FavoritesCommand, MessagesCommand, OutputFormat};
use crate::context::AppContext;
use crate::error::BinResult;

const SNIPPET_CHARS: usize = 60;

/// Runs a `favorites` subcommand.
pub async fn favorites(ctx: &AppContext, command: FavoritesCommand) -> BinResult<()> {
    match command {
        FavoritesCommand::List(args) => {
            let favorites = ctx.client.favorites().await?;
            print_list(&favorites, args.format, property_line)
        }
        FavoritesCommand::Add(args) => {
            ctx.client.add_favorite(args.id).await?;
            println!("Added property #{} to favorites", args.id);
            Ok(())
        }
        FavoritesCommand::Remove(args) => {
            ctx.client.remove_favorite(args.id).await?;
            println!("Removed property #{} from favorites", args.id);
            Ok(())
        }
    }
}

/// Runs a `messages` subcommand.
pub async fn messages(ctx: &AppContext, command: MessagesCommand) -> BinResult<()> {
    match command {
        MessagesCommand::Inbox(args) => {
            let messages = ctx.client.inbox().await?;
            print_list(&messages, args.format, message_line)
        }
        MessagesCommand::Show(args) => {
            let message = ctx.client.message(args.id).await?;
            match args.format {
                OutputFormat::Json => print_json(&message),
                OutputFormat::Text => {
                    println!("From:    {}", message.sender);
                    println!("To:      {}", message.recipient);
                    println!("Subject: {}", message.subject);
                    println!("Date:    {}", timestamp(&message));
                    println!();
                    println!("{}", message.content);
                    Ok(())
                }
            }
        }
        MessagesCommand::Send(args) => {
            let message = NewMessage {
                recipient: args.recipient,
                subject: args.subject,
                content: args.content,
            };
            ctx.client.send_message(&message).await?;
            println!("Message sent to {}", message.recipient);
            Ok(())
        }
        MessagesCommand::Conversation(args) => {
            let messages = ctx.client.conversation(&args.email).await?;
            print_list(&messages, args.format, message_line)
        }
    }
}

fn timestamp(message: &Message) -> String {
    message
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn message_line(message: &Message) -> String {
    format!(
        "#{} {} {:<24} {}: {}",
        message.id,
        timestamp(message),
        message.sender,
        message.subject,
        message.snippet(SNIPPET_CHARS)
    )
}
