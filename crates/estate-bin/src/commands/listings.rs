// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `properties` and `transactions` commands.

use estate_core::{Page, Property, Transaction};
use serde::Serialize;

use super::{id_label, print_json, print_list, MANAGE_PROPERTIES_ROUTE};
use crate::cli::{OutputFormat, PropertiesCommand, TransactionsCommand};
use crate::context::AppContext;
use crate::error::BinResult;

/// Runs a `properties` subcommand.
pub async fn properties(ctx: &AppContext, command: PropertiesCommand) -> BinResult<()> {
    match command {
        PropertiesCommand::Search(args) => {
            let page = ctx
                .client
                .search_properties_page(&args.to_query(), args.page)
                .await?;
            print_page(&page, args.format, property_line)
        }
        PropertiesCommand::Show(args) => {
            let property = ctx.client.property(args.id).await?;
            match args.format {
                OutputFormat::Json => print_json(&property),
                OutputFormat::Text => {
                    print_property(&property);
                    Ok(())
                }
            }
        }
        PropertiesCommand::Suggest(args) => {
            let suggestions = if args.types {
                ctx.client.suggest_property_types(&args.query).await?
            } else {
                ctx.client.suggest_projects(&args.query).await?
            };
            for suggestion in suggestions {
                println!("{suggestion}");
            }
            Ok(())
        }
        PropertiesCommand::Mine(args) => {
            ctx.require(MANAGE_PROPERTIES_ROUTE)?;
            let properties = ctx.client.agent_properties().await?;
            print_list(&properties, args.format, property_line)
        }
        PropertiesCommand::Delete(args) => {
            ctx.require(MANAGE_PROPERTIES_ROUTE)?;
            ctx.client.delete_property(args.id).await?;
            println!("Deleted property #{}", args.id);
            Ok(())
        }
    }
}

/// Runs a `transactions` subcommand.
pub async fn transactions(ctx: &AppContext, command: TransactionsCommand) -> BinResult<()> {
    match command {
        TransactionsCommand::Search(args) => {
            let page = ctx
                .client
                .search_transactions_page(&args.to_query(), args.page)
                .await?;
            print_page(&page, args.format, transaction_line)
        }
        TransactionsCommand::Show(args) => {
            let transaction = ctx.client.transaction(args.id).await?;
            match args.format {
                OutputFormat::Json => print_json(&transaction),
                OutputFormat::Text => {
                    println!("{}", transaction_line(&transaction));
                    println!("  Address:    {}", transaction.address);
                    println!("  Size:       {} sq ft", transaction.size_sq_ft);
                    println!("  Per sq ft:  {:.2}", transaction.price_per_sqft);
                    Ok(())
                }
            }
        }
        TransactionsCommand::Last5(args) => {
            let transactions = ctx.client.last5_transactions(&args.project).await?;
            print_list(&transactions, args.format, transaction_line)
        }
        TransactionsCommand::Delete(args) => {
            ctx.require(MANAGE_PROPERTIES_ROUTE)?;
            ctx.client.delete_transaction(args.id).await?;
            println!("Deleted transaction #{}", args.id);
            Ok(())
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

fn print_page<T, F>(page: &Page<T>, format: OutputFormat, line: F) -> BinResult<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Text => {
            print_list(&page.items, format, line)?;
            println!(
                "Page {}/{} ({} results)",
                page.page, page.total_pages, page.total_items
            );
            Ok(())
        }
    }
}

pub(crate) fn property_line(p: &Property) -> String {
    format!(
        "{} {} ({}) {:.0}",
        id_label(p.id),
        p.project_name,
        p.property_type,
        p.price
    )
}

fn transaction_line(t: &Transaction) -> String {
    format!(
        "{} {} ({}) {} {:.0}",
        id_label(t.id),
        t.project_name,
        t.property_type,
        t.year,
        t.price
    )
}

fn print_property(p: &Property) {
    println!("{}", property_line(p));
    println!("  Address:    {}", p.address);
    println!("  Size:       {} sq ft", p.size_sq_ft);
    println!("  Floors:     {}", p.no_of_floors);
    println!("  Year:       {}", p.year);
    println!("  Per sq ft:  {:.2}", p.price_per_sqft);
    if !p.facilities.is_empty() {
        println!("  Facilities: {}", p.facilities);
    }
}
