// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `estate` - command-line client for the estate listing service.

use estate_bin::cli::Cli;
use estate_bin::commands::execute;
use estate_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = execute(cli).await {
        report_error_and_exit(e);
    }
}
