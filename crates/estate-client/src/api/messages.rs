// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-app messaging.

use estate_core::types::sort_newest_first;
use estate_core::{Message, NewMessage};
use reqwest::Method;

use crate::client::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// Lists received messages, newest first.
    pub async fn inbox(&self) -> ClientResult<Vec<Message>> {
        let mut messages: Vec<Message> = self.get_json(&["messages"], Auth::Bearer).await?;
        sort_newest_first(&mut messages);
        Ok(messages)
    }

    /// Sends a message.
    pub async fn send_message(&self, message: &NewMessage) -> ClientResult<()> {
        if message.recipient.trim().is_empty() {
            return Err(ClientError::invalid_input("recipient is empty"));
        }
        let req = self
            .request(Method::POST, &["messages"], Auth::Bearer)?
            .json(message);
        self.send_empty(req, Auth::Bearer).await
    }

    /// Fetches one message.
    pub async fn message(&self, id: i64) -> ClientResult<Message> {
        self.get_json(&["messages", &id.to_string()], Auth::Bearer)
            .await
    }

    /// Lists the conversation with another user, newest first.
    pub async fn conversation(&self, email: &str) -> ClientResult<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .get_json(&["messages", "conversation", email], Auth::Bearer)
            .await?;
        sort_newest_first(&mut messages);
        Ok(messages)
    }
}
