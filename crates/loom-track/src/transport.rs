// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport capability and the default HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use loom_track_core::AckCode;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Header asking the server to validate without importing.
pub const DRY_RUN_HEADER: &str = "Dry-Run";

/// Errors from a delivery attempt. The payload stays queued.
#[derive(Debug, Error)]
pub enum TransportError {
	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// Server returned an error.
	#[error("server error (status {status}): {message}")]
	Status { status: u16, message: String },

	#[error("request timed out")]
	Timeout,
}

impl TransportError {
	/// Returns true when the same payload may succeed on a later flush.
	pub fn is_retryable(&self) -> bool {
		match self {
			TransportError::Timeout => true,
			TransportError::Request(e) => e.is_connect() || e.is_timeout(),
			TransportError::Status { status, .. } => {
				matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
			}
		}
	}
}

/// What a payload is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
	/// A batch drained from the queue.
	Batch,
	/// A single record sent for debug validation. With `dry_run` the server
	/// validates and discards it.
	Validate { dry_run: bool },
}

/// Sends serialized payloads to the collection endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, payload: Vec<u8>, kind: PayloadKind) -> Result<AckCode, TransportError>;
}

/// POSTs JSON payloads to a single endpoint URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	server_url: String,
}

impl HttpTransport {
	pub fn new(server_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
		let client = Client::builder()
			.user_agent(user_agent())
			.timeout(timeout)
			.build()?;
		Ok(Self {
			client,
			server_url: server_url.into(),
		})
	}

	pub fn server_url(&self) -> &str {
		&self.server_url
	}
}

/// Returns the User-Agent sent with every request.
pub fn user_agent() -> String {
	format!(
		"loom-track/{} ({}-{})",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, payload: Vec<u8>, kind: PayloadKind) -> Result<AckCode, TransportError> {
		let mut request = self
			.client
			.post(&self.server_url)
			.header(reqwest::header::CONTENT_TYPE, "application/json");
		if let PayloadKind::Validate { dry_run } = kind {
			request = request.header(DRY_RUN_HEADER, if dry_run { "true" } else { "false" });
		}

		debug!(url = %self.server_url, bytes = payload.len(), ?kind, "Sending payload");

		let response = request.body(payload).send().await.map_err(|e| {
			if e.is_timeout() {
				TransportError::Timeout
			} else {
				TransportError::Request(e)
			}
		})?;

		let status = response.status();
		if status.is_success() {
			return Ok(AckCode::Accepted);
		}

		let message = response.text().await.unwrap_or_default();
		if status == StatusCode::BAD_REQUEST {
			return Ok(AckCode::Rejected(message));
		}

		Err(TransportError::Status {
			status: status.as_u16(),
			message,
		})
	}
}
