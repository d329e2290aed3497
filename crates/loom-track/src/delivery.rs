// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of queued batches and single-record debug validation.

use std::sync::Arc;

use loom_track_core::{AckCode, EventRecord};
use tracing::{debug, error, warn};

use crate::queue::{PersistentQueue, QueuedRecord, RecordId};
use crate::stats::Stats;
use crate::transport::{PayloadKind, Transport, TransportError};

/// Default number of records per batch payload.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// What one drain pass did.
#[derive(Debug, Default)]
pub struct DrainReport {
	/// Records the server accepted.
	pub delivered: usize,
	/// Records the server refused; dropped from the queue.
	pub rejected: usize,
	/// Number of transport calls made.
	pub attempts: usize,
	/// The error that stopped the pass, if any. The failing batch is still queued.
	pub error: Option<TransportError>,
}

#[derive(Clone)]
pub struct DeliveryClient {
	transport: Arc<dyn Transport>,
	max_batch_size: usize,
	stats: Arc<Stats>,
}

impl DeliveryClient {
	pub fn new(transport: Arc<dyn Transport>, max_batch_size: usize, stats: Arc<Stats>) -> Self {
		Self {
			transport,
			max_batch_size: max_batch_size.max(1),
			stats,
		}
	}

	/// Sends queued batches up to and including `through`.
	///
	/// Each accepted or rejected batch is removed by id; the first transport
	/// error ends the pass and leaves that batch untouched.
	pub async fn drain(&self, queue: &PersistentQueue, through: RecordId) -> DrainReport {
		let mut report = DrainReport::default();

		loop {
			let batch = queue.peek_batch_until(self.max_batch_size, through);
			if batch.is_empty() {
				break;
			}
			let ids: Vec<RecordId> = batch.iter().map(|entry| entry.id).collect();

			let payload = match encode_batch(&batch) {
				Ok(payload) => payload,
				Err(e) => {
					error!(error = %e, count = ids.len(), "Dropping unserializable batch");
					queue.remove_batch(&ids);
					self.stats.record_rejected(ids.len() as u64);
					report.rejected += ids.len();
					continue;
				}
			};

			report.attempts += 1;
			match self.transport.send(payload, PayloadKind::Batch).await {
				Ok(AckCode::Accepted) => {
					queue.remove_batch(&ids);
					self.stats.record_delivered(ids.len() as u64);
					report.delivered += ids.len();
					debug!(count = ids.len(), "Delivered batch");
				}
				Ok(AckCode::Rejected(reason)) => {
					queue.remove_batch(&ids);
					self.stats.record_rejected(ids.len() as u64);
					report.rejected += ids.len();
					warn!(count = ids.len(), reason = %reason, "Server rejected batch, dropping");
				}
				Err(e) => {
					warn!(
						error = %e,
						retryable = e.is_retryable(),
						count = ids.len(),
						"Batch delivery failed, keeping records queued"
					);
					report.error = Some(e);
					break;
				}
			}
		}

		report
	}

	/// Sends one record for synchronous validation.
	pub async fn validate(&self, record: &EventRecord, dry_run: bool) -> Result<AckCode, TransportError> {
		let payload = match serde_json::to_vec(&[record]) {
			Ok(payload) => payload,
			Err(e) => return Ok(AckCode::Rejected(format!("unserializable record: {e}"))),
		};
		self.transport.send(payload, PayloadKind::Validate { dry_run }).await
	}
}

fn encode_batch(batch: &[QueuedRecord]) -> serde_json::Result<Vec<u8>> {
	let records: Vec<&EventRecord> = batch.iter().map(|entry| &entry.record).collect();
	serde_json::to_vec(&records)
}
