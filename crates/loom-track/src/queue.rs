// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistent bounded FIFO of composed records.
//!
//! Every record lives under its own store key (`queue.entry.<seq>`) and the
//! live range of sequence numbers is kept in `queue.meta`. Appending writes
//! the entry first and the meta second, so a crash between the two loses at
//! most the entry being appended.
//!
//! When the store fails the queue keeps working from memory for the rest of
//! the process lifetime.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use loom_track_core::EventRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::stats::Stats;
use crate::store::{KeyValueStore, StoreError};

pub(crate) const META_KEY: &str = "queue.meta";
const ENTRY_PREFIX: &str = "queue.entry.";

/// Default maximum number of queued records.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Identifier of a queued record. Ids increase monotonically in append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(u64);

impl RecordId {
	pub fn as_u64(&self) -> u64 {
		self.0
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A record together with its queue id.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedRecord {
	pub id: RecordId,
	pub record: EventRecord,
}

/// Live sequence range `[head, next)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct QueueMeta {
	head: u64,
	next: u64,
}

struct QueueInner {
	entries: VecDeque<QueuedRecord>,
	next_seq: u64,
	durable: bool,
}

pub struct PersistentQueue {
	store: Arc<dyn KeyValueStore>,
	capacity: usize,
	stats: Arc<Stats>,
	inner: Mutex<QueueInner>,
}

fn entry_key(seq: u64) -> String {
	format!("{ENTRY_PREFIX}{seq}")
}

impl PersistentQueue {
	/// Opens the queue, reloading whatever survived in `store`.
	///
	/// Entries that are missing or fail to decode are skipped. A capacity of
	/// zero is treated as one.
	pub fn open(store: Arc<dyn KeyValueStore>, capacity: usize, stats: Arc<Stats>) -> Self {
		let capacity = capacity.max(1);
		let mut durable = true;

		let meta = match store.get(META_KEY) {
			Ok(Some(bytes)) => match serde_json::from_slice::<QueueMeta>(&bytes) {
				Ok(meta) => meta,
				Err(e) => {
					warn!(error = %e, "Discarding unreadable queue metadata");
					QueueMeta::default()
				}
			},
			Ok(None) => QueueMeta::default(),
			Err(e) => {
				warn!(error = %e, "Queue store unavailable, continuing in memory");
				durable = false;
				QueueMeta::default()
			}
		};

		let mut entries = VecDeque::new();
		if durable {
			for seq in meta.head..meta.next {
				match store.get(&entry_key(seq)) {
					Ok(Some(bytes)) => match serde_json::from_slice::<EventRecord>(&bytes) {
						Ok(record) => entries.push_back(QueuedRecord {
							id: RecordId(seq),
							record,
						}),
						Err(e) => warn!(seq, error = %e, "Skipping corrupt queue entry"),
					},
					Ok(None) => debug!(seq, "Queue entry missing on reload"),
					Err(e) => warn!(seq, error = %e, "Failed to read queue entry"),
				}
			}
		}

		let queue = Self {
			store,
			capacity,
			stats,
			inner: Mutex::new(QueueInner {
				entries,
				next_seq: meta.next,
				durable,
			}),
		};

		{
			let mut inner = queue.lock();
			let evicted = queue.evict_overflow(&mut inner);
			if evicted > 0 {
				queue.persist_meta(&mut inner);
			}
			if !inner.entries.is_empty() {
				info!(count = inner.entries.len(), "Reloaded queued records");
			}
		}

		queue
	}

	fn lock(&self) -> MutexGuard<'_, QueueInner> {
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Appends a record, evicting the oldest entries if over capacity.
	///
	/// The record is persisted before this returns unless the queue has
	/// already degraded to memory.
	pub fn append(&self, record: EventRecord) -> RecordId {
		let mut inner = self.lock();
		let id = RecordId(inner.next_seq);
		inner.next_seq += 1;

		if inner.durable {
			let written = serde_json::to_vec(&record)
				.map_err(StoreError::from)
				.and_then(|bytes| self.store.put(&entry_key(id.0), &bytes));
			if let Err(e) = written {
				self.degrade(&mut inner, &e);
			}
		}

		inner.entries.push_back(QueuedRecord { id, record });
		self.evict_overflow(&mut inner);
		self.persist_meta(&mut inner);
		id
	}

	/// Returns up to `max` of the oldest records without removing them.
	pub fn peek_batch(&self, max: usize) -> Vec<QueuedRecord> {
		let inner = self.lock();
		inner.entries.iter().take(max).cloned().collect()
	}

	/// Like [`peek_batch`](Self::peek_batch) but ignores records newer than `boundary`.
	pub fn peek_batch_until(&self, max: usize, boundary: RecordId) -> Vec<QueuedRecord> {
		let inner = self.lock();
		inner
			.entries
			.iter()
			.take_while(|entry| entry.id <= boundary)
			.take(max)
			.cloned()
			.collect()
	}

	/// Removes the given records. Ids no longer present are ignored.
	pub fn remove_batch(&self, ids: &[RecordId]) {
		if ids.is_empty() {
			return;
		}
		let ids: HashSet<RecordId> = ids.iter().copied().collect();
		let mut inner = self.lock();
		let before = inner.entries.len();
		inner.entries.retain(|entry| !ids.contains(&entry.id));
		if inner.entries.len() == before {
			return;
		}

		if inner.durable {
			for id in &ids {
				if let Err(e) = self.store.remove(&entry_key(id.0)) {
					self.degrade(&mut inner, &e);
					break;
				}
			}
		}
		self.persist_meta(&mut inner);
	}

	/// Number of queued records. Advisory under concurrent use.
	pub fn count(&self) -> usize {
		self.lock().entries.len()
	}

	/// Id of the newest queued record, if any.
	pub fn last_id(&self) -> Option<RecordId> {
		self.lock().entries.back().map(|entry| entry.id)
	}

	/// Copies every queued record in order.
	pub fn snapshot(&self) -> Vec<QueuedRecord> {
		self.lock().entries.iter().cloned().collect()
	}

	/// Returns false once the store has failed and the queue is memory-only.
	pub fn is_durable(&self) -> bool {
		self.lock().durable
	}

	fn evict_overflow(&self, inner: &mut QueueInner) -> usize {
		let mut evicted = 0;
		while inner.entries.len() > self.capacity {
			let Some(oldest) = inner.entries.pop_front() else {
				break;
			};
			if inner.durable {
				if let Err(e) = self.store.remove(&entry_key(oldest.id.0)) {
					self.degrade(inner, &e);
				}
			}
			evicted += 1;
		}
		if evicted > 0 {
			debug!(evicted, capacity = self.capacity, "Evicted oldest queued records");
			self.stats.record_evicted(evicted as u64);
		}
		evicted
	}

	fn persist_meta(&self, inner: &mut QueueInner) {
		if !inner.durable {
			return;
		}
		let meta = QueueMeta {
			head: inner.entries.front().map_or(inner.next_seq, |entry| entry.id.0),
			next: inner.next_seq,
		};
		let written = serde_json::to_vec(&meta)
			.map_err(StoreError::from)
			.and_then(|bytes| self.store.put(META_KEY, &bytes));
		if let Err(e) = written {
			self.degrade(inner, &e);
		}
	}

	fn degrade(&self, inner: &mut QueueInner, error: &StoreError) {
		if inner.durable {
			warn!(error = %error, "Queue store failed, continuing in memory");
			inner.durable = false;
		}
	}
}

impl fmt::Debug for PersistentQueue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.lock();
		f.debug_struct("PersistentQueue")
			.field("capacity", &self.capacity)
			.field("count", &inner.entries.len())
			.field("durable", &inner.durable)
			.finish()
	}
}
