// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Running counters shared by the queue and the delivery client.
#[derive(Debug, Default)]
pub struct Stats {
	evicted: AtomicU64,
	rejected: AtomicU64,
	delivered: AtomicU64,
}

impl Stats {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records entries dropped to stay within queue capacity.
	pub fn record_evicted(&self, count: u64) {
		self.evicted.fetch_add(count, Ordering::Relaxed);
	}

	/// Records entries the server refused and that were discarded.
	pub fn record_rejected(&self, count: u64) {
		self.rejected.fetch_add(count, Ordering::Relaxed);
	}

	pub fn record_delivered(&self, count: u64) {
		self.delivered.fetch_add(count, Ordering::Relaxed);
	}

	pub fn snapshot(&self) -> StatsSnapshot {
		StatsSnapshot {
			evicted: self.evicted.load(Ordering::Relaxed),
			rejected: self.rejected.load(Ordering::Relaxed),
			delivered: self.delivered.load(Ordering::Relaxed),
		}
	}
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
	pub evicted: u64,
	pub rejected: u64,
	pub delivered: u64,
}
