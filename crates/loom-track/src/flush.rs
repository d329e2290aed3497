// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flush policy: when queued records are handed to the delivery client.
//!
//! The engine is either idle or flushing. A trigger starts a flush only if
//! the interval since the last attempt has elapsed (manual and background
//! triggers skip this check) and the host reports a usable connection. A
//! trigger that arrives while a flush is running is coalesced into it.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use loom_track_core::DebugMode;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::connectivity::Connectivity;
use crate::delivery::DeliveryClient;
use crate::queue::PersistentQueue;

/// Default interval between automatic flushes.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 60_000;

/// Interval used whenever a debug mode is enabled.
pub const DEBUG_FLUSH_INTERVAL_MS: u64 = 1_000;

/// Why a flush was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
	/// A record was appended to the queue.
	Appended,
	/// The periodic timer fired.
	Tick,
	/// The host is moving to the background.
	Background,
	/// The caller asked for a flush.
	Manual,
}

impl FlushTrigger {
	fn bypasses_interval(&self) -> bool {
		matches!(self, FlushTrigger::Manual | FlushTrigger::Background)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	IntervalNotElapsed,
	Offline,
}

/// Result of one flush attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
	/// Batches were sent; `records` were accepted by the server.
	Delivered { records: usize },
	/// Nothing was queued.
	Empty,
	/// The policy declined to start a flush.
	Skipped(SkipReason),
	/// Another flush was already running.
	Coalesced,
	/// A transport error stopped the flush; `records` were accepted before it.
	Failed { records: usize, error: String },
}

impl fmt::Display for FlushOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FlushOutcome::Delivered { records } => write!(f, "delivered {records} records"),
			FlushOutcome::Empty => f.write_str("queue empty"),
			FlushOutcome::Skipped(SkipReason::IntervalNotElapsed) => f.write_str("interval not elapsed"),
			FlushOutcome::Skipped(SkipReason::Offline) => f.write_str("offline"),
			FlushOutcome::Coalesced => f.write_str("coalesced into running flush"),
			FlushOutcome::Failed { records, error } => {
				write!(f, "failed after {records} records: {error}")
			}
		}
	}
}

/// Messages consumed by the background flush task.
#[derive(Debug)]
pub enum FlushCommand {
	Trigger(FlushTrigger),
	/// The interval changed; recompute the next tick.
	Reschedule,
	Shutdown,
}

/// Clears the flushing flag when a flush ends, however it ends.
struct FlushingGuard<'a>(&'a AtomicBool);

impl Drop for FlushingGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::SeqCst);
	}
}

pub struct FlushEngine {
	queue: Arc<PersistentQueue>,
	delivery: DeliveryClient,
	connectivity: Arc<dyn Connectivity>,
	debug_mode: DebugMode,
	interval_ms: AtomicU64,
	flushing: AtomicBool,
	last_attempt: Mutex<Instant>,
}

impl FlushEngine {
	pub fn new(
		queue: Arc<PersistentQueue>,
		delivery: DeliveryClient,
		connectivity: Arc<dyn Connectivity>,
		debug_mode: DebugMode,
		interval_ms: u64,
	) -> Self {
		Self {
			queue,
			delivery,
			connectivity,
			debug_mode,
			interval_ms: AtomicU64::new(interval_ms),
			flushing: AtomicBool::new(false),
			last_attempt: Mutex::new(Instant::now()),
		}
	}

	/// The configured interval, before any debug override.
	pub fn configured_interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms.load(Ordering::SeqCst))
	}

	/// The interval actually applied.
	pub fn effective_interval(&self) -> Duration {
		if self.debug_mode.is_enabled() {
			Duration::from_millis(DEBUG_FLUSH_INTERVAL_MS)
		} else {
			self.configured_interval()
		}
	}

	pub fn set_interval(&self, interval_ms: u64) {
		self.interval_ms.store(interval_ms, Ordering::SeqCst);
	}

	pub fn is_flushing(&self) -> bool {
		self.flushing.load(Ordering::SeqCst)
	}

	fn last_attempt(&self) -> Instant {
		*self.last_attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	fn mark_attempt(&self) {
		*self.last_attempt.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
	}

	/// When the next interval-gated flush becomes due.
	pub fn next_due(&self) -> Instant {
		self.last_attempt() + self.effective_interval()
	}

	/// Evaluates the policy for `trigger` and flushes if it allows.
	pub async fn attempt(&self, trigger: FlushTrigger) -> FlushOutcome {
		if !trigger.bypasses_interval() && Instant::now() < self.next_due() {
			return FlushOutcome::Skipped(SkipReason::IntervalNotElapsed);
		}

		let class = self.connectivity.current_class();
		if !class.is_online() {
			debug!(?trigger, "Skipping flush while offline");
			return FlushOutcome::Skipped(SkipReason::Offline);
		}

		if self
			.flushing
			.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
			.is_err()
		{
			debug!(?trigger, "Flush already in progress, coalescing");
			return FlushOutcome::Coalesced;
		}
		let _guard = FlushingGuard(&self.flushing);
		self.mark_attempt();

		let Some(boundary) = self.queue.last_id() else {
			return FlushOutcome::Empty;
		};

		debug!(?trigger, connection = ?class, through = %boundary, "Flushing queue");
		let report = self.delivery.drain(&self.queue, boundary).await;

		match report.error {
			Some(error) => FlushOutcome::Failed {
				records: report.delivered,
				error: error.to_string(),
			},
			None => {
				if report.delivered > 0 {
					info!(records = report.delivered, rejected = report.rejected, "Flushed queue");
				}
				FlushOutcome::Delivered {
					records: report.delivered,
				}
			}
		}
	}

	/// Runs the background task until shutdown or until every sender is dropped.
	///
	/// Each trigger is evaluated on its own task so the loop keeps draining
	/// commands while a flush is in flight.
	pub async fn run(self: Arc<Self>, mut commands: mpsc::Receiver<FlushCommand>) {
		info!(
			flush_interval_ms = self.effective_interval().as_millis() as u64,
			debug_mode = %self.debug_mode,
			"Starting flush task"
		);

		loop {
			let now = Instant::now();
			let mut deadline = self.next_due();
			if deadline <= now {
				deadline = now + self.effective_interval();
			}
			let sleep = tokio::time::sleep_until(deadline);
			tokio::pin!(sleep);

			tokio::select! {
				_ = &mut sleep => {
					self.spawn_attempt(FlushTrigger::Tick);
				}
				command = commands.recv() => {
					match command {
						Some(FlushCommand::Trigger(trigger)) => self.spawn_attempt(trigger),
						Some(FlushCommand::Reschedule) => {}
						Some(FlushCommand::Shutdown) | None => break,
					}
				}
			}
		}

		info!("Flush task stopped");
	}

	fn spawn_attempt(self: &Arc<Self>, trigger: FlushTrigger) {
		let engine = Arc::clone(self);
		tokio::spawn(async move {
			match engine.attempt(trigger).await {
				FlushOutcome::Failed { records, error } => {
					warn!(?trigger, records, error = %error, "Flush failed");
				}
				outcome => debug!(?trigger, outcome = %outcome, "Flush evaluated"),
			}
		});
	}
}
