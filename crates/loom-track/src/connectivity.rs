// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Connection-class capability consulted before each flush.

use std::sync::atomic::{AtomicU8, Ordering};

use loom_track_core::ConnectionClass;

/// Reports the host's current network class.
pub trait Connectivity: Send + Sync {
	fn current_class(&self) -> ConnectionClass;
}

/// Reports WiFi unconditionally. Used when the host offers no reachability signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
	fn current_class(&self) -> ConnectionClass {
		ConnectionClass::WiFi
	}
}

/// A connectivity value the host updates as reachability changes.
#[derive(Debug)]
pub struct StaticConnectivity {
	class: AtomicU8,
}

impl StaticConnectivity {
	pub fn new(class: ConnectionClass) -> Self {
		Self {
			class: AtomicU8::new(encode(class)),
		}
	}

	pub fn set(&self, class: ConnectionClass) {
		self.class.store(encode(class), Ordering::SeqCst);
	}
}

impl Connectivity for StaticConnectivity {
	fn current_class(&self) -> ConnectionClass {
		match self.class.load(Ordering::SeqCst) {
			0 => ConnectionClass::Offline,
			1 => ConnectionClass::Cellular,
			_ => ConnectionClass::WiFi,
		}
	}
}

fn encode(class: ConnectionClass) -> u8 {
	match class {
		ConnectionClass::Offline => 0,
		ConnectionClass::Cellular => 1,
		ConnectionClass::WiFi => 2,
	}
}
