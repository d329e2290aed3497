// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom tracking SDK.
//!
//! This crate holds everything about an event that can be decided without I/O:
//!
//! - [`PropertyValue`]: the closed set of value types an event may carry
//! - [`Properties`]: the loosely-typed builder callers hand to the SDK
//! - [`resolve`]: the three-way merge of call-site, super, and automatic properties
//! - [`EventRecord`]: the immutable, composed unit that gets queued and delivered
//! - [`profile`]: translation of profile operations into records
//!
//! The SDK client in `loom-track` adds identity, persistence, and delivery on top.

pub mod compose;
pub mod error;
pub mod mode;
pub mod profile;
pub mod record;
pub mod resolve;
pub mod validate;
pub mod value;

pub use compose::{compose_signup, compose_track, Composed};
pub use error::{Result, ValidationError};
pub use mode::{AckCode, ConnectionClass, DebugMode};
pub use record::{EventRecord, EventType, SIGNUP_EVENT};
pub use resolve::{resolve, validate_entry, Resolution};
pub use validate::{
	is_valid_property_name, validate_distinct_id, validate_event_name, MAX_DISTINCT_ID_LENGTH,
	MAX_NAME_LENGTH,
};
pub use value::{Properties, PropertyInput, PropertyMap, PropertyValue};
