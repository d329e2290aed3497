// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Name and identifier validation.

use crate::error::{Result, ValidationError};

/// Maximum allowed length for event and property names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for a distinct id.
pub const MAX_DISTINCT_ID_LENGTH: usize = 255;

/// Returns true if `name` is usable as an event or property name.
///
/// Valid names:
/// - are 1 to 100 characters long
/// - start with an ASCII letter or `_`
/// - contain only ASCII letters, digits, and `_`
pub fn is_valid_property_name(name: &str) -> bool {
	if name.is_empty() || name.len() > MAX_NAME_LENGTH {
		return false;
	}

	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}

	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates an event name against the property-name rules.
pub fn validate_event_name(name: &str) -> Result<()> {
	if is_valid_property_name(name) {
		Ok(())
	} else {
		Err(ValidationError::InvalidEventName(name.to_string()))
	}
}

/// Validates a distinct id: non-blank and at most 255 characters.
pub fn validate_distinct_id(id: &str) -> Result<()> {
	if id.trim().is_empty() || id.len() > MAX_DISTINCT_ID_LENGTH {
		return Err(ValidationError::InvalidDistinctId(id.to_string()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn accepts_identifier_names() {
		for name in ["a", "_private", "GoldPrice", "buy_gold_2"] {
			assert!(is_valid_property_name(name), "{name} should be valid");
		}
	}

	#[test]
	fn rejects_malformed_names() {
		for name in ["", "2fast", "has space", "dash-name", "$os", "ünïcode"] {
			assert!(!is_valid_property_name(name), "{name} should be invalid");
		}
	}

	#[test]
	fn record_field_names_are_ordinary_keys() {
		for name in ["id", "date", "time", "event", "user_id", "properties"] {
			assert!(is_valid_property_name(name), "{name} should be valid");
			assert!(validate_event_name(name).is_ok());
		}
	}

	#[test]
	fn rejects_overlong_names() {
		let name = "a".repeat(MAX_NAME_LENGTH + 1);
		assert!(!is_valid_property_name(&name));
		assert!(is_valid_property_name(&name[..MAX_NAME_LENGTH]));
	}

	#[test]
	fn event_name_errors_carry_the_name() {
		let err = validate_event_name("bad name").unwrap_err();
		assert_eq!(err, ValidationError::InvalidEventName("bad name".into()));
	}

	#[test]
	fn distinct_id_rules() {
		assert!(validate_distinct_id("user@example.com").is_ok());
		assert!(validate_distinct_id("").is_err());
		assert!(validate_distinct_id("   ").is_err());
		assert!(validate_distinct_id(&"x".repeat(MAX_DISTINCT_ID_LENGTH + 1)).is_err());
	}

	proptest! {
		#[test]
		fn generated_identifiers_are_valid(name in "[a-zA-Z_][a-zA-Z0-9_]{0,60}") {
			prop_assert!(is_valid_property_name(&name));
		}

		#[test]
		fn leading_digit_is_always_invalid(name in "[0-9][a-zA-Z0-9_]{0,20}") {
			prop_assert!(!is_valid_property_name(&name));
		}
	}
}
