// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Property resolution: priority merge plus type validation.
//!
//! For a key present in more than one layer the resolved value is chosen
//! call-site > super > automatic. Automatic properties are system-derived and
//! inserted as-is; the other two layers are validated entry by entry, and an
//! invalid entry is dropped (leaving any lower-priority value in place) with
//! a warning rather than failing the whole record.

use crate::error::ValidationError;
use crate::validate::is_valid_property_name;
use crate::value::{Properties, PropertyInput, PropertyMap, PropertyValue};

/// The outcome of a merge: the composed map and any dropped entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
	pub properties: PropertyMap,
	pub warnings: Vec<ValidationError>,
}

/// Merges the three property layers by priority.
pub fn resolve(call_site: &Properties, super_properties: &Properties, automatic: &PropertyMap) -> Resolution {
	let mut resolution = Resolution {
		properties: automatic.clone(),
		warnings: Vec::new(),
	};

	for layer in [super_properties, call_site] {
		for (key, input) in layer.iter() {
			match validate_entry(key, input) {
				Ok(value) => {
					resolution.properties.insert(key.clone(), value);
				}
				Err(err) => resolution.warnings.push(err),
			}
		}
	}

	resolution
}

/// Validates a single key/value pair from a caller-supplied layer.
pub fn validate_entry(key: &str, input: &PropertyInput) -> Result<PropertyValue, ValidationError> {
	if !is_valid_property_name(key) {
		return Err(ValidationError::InvalidPropertyName(key.to_string()));
	}
	input
		.clone()
		.into_value()
		.map_err(|reason| ValidationError::invalid_value(key, reason))
}
