// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! System-derived properties attached to track and signup records.

use loom_track_core::{PropertyMap, PropertyValue};

/// Value of the `$lib` property.
pub const LIB_NAME: &str = "rust";

/// The SDK version.
pub const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the automatic property layer.
pub fn automatic_properties(app_version: Option<&str>) -> PropertyMap {
	let mut properties = PropertyMap::new();
	properties.insert("$lib".to_string(), PropertyValue::from(LIB_NAME));
	properties.insert("$lib_version".to_string(), PropertyValue::from(LIB_VERSION));
	properties.insert("$os".to_string(), PropertyValue::from(std::env::consts::OS));
	properties.insert("$arch".to_string(), PropertyValue::from(std::env::consts::ARCH));
	if let Some(version) = app_version {
		properties.insert("$app_version".to_string(), PropertyValue::from(version));
	}
	properties
}
