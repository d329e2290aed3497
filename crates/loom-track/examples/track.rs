// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Track events and update a profile using the loom-track SDK.
//!
//! Run with:
//!   LOOM_TRACK_SERVER_URL=http://localhost:8106/sa cargo run --example track -p loom-track
//!
//! Set `RUST_LOG=loom_track=debug` to see the pipeline at work.

use loom_track::{Properties, TrackClient, TrackConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = TrackConfig::default().with_env_overrides()?;
	println!("Initializing track client...");
	println!("  Server URL: {}", config.server_url.as_deref().unwrap_or("<unset>"));
	println!("  Debug mode: {}", config.debug_mode);

	let client = TrackClient::builder()
		.config(config)
		.app_version("0.1.0-example")
		.build()?;

	println!("  Distinct ID: {}", client.distinct_id());

	client.register_super_properties(
		Properties::new()
			.insert("platform", "example")
			.insert("is_vip", false),
	);

	let receipt = client
		.track(
			"buy_gold",
			Properties::new()
				.insert("gold_price", 12.3)
				.insert("gold_weight", 23)
				.insert("bank", "CMB"),
		)
		.await?;
	println!("Tracked buy_gold (queue id {:?})", receipt.queued);

	if !client.has_signed_up() {
		client.sign_up("user_example_123", Properties::new()).await?;
		println!("Signed up as user_example_123");
	}

	let people = client.people();
	people.set_one("channel", "example").await?;
	people.set_once_one("first_seen", chrono::Utc::now()).await?;
	people.increment_one("logins", 1).await?;
	people
		.append("movies", vec!["Alien".to_string(), "Heat".to_string()])
		.await?;

	println!("Queued records: {}", client.current_queue_count());

	let outcome = client.flush().await?;
	println!("Flush: {outcome}");
	println!("Stats: {:?}", client.stats());

	client.shutdown().await?;
	println!("Done!");
	Ok(())
}
