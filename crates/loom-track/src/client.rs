// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracking client: composition, identity, queueing, and flush control.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use loom_track_core::{
	compose_signup, compose_track, profile, AckCode, Composed, DebugMode, Properties,
	PropertyInput, PropertyMap, ValidationError,
};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::automatic::{automatic_properties, LIB_VERSION};
use crate::config::{normalize_server_url, TrackConfig};
use crate::connectivity::{AlwaysOnline, Connectivity};
use crate::delivery::DeliveryClient;
use crate::error::{Result, TrackError};
use crate::flush::{FlushCommand, FlushEngine, FlushOutcome, FlushTrigger};
use crate::identity::IdentityState;
use crate::queue::{PersistentQueue, RecordId};
use crate::stats::{Stats, StatsSnapshot};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::super_props::SuperProperties;
use crate::transport::{HttpTransport, Transport};

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// What happened to a record handed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
	/// Queue id, or `None` when the record was only validated (`DebugOnly`).
	pub queued: Option<RecordId>,
	/// Properties dropped during composition.
	pub warnings: Vec<ValidationError>,
}

/// Builder for constructing a [`TrackClient`].
pub struct TrackClientBuilder {
	config: TrackConfig,
	store: Option<Arc<dyn KeyValueStore>>,
	transport: Option<Arc<dyn Transport>>,
	connectivity: Option<Arc<dyn Connectivity>>,
}

impl TrackClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			config: TrackConfig::default(),
			store: None,
			transport: None,
			connectivity: None,
		}
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: TrackConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the collection endpoint.
	///
	/// Example: `https://collect.example.com/sa`
	pub fn server_url(mut self, url: impl Into<String>) -> Self {
		self.config.server_url = Some(url.into());
		self
	}

	pub fn debug_mode(mut self, mode: DebugMode) -> Self {
		self.config.debug_mode = mode;
		self
	}

	/// Sets the interval between automatic flushes.
	pub fn flush_interval(mut self, interval: Duration) -> Self {
		self.config.flush_interval_ms = interval.as_millis() as u64;
		self
	}

	pub fn flush_before_background(mut self, enabled: bool) -> Self {
		self.config.flush_before_background = enabled;
		self
	}

	pub fn check_bindings_on_active(mut self, enabled: bool) -> Self {
		self.config.check_bindings_on_active = enabled;
		self
	}

	/// Sets the maximum number of records per delivered batch.
	pub fn max_batch_size(mut self, size: usize) -> Self {
		self.config.max_batch_size = size;
		self
	}

	/// Sets the maximum number of queued records.
	pub fn queue_capacity(mut self, capacity: usize) -> Self {
		self.config.queue_capacity = capacity;
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout_secs = timeout.as_secs().max(1);
		self
	}

	pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.config.storage_dir = Some(dir.into());
		self
	}

	pub fn app_version(mut self, version: impl Into<String>) -> Self {
		self.config.app_version = Some(version.into());
		self
	}

	/// Uses a custom key/value store instead of the file store.
	pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Uses a custom transport instead of HTTP.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
		self.connectivity = Some(connectivity);
		self
	}

	/// Builds the client and starts the background flush task.
	///
	/// Must be called from within a tokio runtime.
	pub fn build(self) -> Result<TrackClient> {
		let runtime = Handle::try_current().map_err(|_| TrackError::NoRuntime)?;
		let config = self.config;
		config.validate()?;

		let server_url = match &config.server_url {
			Some(url) => Some(
				normalize_server_url(url).ok_or_else(|| TrackError::InvalidServerUrl(url.clone()))?,
			),
			None => None,
		};

		let transport: Arc<dyn Transport> = match (self.transport, &server_url) {
			(Some(transport), _) => transport,
			(None, Some(url)) => Arc::new(HttpTransport::new(url.clone(), config.request_timeout())?),
			(None, None) => return Err(TrackError::InvalidServerUrl(String::new())),
		};

		let store = match self.store {
			Some(store) => store,
			None => open_store(&config)?,
		};
		let connectivity: Arc<dyn Connectivity> = match self.connectivity {
			Some(connectivity) => connectivity,
			None => Arc::new(AlwaysOnline),
		};

		let stats = Arc::new(Stats::new());
		let identity = IdentityState::load(store.clone());
		let super_properties = SuperProperties::load(store.clone());
		let queue = Arc::new(PersistentQueue::open(
			store,
			config.queue_capacity,
			stats.clone(),
		));
		let delivery = DeliveryClient::new(transport, config.max_batch_size, stats.clone());
		let engine = Arc::new(FlushEngine::new(
			queue.clone(),
			delivery.clone(),
			connectivity,
			config.debug_mode,
			config.flush_interval_ms,
		));

		let (commands, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
		let flush_handle = runtime.spawn(engine.clone().run(rx));

		info!(
			server_url = server_url.as_deref().unwrap_or("<custom transport>"),
			debug_mode = %config.debug_mode,
			queued = queue.count(),
			"Track client initialized"
		);

		Ok(TrackClient {
			inner: Arc::new(ClientInner {
				debug_mode: config.debug_mode,
				flush_before_background: AtomicBool::new(config.flush_before_background),
				check_bindings_on_active: AtomicBool::new(config.check_bindings_on_active),
				automatic: automatic_properties(config.app_version.as_deref()),
				identity,
				super_properties,
				queue,
				delivery,
				engine,
				stats,
				commands,
				flush_handle: Mutex::new(Some(flush_handle)),
				closed: AtomicBool::new(false),
			}),
		})
	}
}

impl Default for TrackClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Opens the file store. An explicitly configured directory must open; the
/// platform default falls back to memory.
fn open_store(config: &TrackConfig) -> Result<Arc<dyn KeyValueStore>> {
	if let Some(dir) = &config.storage_dir {
		let store = FileStore::open(dir)?;
		debug!(dir = %store.dir().display(), "Opened track store");
		return Ok(Arc::new(store));
	}

	let Some(dir) = config.resolved_storage_dir() else {
		warn!("No storage directory available, queue will not survive restarts");
		return Ok(Arc::new(MemoryStore::new()));
	};
	match FileStore::open(&dir) {
		Ok(store) => {
			debug!(dir = %store.dir().display(), "Opened track store");
			Ok(Arc::new(store))
		}
		Err(e) => {
			warn!(dir = %dir.display(), error = %e, "Failed to open track store, using memory");
			Ok(Arc::new(MemoryStore::new()))
		}
	}
}

struct ClientInner {
	debug_mode: DebugMode,
	flush_before_background: AtomicBool,
	check_bindings_on_active: AtomicBool,
	automatic: PropertyMap,
	identity: IdentityState,
	super_properties: SuperProperties,
	queue: Arc<PersistentQueue>,
	delivery: DeliveryClient,
	engine: Arc<FlushEngine>,
	stats: Arc<Stats>,
	commands: mpsc::Sender<FlushCommand>,
	flush_handle: Mutex<Option<JoinHandle<()>>>,
	closed: AtomicBool,
}

/// Client for tracking events and updating user profiles.
///
/// # Example
///
/// ```ignore
/// use loom_track::{Properties, TrackClient};
///
/// let client = TrackClient::builder()
///     .server_url("https://collect.example.com/sa")
///     .build()?;
///
/// client.track("buy_gold", Properties::new()
///     .insert("gold_price", 12.3)
///     .insert("bank", "CMB")
/// ).await?;
///
/// client.people().set_one("channel", "baidu").await?;
/// client.flush().await?;
/// ```
#[derive(Clone)]
pub struct TrackClient {
	inner: Arc<ClientInner>,
}

impl TrackClient {
	/// Creates a new builder for constructing a TrackClient.
	pub fn builder() -> TrackClientBuilder {
		TrackClientBuilder::new()
	}

	/// The SDK version.
	pub fn lib_version() -> &'static str {
		LIB_VERSION
	}

	pub fn debug_mode(&self) -> DebugMode {
		self.inner.debug_mode
	}

	/// Sets the distinct id used for every later record.
	pub fn identify(&self, distinct_id: &str) -> Result<()> {
		self.check_closed()?;
		self.inner.identity.identify(distinct_id)
	}

	/// The current distinct id, generating an anonymous one if none exists.
	pub fn distinct_id(&self) -> String {
		self.inner.identity.distinct_id_or_generate()
	}

	pub fn has_signed_up(&self) -> bool {
		self.inner.identity.has_signed_up()
	}

	/// Tracks an event.
	///
	/// Invalid properties are dropped and reported in the receipt; an invalid
	/// event name fails the call without producing a record.
	pub async fn track(&self, event: &str, properties: Properties) -> Result<Receipt> {
		self.check_closed()?;
		let distinct_id = self.inner.identity.distinct_id_or_generate();
		let composed = compose_track(
			event,
			&distinct_id,
			&properties,
			&self.inner.super_properties.snapshot(),
			&self.inner.automatic,
		)?;
		self.submit(composed).await
	}

	/// Links the current anonymous id to `new_id`. Allowed once per install.
	pub async fn sign_up(&self, new_id: &str, properties: Properties) -> Result<Receipt> {
		self.check_closed()?;
		let super_properties = self.inner.super_properties.snapshot();
		let composed = self.inner.identity.sign_up(new_id, |original_id| {
			compose_signup(
				new_id,
				original_id,
				&properties,
				&super_properties,
				&self.inner.automatic,
			)
		})?;
		self.submit(composed).await
	}

	/// Merges `properties` into the super properties; returns skipped entries.
	pub fn register_super_properties(&self, properties: Properties) -> Vec<ValidationError> {
		self.inner.super_properties.register(properties)
	}

	pub fn unregister_super_property(&self, key: &str) {
		self.inner.super_properties.unregister(key);
	}

	pub fn clear_super_properties(&self) {
		self.inner.super_properties.clear();
	}

	/// A copy of the registered super properties.
	pub fn current_super_properties(&self) -> Properties {
		self.inner.super_properties.snapshot()
	}

	/// Flushes now, ignoring the interval. Still requires connectivity.
	pub async fn flush(&self) -> Result<FlushOutcome> {
		self.check_closed()?;
		Ok(self.inner.engine.attempt(FlushTrigger::Manual).await)
	}

	/// Number of queued records. Advisory.
	pub fn current_queue_count(&self) -> usize {
		self.inner.queue.count()
	}

	/// Profile operations for the current distinct id.
	pub fn people(&self) -> People<'_> {
		People { client: self }
	}

	/// Tells the client the host moved to the background.
	pub fn on_background(&self) {
		if self.flush_before_background() {
			debug!("Entering background, requesting flush");
			self.send_command(FlushCommand::Trigger(FlushTrigger::Background));
		}
	}

	/// Tells the client the host became active.
	pub fn on_foreground(&self) {
		debug!(
			check_bindings_on_active = self.check_bindings_on_active(),
			"Host became active"
		);
	}

	/// Changes the flush interval. Debug modes keep their fixed interval.
	pub fn set_flush_interval(&self, interval: Duration) {
		self.inner.engine.set_interval(interval.as_millis() as u64);
		self.send_command(FlushCommand::Reschedule);
	}

	/// The interval currently applied.
	pub fn flush_interval(&self) -> Duration {
		self.inner.engine.effective_interval()
	}

	pub fn set_flush_before_background(&self, enabled: bool) {
		self.inner.flush_before_background.store(enabled, Ordering::SeqCst);
	}

	pub fn flush_before_background(&self) -> bool {
		self.inner.flush_before_background.load(Ordering::SeqCst)
	}

	pub fn set_check_bindings_on_active(&self, enabled: bool) {
		self.inner.check_bindings_on_active.store(enabled, Ordering::SeqCst);
	}

	pub fn check_bindings_on_active(&self) -> bool {
		self.inner.check_bindings_on_active.load(Ordering::SeqCst)
	}

	pub fn stats(&self) -> StatsSnapshot {
		self.inner.stats.snapshot()
	}

	/// Stops the background flush task. Queued records stay persisted.
	///
	/// After calling this, subsequent operations will return `ClientShutdown` errors.
	pub async fn shutdown(&self) -> Result<()> {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}

		info!(queued = self.inner.queue.count(), "Shutting down track client");
		// The task also exits once every sender is gone.
		let _ = self.inner.commands.send(FlushCommand::Shutdown).await;

		if let Some(handle) = self.inner.flush_handle.lock().await.take() {
			if let Err(e) = handle.await {
				error!(error = %e, "Error waiting for flush task to complete");
			}
		}

		info!("Track client shutdown complete");
		Ok(())
	}

	/// Returns true once [`shutdown`](Self::shutdown) has been called.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	fn check_closed(&self) -> Result<()> {
		if self.inner.closed.load(Ordering::SeqCst) {
			return Err(TrackError::ClientShutdown);
		}
		Ok(())
	}

	fn send_command(&self, command: FlushCommand) {
		if let Err(e) = self.inner.commands.try_send(command) {
			debug!(error = %e, "Flush command not delivered");
		}
	}

	/// Validates (debug modes) and queues a composed record.
	async fn submit(&self, composed: Composed) -> Result<Receipt> {
		let Composed { record, warnings } = composed;
		for warning in &warnings {
			warn!(kind = %record.kind(), error = %warning, "Dropped invalid property");
		}

		let mode = self.inner.debug_mode;
		if mode.is_enabled() {
			match self.inner.delivery.validate(&record, true).await {
				Ok(AckCode::Accepted) => {
					debug!(kind = %record.kind(), event = ?record.event(), "Debug validation passed");
				}
				Ok(AckCode::Rejected(reason)) => {
					error!(
						kind = %record.kind(),
						event = ?record.event(),
						reason = %reason,
						"Debug validation rejected record"
					);
					return Err(TrackError::DebugRejected { reason });
				}
				Err(e) if mode.imports_records() => {
					warn!(error = %e, "Debug validation unavailable, queueing unvalidated record");
				}
				Err(e) => return Err(TrackError::Transport(e)),
			}

			if !mode.imports_records() {
				return Ok(Receipt {
					queued: None,
					warnings,
				});
			}
		}

		debug!(kind = %record.kind(), event = ?record.event(), "Queueing record");
		let id = self.inner.queue.append(record);
		self.send_command(FlushCommand::Trigger(FlushTrigger::Appended));
		Ok(Receipt {
			queued: Some(id),
			warnings,
		})
	}
}

/// Profile operations, obtained from [`TrackClient::people`].
pub struct People<'a> {
	client: &'a TrackClient,
}

impl People<'_> {
	/// Sets profile properties, overwriting existing values.
	pub async fn set(&self, properties: Properties) -> Result<Receipt> {
		self.client.check_closed()?;
		let composed = profile::set(&self.client.distinct_id(), &properties)?;
		self.client.submit(composed).await
	}

	pub async fn set_one(&self, key: &str, value: impl Into<PropertyInput>) -> Result<Receipt> {
		self.set(Properties::new().insert(key, value)).await
	}

	/// Sets profile properties that are not already present.
	pub async fn set_once(&self, properties: Properties) -> Result<Receipt> {
		self.client.check_closed()?;
		let composed = profile::set_once(&self.client.distinct_id(), &properties)?;
		self.client.submit(composed).await
	}

	pub async fn set_once_one(&self, key: &str, value: impl Into<PropertyInput>) -> Result<Receipt> {
		self.set_once(Properties::new().insert(key, value)).await
	}

	pub async fn unset(&self, key: &str) -> Result<Receipt> {
		self.client.check_closed()?;
		let record = profile::unset(&self.client.distinct_id(), key)?;
		self.client.submit(Composed {
			record,
			warnings: Vec::new(),
		})
		.await
	}

	/// Adds numeric amounts to profile properties.
	pub async fn increment(&self, amounts: Properties) -> Result<Receipt> {
		self.client.check_closed()?;
		let record = profile::increment(&self.client.distinct_id(), &amounts)?;
		self.client.submit(Composed {
			record,
			warnings: Vec::new(),
		})
		.await
	}

	pub async fn increment_one(&self, key: &str, amount: impl Into<PropertyInput>) -> Result<Receipt> {
		self.increment(Properties::new().insert(key, amount)).await
	}

	/// Appends strings to a set-valued profile property.
	pub async fn append(&self, key: &str, values: impl Into<PropertyInput>) -> Result<Receipt> {
		self.client.check_closed()?;
		let record = profile::append(&self.client.distinct_id(), key, values.into())?;
		self.client.submit(Composed {
			record,
			warnings: Vec::new(),
		})
		.await
	}

	/// Deletes the whole profile.
	pub async fn delete_user(&self) -> Result<Receipt> {
		self.client.check_closed()?;
		let record = profile::delete(&self.client.distinct_id());
		self.client.submit(Composed {
			record,
			warnings: Vec::new(),
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::{PayloadKind, TransportError};
	use async_trait::async_trait;
	use loom_track_core::{EventType, PropertyValue};
	use std::sync::Mutex as StdMutex;

	#[derive(Default)]
	struct RecordingTransport {
		payloads: StdMutex<Vec<(serde_json::Value, PayloadKind)>>,
	}

	#[async_trait]
	impl Transport for RecordingTransport {
		async fn send(&self, payload: Vec<u8>, kind: PayloadKind) -> std::result::Result<AckCode, TransportError> {
			let json = serde_json::from_slice(&payload).unwrap();
			self.payloads.lock().unwrap().push((json, kind));
			Ok(AckCode::Accepted)
		}
	}

	fn client_with(transport: Arc<RecordingTransport>) -> TrackClient {
		TrackClient::builder()
			.store(Arc::new(MemoryStore::new()))
			.transport(transport)
			.build()
			.unwrap()
	}

	#[test]
	fn test_build_requires_runtime() {
		let result = TrackClient::builder()
			.server_url("https://collect.example.com/sa")
			.store(Arc::new(MemoryStore::new()))
			.build();
		assert!(matches!(result, Err(TrackError::NoRuntime)));
	}

	#[tokio::test]
	async fn test_build_requires_server_url_without_transport() {
		let result = TrackClient::builder()
			.store(Arc::new(MemoryStore::new()))
			.build();
		assert!(matches!(result, Err(TrackError::InvalidServerUrl(_))));

		let result = TrackClient::builder()
			.server_url("not a url")
			.store(Arc::new(MemoryStore::new()))
			.build();
		assert!(matches!(result, Err(TrackError::InvalidServerUrl(_))));
	}

	#[tokio::test]
	async fn test_build_rejects_invalid_config() {
		let result = TrackClient::builder()
			.transport(Arc::new(RecordingTransport::default()))
			.store(Arc::new(MemoryStore::new()))
			.queue_capacity(0)
			.build();
		assert!(matches!(result, Err(TrackError::Config(_))));
	}

	#[tokio::test]
	async fn test_track_queues_with_automatic_properties() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		client.identify("user_1").unwrap();

		let receipt = client
			.track("buy_gold", Properties::new().insert("gold_price", 12.3))
			.await
			.unwrap();
		assert!(receipt.queued.is_some());
		assert!(receipt.warnings.is_empty());
		assert_eq!(client.current_queue_count(), 1);

		let queued = client.inner.queue.snapshot();
		let record = &queued[0].record;
		assert_eq!(record.distinct_id(), "user_1");
		assert_eq!(record.properties().get("$lib"), Some(&PropertyValue::from("rust")));
		assert!(record.properties().contains_key("gold_price"));
	}

	#[tokio::test]
	async fn test_track_invalid_event_name_produces_nothing() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		let result = client.track("", Properties::new()).await;
		assert!(matches!(
			result,
			Err(TrackError::Validation(ValidationError::InvalidEventName(_)))
		));
		assert_eq!(client.current_queue_count(), 0);
	}

	#[tokio::test]
	async fn test_profile_operations_produce_profile_records() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		client.identify("user_1").unwrap();
		let people = client.people();

		people.set_one("channel", "baidu").await.unwrap();
		people.set_once_one("first_seen", "today").await.unwrap();
		people.unset("channel").await.unwrap();
		people.increment_one("logins", 1).await.unwrap();
		people
			.append("movies", vec!["Alien".to_string()])
			.await
			.unwrap();
		people.delete_user().await.unwrap();

		let kinds: Vec<EventType> = client
			.inner
			.queue
			.snapshot()
			.iter()
			.map(|entry| entry.record.kind())
			.collect();
		assert_eq!(
			kinds,
			vec![
				EventType::ProfileSet,
				EventType::ProfileSetOnce,
				EventType::ProfileUnset,
				EventType::ProfileIncrement,
				EventType::ProfileAppend,
				EventType::ProfileDelete,
			]
		);
	}

	#[tokio::test]
	async fn test_profile_validation_failures_produce_nothing() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		let people = client.people();

		assert!(matches!(
			people.increment_one("plan", "pro").await,
			Err(TrackError::Validation(ValidationError::NonNumericIncrement { .. }))
		));
		assert!(matches!(
			people.append("movies", "Alien").await,
			Err(TrackError::Validation(ValidationError::NonStringSetAppend { .. }))
		));
		assert_eq!(client.current_queue_count(), 0);
	}

	#[tokio::test]
	async fn test_debug_only_validates_without_queueing() {
		let transport = Arc::new(RecordingTransport::default());
		let client = TrackClient::builder()
			.store(Arc::new(MemoryStore::new()))
			.transport(transport.clone())
			.debug_mode(DebugMode::DebugOnly)
			.build()
			.unwrap();

		let receipt = client.track("login", Properties::new()).await.unwrap();
		assert_eq!(receipt.queued, None);
		assert_eq!(client.current_queue_count(), 0);
		assert_eq!(client.flush_interval(), Duration::from_secs(1));

		let payloads = transport.payloads.lock().unwrap().clone();
		assert_eq!(payloads.len(), 1);
		assert_eq!(payloads[0].1, PayloadKind::Validate { dry_run: true });
	}

	#[tokio::test]
	async fn test_debug_and_track_validates_then_queues() {
		let transport = Arc::new(RecordingTransport::default());
		let client = TrackClient::builder()
			.store(Arc::new(MemoryStore::new()))
			.transport(transport.clone())
			.debug_mode(DebugMode::DebugAndTrack)
			.build()
			.unwrap();

		let receipt = client.track("login", Properties::new()).await.unwrap();
		assert!(receipt.queued.is_some());
		assert_eq!(transport.payloads.lock().unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_runtime_settings() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		assert_eq!(client.flush_interval(), Duration::from_secs(60));
		client.set_flush_interval(Duration::from_secs(15));
		assert_eq!(client.flush_interval(), Duration::from_secs(15));

		assert!(!client.flush_before_background());
		client.set_flush_before_background(true);
		assert!(client.flush_before_background());

		assert!(client.check_bindings_on_active());
		client.set_check_bindings_on_active(false);
		assert!(!client.check_bindings_on_active());

		assert_eq!(TrackClient::lib_version(), env!("CARGO_PKG_VERSION"));
	}

	#[tokio::test]
	async fn test_shutdown_rejects_further_calls() {
		let client = client_with(Arc::new(RecordingTransport::default()));
		client.shutdown().await.unwrap();
		client.shutdown().await.unwrap();
		assert!(client.is_closed());

		assert!(matches!(
			client.track("login", Properties::new()).await,
			Err(TrackError::ClientShutdown)
		));
		assert!(matches!(client.flush().await, Err(TrackError::ClientShutdown)));
		assert!(matches!(client.identify("user_1"), Err(TrackError::ClientShutdown)));
	}
}
