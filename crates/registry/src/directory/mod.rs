//! The registry of registries.
//!
//! # Mental Model
//!
//! A [`RegistryDirectory`] is itself a [`SimpleRegistry`] whose values are
//! [`RegistryRecord`]s. Freezing it closes the collection window; every lifecycle pass
//! after that walks the records in creation order.
//!
//! # Invariants
//!
//! - Creation indices are strictly increasing.
//! - `populate`, `freeze_all` and `reload` refuse to run before the collection is closed.
//! - A registry frozen before population is skipped with a warning, never written to.
//!   During a reload pass non-reloadable registries are expected to be frozen and are
//!   kept without a warning; `reload` itself warns about each of them once.
//! - A failing listener is reported; the remaining listeners and registries still run.
//!   A listener hitting [`RegistryError::Conflict`] aborts the pass instead.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use cairn_primitives::ResourceId;
use parking_lot::Mutex;

use crate::error::{DirectoryError, RegistryError};
use crate::registry::{
	Registry, RegistryLifecycle, RegistryValue, ReloadPermit, ReloadableRegistry, SimpleRegistry,
};

mod event;
mod report;

pub use event::RegistrationEvent;
pub use report::{FreezeReport, ListenerFailure, PopulationReport, ReloadReport};

/// Callback invoked once per population pass of the registry it subscribed to.
pub type Listener<T> =
	Arc<dyn Fn(&RegistrationEvent<'_, T>) -> Result<(), RegistryError> + Send + Sync>;

/// How a registry receives its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
	/// A [`RegistrationEvent`] is fired on every population pass.
	Event,
	/// Filled by someone holding the registry directly (usually a data type).
	Direct,
}

struct Typed<T: ?Sized + RegistryValue> {
	registry: Arc<dyn Registry<T>>,
	listeners: Mutex<Vec<(String, Listener<T>)>>,
}

trait Dispatch: Send + Sync {
	fn dispatch(&self, directory: &RegistryDirectory) -> Result<Vec<ListenerFailure>, DirectoryError>;
}

impl<T: ?Sized + RegistryValue> Dispatch for Typed<T> {
	fn dispatch(&self, directory: &RegistryDirectory) -> Result<Vec<ListenerFailure>, DirectoryError> {
		let listeners = self.listeners.lock().clone();
		let event = RegistrationEvent::new(&self.registry, directory);
		let registry = self.registry.registry_key();

		let mut failures = Vec::new();
		for (name, listener) in listeners {
			let message = match catch_unwind(AssertUnwindSafe(|| listener(&event))) {
				Ok(Ok(())) => continue,
				Ok(Err(error)) if error.is_conflict() => {
					tracing::error!(%registry, listener = %name, %error, "registry.populate.conflict");
					return Err(DirectoryError::ListenerConflict {
						registry: registry.clone(),
						listener: name,
						source: error,
					});
				}
				Ok(Err(error)) => error.to_string(),
				Err(payload) => panic_message(payload.as_ref()),
			};
			tracing::error!(%registry, listener = %name, error = %message, "registry.populate.listener_failed");
			failures.push(ListenerFailure {
				registry: registry.clone(),
				listener: name,
				message,
			});
		}
		Ok(failures)
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		format!("panicked: {message}")
	} else if let Some(message) = payload.downcast_ref::<String>() {
		format!("panicked: {message}")
	} else {
		"panicked".to_owned()
	}
}

/// One collected registry.
pub struct RegistryRecord {
	index: u32,
	registry: Arc<dyn RegistryLifecycle>,
	typed: Arc<dyn Any + Send + Sync>,
	dispatch: Option<Arc<dyn Dispatch>>,
}

impl RegistryRecord {
	/// Creation index; lifecycle passes run in ascending order.
	pub fn index(&self) -> u32 {
		self.index
	}

	pub fn key(&self) -> &ResourceId {
		self.registry.registry_key()
	}

	pub fn registry(&self) -> &Arc<dyn RegistryLifecycle> {
		&self.registry
	}

	pub fn population(&self) -> Population {
		if self.dispatch.is_some() {
			Population::Event
		} else {
			Population::Direct
		}
	}
}

impl std::fmt::Debug for RegistryRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryRecord")
			.field("index", &self.index)
			.field("key", self.key())
			.field("population", &self.population())
			.finish()
	}
}

/// Owns every registry and drives collect → populate → freeze, and reload.
pub struct RegistryDirectory {
	records: Arc<SimpleRegistry<RegistryRecord>>,
	next_index: AtomicU32,
	/// Set by `reload`, cleared by the `freeze_all` that ends the pass.
	reloading: AtomicBool,
}

impl RegistryDirectory {
	pub fn new(key: ResourceId) -> Self {
		Self {
			records: SimpleRegistry::new(key),
			next_index: AtomicU32::new(0),
			reloading: AtomicBool::new(false),
		}
	}

	pub fn key(&self) -> &ResourceId {
		self.records.registry_key()
	}

	/// Creates and collects a registry that is frozen once for good.
	pub fn create_simple<T: ?Sized + RegistryValue>(
		&self,
		key: ResourceId,
		population: Population,
	) -> Result<Arc<SimpleRegistry<T>>, DirectoryError> {
		let registry = SimpleRegistry::<T>::new(key);
		self.adopt::<T, _>(Arc::clone(&registry), population)?;
		Ok(registry)
	}

	/// Creates and collects a registry that is cleared on every reload.
	pub fn create_reloadable<T: ?Sized + RegistryValue>(
		&self,
		key: ResourceId,
		population: Population,
	) -> Result<Arc<ReloadableRegistry<T>>, DirectoryError> {
		let registry = ReloadableRegistry::<T>::new(key);
		self.adopt::<T, _>(Arc::clone(&registry), population)?;
		Ok(registry)
	}

	/// Collects a registry built elsewhere.
	pub fn adopt<T, R>(&self, registry: Arc<R>, population: Population) -> Result<(), DirectoryError>
	where
		T: ?Sized + RegistryValue,
		R: Registry<T>,
	{
		let key = registry.registry_key().clone();
		if self.is_closed() {
			return Err(DirectoryError::Closed(key));
		}
		if registry.is_frozen() {
			return Err(DirectoryError::FrozenRegistry(key));
		}

		let lifecycle: Arc<dyn RegistryLifecycle> = registry.clone();
		let typed = Arc::new(Typed::<T> {
			registry,
			listeners: Mutex::new(Vec::new()),
		});
		let dispatch: Option<Arc<dyn Dispatch>> = match population {
			Population::Event => Some(typed.clone()),
			Population::Direct => None,
		};
		let record = RegistryRecord {
			index: self.next_index.fetch_add(1, Ordering::Relaxed),
			registry: lifecycle,
			typed,
			dispatch,
		};
		let index = record.index;

		self.records
			.register(key.clone(), Arc::new(record))
			.map_err(|error| match error {
				RegistryError::DuplicateKey { id, .. } => DirectoryError::DuplicateRegistry(id),
				RegistryError::Frozen { id, .. } => DirectoryError::Closed(id),
				other => DirectoryError::Registry(other),
			})?;
		tracing::debug!(registry = %key, index, ?population, "registry.collect");
		Ok(())
	}

	/// Closes the collection window. No registry can be added afterwards.
	pub fn close_collection(&self) -> Result<(), DirectoryError> {
		self.records.freeze()?;
		tracing::info!(registries = self.records.len(), "registry.collection.closed");
		Ok(())
	}

	pub fn is_closed(&self) -> bool {
		self.records.is_frozen()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Collected registries in creation order.
	pub fn records(&self) -> Vec<Arc<RegistryRecord>> {
		let mut records = self.records.values();
		records.sort_by_key(|record| record.index);
		records
	}

	pub fn record(&self, key: &ResourceId) -> Option<Arc<RegistryRecord>> {
		self.records.retrieve_value(key)
	}

	pub fn contains(&self, key: &ResourceId) -> bool {
		self.records.contains_key(key)
	}

	/// Typed access to a collected registry.
	pub fn registry<T: ?Sized + RegistryValue>(
		&self,
		key: &ResourceId,
	) -> Result<Arc<dyn Registry<T>>, DirectoryError> {
		let record = self
			.record(key)
			.ok_or_else(|| DirectoryError::UnknownRegistry(key.clone()))?;
		record
			.typed
			.downcast_ref::<Typed<T>>()
			.map(|typed| Arc::clone(&typed.registry))
			.ok_or_else(|| DirectoryError::TypeMismatch(key.clone()))
	}

	/// Adds a listener to an event-populated registry. Listeners run in subscription order.
	pub fn subscribe<T, F>(&self, key: &ResourceId, name: impl Into<String>, listener: F) -> Result<(), DirectoryError>
	where
		T: ?Sized + RegistryValue,
		F: Fn(&RegistrationEvent<'_, T>) -> Result<(), RegistryError> + Send + Sync + 'static,
	{
		let record = self
			.record(key)
			.ok_or_else(|| DirectoryError::UnknownRegistry(key.clone()))?;
		if record.dispatch.is_none() {
			return Err(DirectoryError::NoEvents(key.clone()));
		}
		let typed = record
			.typed
			.downcast_ref::<Typed<T>>()
			.ok_or_else(|| DirectoryError::TypeMismatch(key.clone()))?;

		let name = name.into();
		tracing::trace!(registry = %key, listener = %name, "registry.subscribe");
		typed.listeners.lock().push((name, Arc::new(listener)));
		Ok(())
	}

	fn ensure_closed(&self) -> Result<(), DirectoryError> {
		if self.is_closed() {
			Ok(())
		} else {
			Err(DirectoryError::NotClosed)
		}
	}

	/// Fires one registration event per unfrozen event-populated registry, in creation order.
	///
	/// Fails with [`DirectoryError::ListenerConflict`] as soon as a listener declares
	/// something that conflicts with an earlier declaration.
	pub fn populate(&self) -> Result<PopulationReport, DirectoryError> {
		self.ensure_closed()?;

		let reloading = self.reloading.load(Ordering::Acquire);
		let mut report = PopulationReport::default();
		for record in self.records() {
			if reloading && !record.registry.is_reloadable() {
				tracing::trace!(registry = %record.key(), "registry.populate.keep_static");
				report.kept_static.push(record.key().clone());
				continue;
			}
			if record.registry.is_frozen() {
				tracing::warn!(registry = %record.key(), "registry.populate.skip_frozen");
				report.skipped_frozen.push(record.key().clone());
				continue;
			}
			let Some(dispatch) = &record.dispatch else {
				continue;
			};
			report.failures.extend(dispatch.dispatch(self)?);
			report.populated.push(record.key().clone());
		}
		tracing::debug!(
			populated = report.populated.len(),
			failures = report.failures.len(),
			"registry.populate.done"
		);
		Ok(report)
	}

	/// Freezes every registry that is still open, in creation order.
	pub fn freeze_all(&self) -> Result<FreezeReport, DirectoryError> {
		self.ensure_closed()?;

		let mut report = FreezeReport::default();
		for record in self.records() {
			if record.registry.is_frozen() {
				report.already_frozen.push(record.key().clone());
				continue;
			}
			record.registry.freeze()?;
			report.frozen.push(record.key().clone());
		}
		self.reloading.store(false, Ordering::Release);
		Ok(report)
	}

	/// Clears every reloadable registry and reopens it for population.
	///
	/// Nothing is cleared unless every reloadable registry is currently frozen.
	pub fn reload(&self) -> Result<ReloadReport, DirectoryError> {
		self.ensure_closed()?;

		let records = self.records();
		if let Some(open) = records
			.iter()
			.find(|record| record.registry.is_reloadable() && !record.registry.is_frozen())
		{
			return Err(RegistryError::ReloadWhileUnfrozen(open.key().clone()).into());
		}

		self.reloading.store(true, Ordering::Release);
		let permit = ReloadPermit::new();
		let mut report = ReloadReport::default();
		for record in records {
			if !record.registry.is_reloadable() {
				tracing::warn!(registry = %record.key(), "registry.reload.skip");
				report.skipped.push(record.key().clone());
				continue;
			}
			record.registry.reload(&permit)?;
			report.reloaded.push(record.key().clone());
		}
		Ok(report)
	}
}

impl std::fmt::Debug for RegistryDirectory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryDirectory")
			.field("key", self.key())
			.field("closed", &self.is_closed())
			.field("records", &self.records())
			.finish()
	}
}

#[cfg(test)]
mod tests;
