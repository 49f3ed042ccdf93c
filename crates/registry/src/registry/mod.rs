//! Registry traits and the shared entry store.
//!
//! # Invariants
//!
//! - Identifiers and values are both unique within one registry. Values are compared by
//!   identity (`Arc` address), so distinct but equal values may coexist.
//! - `frozen` only moves false → true, except through [`ReloadableRegistry::reload`].
//! - A failed `register` leaves the registry untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cairn_primitives::ResourceId;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::RegistryError;
use crate::holder::RegistryHolder;

mod reloadable;
mod simple;

pub use reloadable::ReloadableRegistry;
pub use simple::SimpleRegistry;

/// Marker trait for types that can be stored in a registry.
pub trait RegistryValue: Send + Sync + 'static {}
impl<T: ?Sized + Send + Sync + 'static> RegistryValue for T {}

/// Proof that the caller is the lifecycle orchestrator.
///
/// Only this crate can mint one, which keeps [`RegistryLifecycle::reload`] out of
/// reach of extension code.
#[derive(Debug)]
pub struct ReloadPermit(());

impl ReloadPermit {
	pub(crate) fn new() -> Self {
		Self(())
	}
}

/// Type-erased lifecycle surface shared by every registry.
pub trait RegistryLifecycle: Send + Sync + 'static {
	/// Unique key of this registry.
	fn registry_key(&self) -> &ResourceId;

	fn is_frozen(&self) -> bool;

	/// One-way transition to read-only. Fails if already frozen.
	fn freeze(&self) -> Result<(), RegistryError>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn is_reloadable(&self) -> bool {
		false
	}

	/// Clears every entry and reopens the registration window.
	///
	/// Must be followed by [`RegistryLifecycle::freeze`] on the same thread.
	fn reload(&self, _permit: &ReloadPermit) -> Result<(), RegistryError> {
		Err(RegistryError::NotReloadable(self.registry_key().clone()))
	}
}

/// Bidirectional identifier ↔ value store.
pub trait Registry<T: ?Sized + RegistryValue>: RegistryLifecycle {
	/// Registers `value` under `id`.
	///
	/// Fails if the registry is frozen, `id` is taken, or this exact value
	/// instance is already registered.
	fn register(&self, id: ResourceId, value: Arc<T>) -> Result<(), RegistryError>;

	fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<T>>;

	fn retrieve_key(&self, value: &Arc<T>) -> Option<ResourceId>;

	fn contains_key(&self, id: &ResourceId) -> bool;

	fn contains_value(&self, value: &Arc<T>) -> bool;

	/// Returns a holder for `id`, whether or not the entry exists yet.
	fn retrieve_holder(&self, id: ResourceId) -> RegistryHolder<T>;

	/// Identifiers in registration order.
	fn keys(&self) -> Vec<ResourceId>;

	/// Values in registration order.
	fn values(&self) -> Vec<Arc<T>>;

	/// Entries in registration order.
	fn entries(&self) -> Vec<(ResourceId, Arc<T>)>;
}

fn value_addr<T: ?Sized>(value: &Arc<T>) -> usize {
	Arc::as_ptr(value).cast::<()>() as usize
}

struct Entries<T: ?Sized> {
	by_id: IndexMap<ResourceId, Arc<T>>,
	by_value: FxHashMap<usize, ResourceId>,
}

impl<T: ?Sized> Default for Entries<T> {
	fn default() -> Self {
		Self {
			by_id: IndexMap::new(),
			by_value: FxHashMap::default(),
		}
	}
}

/// Entry store and frozen flag shared by both registry flavours.
pub(crate) struct RegistryCore<T: ?Sized> {
	key: ResourceId,
	entries: RwLock<Entries<T>>,
	frozen: AtomicBool,
}

impl<T: ?Sized + RegistryValue> RegistryCore<T> {
	pub(crate) fn new(key: ResourceId) -> Self {
		Self {
			key,
			entries: RwLock::new(Entries::default()),
			frozen: AtomicBool::new(false),
		}
	}

	pub(crate) fn key(&self) -> &ResourceId {
		&self.key
	}

	pub(crate) fn is_frozen(&self) -> bool {
		self.frozen.load(Ordering::Acquire)
	}

	pub(crate) fn register(&self, id: ResourceId, value: Arc<T>) -> Result<(), RegistryError> {
		if self.is_frozen() {
			return Err(self.frozen_error(id));
		}

		let mut entries = self.entries.write();
		// freeze() takes the write lock, so this check is authoritative.
		if self.is_frozen() {
			return Err(self.frozen_error(id));
		}
		if entries.by_id.contains_key(&id) {
			return Err(RegistryError::DuplicateKey {
				registry: self.key.clone(),
				id,
			});
		}
		let addr = value_addr(&value);
		if let Some(existing) = entries.by_value.get(&addr) {
			return Err(RegistryError::DuplicateValue {
				registry: self.key.clone(),
				id,
				existing: existing.clone(),
			});
		}

		entries.by_value.insert(addr, id.clone());
		entries.by_id.insert(id, value);
		Ok(())
	}

	fn frozen_error(&self, id: ResourceId) -> RegistryError {
		RegistryError::Frozen {
			registry: self.key.clone(),
			id,
		}
	}

	pub(crate) fn freeze(&self) -> Result<(), RegistryError> {
		let _entries = self.entries.write();
		self.frozen
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.map(|_| ())
			.map_err(|_| RegistryError::AlreadyFrozen(self.key.clone()))
	}

	/// Drops every entry and reopens the registration window.
	pub(crate) fn clear_and_unfreeze(&self) {
		let mut entries = self.entries.write();
		entries.by_id.clear();
		entries.by_value.clear();
		self.frozen.store(false, Ordering::Release);
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.read().by_id.len()
	}

	pub(crate) fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<T>> {
		self.entries.read().by_id.get(id).cloned()
	}

	pub(crate) fn retrieve_key(&self, value: &Arc<T>) -> Option<ResourceId> {
		self.entries.read().by_value.get(&value_addr(value)).cloned()
	}

	pub(crate) fn contains_key(&self, id: &ResourceId) -> bool {
		self.entries.read().by_id.contains_key(id)
	}

	pub(crate) fn contains_value(&self, value: &Arc<T>) -> bool {
		self.entries.read().by_value.contains_key(&value_addr(value))
	}

	pub(crate) fn keys(&self) -> Vec<ResourceId> {
		self.entries.read().by_id.keys().cloned().collect()
	}

	pub(crate) fn values(&self) -> Vec<Arc<T>> {
		self.entries.read().by_id.values().cloned().collect()
	}

	pub(crate) fn entries(&self) -> Vec<(ResourceId, Arc<T>)> {
		self.entries
			.read()
			.by_id
			.iter()
			.map(|(id, value)| (id.clone(), value.clone()))
			.collect()
	}
}
