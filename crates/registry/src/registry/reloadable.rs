//! Registry that can be cleared and repopulated at runtime.
//!
//! # Concurrency
//!
//! `reload()` takes the gate exclusively and parks the guard in `window` until the
//! matching `freeze()`. The thread that opened the window is recorded in `owner` and
//! bypasses the gate; every other thread takes a shared gate lock per call and so blocks
//! until the registry is frozen again. Readers never observe a partially reloaded state.

use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use arc_swap::ArcSwapOption;
use cairn_primitives::ResourceId;
use parking_lot::lock_api::ArcRwLockWriteGuard;
use parking_lot::{Mutex, RawRwLock, RwLock};

use super::{Registry, RegistryCore, RegistryLifecycle, RegistryValue, ReloadPermit};
use crate::error::RegistryError;
use crate::holder::RegistryHolder;

pub struct ReloadableRegistry<T: ?Sized + RegistryValue> {
	core: RegistryCore<T>,
	gate: Arc<RwLock<()>>,
	window: Mutex<Option<ArcRwLockWriteGuard<RawRwLock, ()>>>,
	owner: ArcSwapOption<ThreadId>,
	this: Weak<dyn Registry<T>>,
}

impl<T: ?Sized + RegistryValue> ReloadableRegistry<T> {
	pub fn new(key: ResourceId) -> Arc<Self> {
		Arc::new_cyclic(|this: &Weak<Self>| {
			let this: Weak<dyn Registry<T>> = this.clone();
			Self {
				core: RegistryCore::new(key),
				gate: Arc::new(RwLock::new(())),
				window: Mutex::new(None),
				owner: ArcSwapOption::empty(),
				this,
			}
		})
	}

	/// Whether a reload window is currently open.
	pub fn is_reloading(&self) -> bool {
		self.owner.load().is_some()
	}

	fn is_owner(&self) -> bool {
		let current = thread::current().id();
		self.owner.load().as_deref() == Some(&current)
	}

	fn access<R>(&self, f: impl FnOnce(&RegistryCore<T>) -> R) -> R {
		if self.is_owner() {
			return f(&self.core);
		}
		let _gate = self.gate.read();
		f(&self.core)
	}
}

impl<T: ?Sized + RegistryValue> std::fmt::Debug for ReloadableRegistry<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReloadableRegistry")
			.field("key", self.core.key())
			.field("frozen", &self.core.is_frozen())
			.field("reloading", &self.is_reloading())
			.finish_non_exhaustive()
	}
}

impl<T: ?Sized + RegistryValue> RegistryLifecycle for ReloadableRegistry<T> {
	fn registry_key(&self) -> &ResourceId {
		self.core.key()
	}

	fn is_frozen(&self) -> bool {
		self.core.is_frozen()
	}

	fn freeze(&self) -> Result<(), RegistryError> {
		if !self.is_owner() {
			let _gate = self.gate.read();
			self.core.freeze()?;
			tracing::debug!(registry = %self.core.key(), entries = self.core.len(), "registry.freeze");
			return Ok(());
		}

		self.core.freeze()?;
		self.owner.store(None);
		let window = self.window.lock().take();
		drop(window);
		tracing::info!(registry = %self.core.key(), entries = self.core.len(), "registry.reload.done");
		Ok(())
	}

	fn len(&self) -> usize {
		self.access(RegistryCore::len)
	}

	fn is_reloadable(&self) -> bool {
		true
	}

	fn reload(&self, _permit: &ReloadPermit) -> Result<(), RegistryError> {
		if self.is_owner() {
			return Err(RegistryError::ReloadWhileUnfrozen(self.core.key().clone()));
		}

		let guard = self.gate.write_arc();
		if !self.core.is_frozen() {
			return Err(RegistryError::ReloadWhileUnfrozen(self.core.key().clone()));
		}

		let dropped = self.core.len();
		self.core.clear_and_unfreeze();
		self.owner.store(Some(Arc::new(thread::current().id())));
		*self.window.lock() = Some(guard);
		tracing::info!(registry = %self.core.key(), dropped, "registry.reload.start");
		Ok(())
	}
}

impl<T: ?Sized + RegistryValue> Registry<T> for ReloadableRegistry<T> {
	fn register(&self, id: ResourceId, value: Arc<T>) -> Result<(), RegistryError> {
		self.access(|core| core.register(id, value))
	}

	fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<T>> {
		self.access(|core| core.retrieve_value(id))
	}

	fn retrieve_key(&self, value: &Arc<T>) -> Option<ResourceId> {
		self.access(|core| core.retrieve_key(value))
	}

	fn contains_key(&self, id: &ResourceId) -> bool {
		self.access(|core| core.contains_key(id))
	}

	fn contains_value(&self, value: &Arc<T>) -> bool {
		self.access(|core| core.contains_value(value))
	}

	fn retrieve_holder(&self, id: ResourceId) -> RegistryHolder<T> {
		RegistryHolder::bound(id, self.this.clone())
	}

	fn keys(&self) -> Vec<ResourceId> {
		self.access(RegistryCore::keys)
	}

	fn values(&self) -> Vec<Arc<T>> {
		self.access(RegistryCore::values)
	}

	fn entries(&self) -> Vec<(ResourceId, Arc<T>)> {
		self.access(RegistryCore::entries)
	}
}
