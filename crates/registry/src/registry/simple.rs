use std::sync::{Arc, Weak};

use cairn_primitives::ResourceId;

use super::{Registry, RegistryCore, RegistryLifecycle, RegistryValue};
use crate::error::RegistryError;
use crate::holder::RegistryHolder;

/// Registry frozen once and read-only for the rest of the process.
pub struct SimpleRegistry<T: ?Sized + RegistryValue> {
	core: RegistryCore<T>,
	this: Weak<dyn Registry<T>>,
}

impl<T: ?Sized + RegistryValue> SimpleRegistry<T> {
	pub fn new(key: ResourceId) -> Arc<Self> {
		Arc::new_cyclic(|this: &Weak<Self>| {
			let this: Weak<dyn Registry<T>> = this.clone();
			Self {
				core: RegistryCore::new(key),
				this,
			}
		})
	}
}

impl<T: ?Sized + RegistryValue> std::fmt::Debug for SimpleRegistry<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SimpleRegistry")
			.field("key", self.core.key())
			.field("len", &self.core.len())
			.field("frozen", &self.core.is_frozen())
			.finish()
	}
}

impl<T: ?Sized + RegistryValue> RegistryLifecycle for SimpleRegistry<T> {
	fn registry_key(&self) -> &ResourceId {
		self.core.key()
	}

	fn is_frozen(&self) -> bool {
		self.core.is_frozen()
	}

	fn freeze(&self) -> Result<(), RegistryError> {
		self.core.freeze()?;
		tracing::debug!(registry = %self.core.key(), entries = self.core.len(), "registry.freeze");
		Ok(())
	}

	fn len(&self) -> usize {
		self.core.len()
	}
}

impl<T: ?Sized + RegistryValue> Registry<T> for SimpleRegistry<T> {
	fn register(&self, id: ResourceId, value: Arc<T>) -> Result<(), RegistryError> {
		self.core.register(id, value)
	}

	fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<T>> {
		self.core.retrieve_value(id)
	}

	fn retrieve_key(&self, value: &Arc<T>) -> Option<ResourceId> {
		self.core.retrieve_key(value)
	}

	fn contains_key(&self, id: &ResourceId) -> bool {
		self.core.contains_key(id)
	}

	fn contains_value(&self, value: &Arc<T>) -> bool {
		self.core.contains_value(value)
	}

	fn retrieve_holder(&self, id: ResourceId) -> RegistryHolder<T> {
		RegistryHolder::bound(id, self.this.clone())
	}

	fn keys(&self) -> Vec<ResourceId> {
		self.core.keys()
	}

	fn values(&self) -> Vec<Arc<T>> {
		self.core.values()
	}

	fn entries(&self) -> Vec<(ResourceId, Arc<T>)> {
		self.core.entries()
	}
}
