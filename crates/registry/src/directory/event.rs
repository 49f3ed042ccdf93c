use std::sync::Arc;

use cairn_primitives::ResourceId;

use super::RegistryDirectory;
use crate::error::RegistryError;
use crate::holder::RegistryHolder;
use crate::register::Register;
use crate::registry::{Registry, RegistryLifecycle, RegistryValue};

/// Handed to listeners while one registry is being populated.
///
/// Grants registration and read access to the target registry and read access to
/// the directory. Freezing stays with the directory.
pub struct RegistrationEvent<'a, T: ?Sized + RegistryValue> {
	registry: &'a Arc<dyn Registry<T>>,
	directory: &'a RegistryDirectory,
}

impl<'a, T: ?Sized + RegistryValue> RegistrationEvent<'a, T> {
	pub(crate) fn new(registry: &'a Arc<dyn Registry<T>>, directory: &'a RegistryDirectory) -> Self {
		Self { registry, directory }
	}

	pub fn registry_key(&self) -> &ResourceId {
		self.registry.registry_key()
	}

	pub fn register(&self, id: ResourceId, value: Arc<T>) -> Result<(), RegistryError> {
		self.registry.register(id, value)
	}

	/// Flushes a [`Register`] into the target registry.
	pub fn register_all(&self, register: &Register<T>) -> Result<(), RegistryError> {
		register.register_into(self.registry)
	}

	pub fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<T>> {
		self.registry.retrieve_value(id)
	}

	pub fn contains_key(&self, id: &ResourceId) -> bool {
		self.registry.contains_key(id)
	}

	pub fn holder(&self, id: ResourceId) -> RegistryHolder<T> {
		self.registry.retrieve_holder(id)
	}

	/// Other registries, for listeners that resolve cross-references.
	pub fn directory(&self) -> &RegistryDirectory {
		self.directory
	}
}
