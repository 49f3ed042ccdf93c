//! Registry of data types with lookups by type name and by index file.

use std::sync::{Arc, Weak};

use cairn_primitives::ResourceId;
use cairn_registry::{Registry, RegistryError, RegistryHolder, RegistryLifecycle, SimpleRegistry};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::data_type::DataType;
use crate::error::TypeRegistryError;

#[derive(Default)]
struct Lookups {
	by_type: FxHashMap<String, (ResourceId, Arc<dyn DataType>)>,
	by_index_file: FxHashMap<String, (ResourceId, Arc<dyn DataType>)>,
}

/// `Registry<dyn DataType>` that also enforces unique type names and index files.
///
/// Registering through the plain [`Registry::register`] surface reports a conflicting
/// declaration as [`RegistryError::Conflict`]; [`DataTypeRegistry::insert`] returns the
/// typed [`TypeRegistryError`].
pub struct DataTypeRegistry {
	inner: Arc<SimpleRegistry<dyn DataType>>,
	lookups: Mutex<Lookups>,
	this: Weak<dyn Registry<dyn DataType>>,
}

impl DataTypeRegistry {
	pub fn new(key: ResourceId) -> Arc<Self> {
		Arc::new_cyclic(|this: &Weak<Self>| {
			let this: Weak<dyn Registry<dyn DataType>> = this.clone();
			Self {
				inner: SimpleRegistry::new(key),
				lookups: Mutex::new(Lookups::default()),
				this,
			}
		})
	}

	/// Registers `data_type` under `id`. A conflicting type name or index file leaves
	/// the registry unchanged.
	pub fn insert(&self, id: ResourceId, data_type: Arc<dyn DataType>) -> Result<(), TypeRegistryError> {
		let mut lookups = self.lookups.lock();

		let type_name = data_type.type_name().to_owned();
		if let Some((existing, _)) = lookups.by_type.get(&type_name) {
			return Err(TypeRegistryError::DuplicateType {
				type_name,
				existing: existing.clone(),
			});
		}
		let index_file = data_type.index_file().map(str::to_owned);
		if let Some(file) = &index_file
			&& let Some((existing, _)) = lookups.by_index_file.get(file)
		{
			return Err(TypeRegistryError::DuplicateIndexFile {
				file: file.clone(),
				existing: existing.clone(),
			});
		}

		self.inner.register(id.clone(), Arc::clone(&data_type))?;
		tracing::debug!(%id, type_name = %type_name, index_file = ?index_file, "data.type.register");
		if let Some(file) = index_file {
			lookups.by_index_file.insert(file, (id.clone(), Arc::clone(&data_type)));
		}
		lookups.by_type.insert(type_name, (id, data_type));
		Ok(())
	}

	/// Data type claiming the `<type>` path segment.
	pub fn by_type(&self, type_name: &str) -> Option<Arc<dyn DataType>> {
		self.lookups
			.lock()
			.by_type
			.get(type_name)
			.map(|(_, data_type)| Arc::clone(data_type))
	}

	/// Indexed data type claiming a namespace-level file name.
	pub fn by_index_file(&self, file: &str) -> Option<Arc<dyn DataType>> {
		self.lookups
			.lock()
			.by_index_file
			.get(file)
			.map(|(_, data_type)| Arc::clone(data_type))
	}

	/// Every data type, highest priority first. Ties keep registration order.
	pub fn by_priority(&self) -> Vec<Arc<dyn DataType>> {
		let mut types = self.inner.values();
		types.sort_by_key(|data_type| std::cmp::Reverse(data_type.priority()));
		types
	}
}

impl RegistryLifecycle for DataTypeRegistry {
	fn registry_key(&self) -> &ResourceId {
		self.inner.registry_key()
	}

	fn is_frozen(&self) -> bool {
		self.inner.is_frozen()
	}

	fn freeze(&self) -> Result<(), RegistryError> {
		self.inner.freeze()
	}

	fn len(&self) -> usize {
		self.inner.len()
	}
}

impl Registry<dyn DataType> for DataTypeRegistry {
	fn register(&self, id: ResourceId, value: Arc<dyn DataType>) -> Result<(), RegistryError> {
		self.insert(id.clone(), value).map_err(|error| match error {
			TypeRegistryError::Registry(error) => error,
			other => RegistryError::Conflict {
				registry: self.registry_key().clone(),
				id,
				reason: other.to_string(),
			},
		})
	}

	fn retrieve_value(&self, id: &ResourceId) -> Option<Arc<dyn DataType>> {
		self.inner.retrieve_value(id)
	}

	fn retrieve_key(&self, value: &Arc<dyn DataType>) -> Option<ResourceId> {
		self.inner.retrieve_key(value)
	}

	fn contains_key(&self, id: &ResourceId) -> bool {
		self.inner.contains_key(id)
	}

	fn contains_value(&self, value: &Arc<dyn DataType>) -> bool {
		self.inner.contains_value(value)
	}

	fn retrieve_holder(&self, id: ResourceId) -> RegistryHolder<dyn DataType> {
		RegistryHolder::bound(id, self.this.clone())
	}

	fn keys(&self) -> Vec<ResourceId> {
		self.inner.keys()
	}

	fn values(&self) -> Vec<Arc<dyn DataType>> {
		self.inner.values()
	}

	fn entries(&self) -> Vec<(ResourceId, Arc<dyn DataType>)> {
		self.inner.entries()
	}
}
