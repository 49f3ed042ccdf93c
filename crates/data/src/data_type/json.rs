use std::sync::Arc;

use cairn_primitives::ResourceId;
use cairn_registry::{Registry, RegistryLifecycle, RegistryValue};
use serde::de::DeserializeOwned;

use super::{DataType, LoadContext, Loaded};
use crate::entry::SourcedEntry;
use crate::error::DataError;

type Mapper<P, T> = Box<dyn Fn(&ResourceId, P) -> Result<Arc<T>, DataError> + Send + Sync>;

/// Direct data type: one JSON file per entry, decoded into `P` and mapped to `T`.
pub struct JsonDataType<P, T: ?Sized + RegistryValue> {
	type_name: String,
	priority: i32,
	registry: Arc<dyn Registry<T>>,
	map: Mapper<P, T>,
}

impl<P, T> JsonDataType<P, T>
where
	P: DeserializeOwned + 'static,
	T: ?Sized + RegistryValue,
{
	/// The type name defaults to the registry key's name.
	pub fn new(
		registry: Arc<dyn Registry<T>>,
		map: impl Fn(&ResourceId, P) -> Result<Arc<T>, DataError> + Send + Sync + 'static,
	) -> Self {
		Self {
			type_name: registry.registry_key().name().to_owned(),
			priority: cairn_primitives::Priority::Normal.value(),
			registry,
			map: Box::new(map),
		}
	}

	pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
		self.type_name = type_name.into();
		self
	}

	pub fn with_priority(mut self, priority: impl Into<i32>) -> Self {
		self.priority = priority.into();
		self
	}
}

impl<T> JsonDataType<T, T>
where
	T: DeserializeOwned + RegistryValue,
{
	/// Payload and value are the same type.
	pub fn direct(registry: Arc<dyn Registry<T>>) -> Self {
		Self::new(registry, |_, value| Ok(Arc::new(value)))
	}
}

impl<P, T> DataType for JsonDataType<P, T>
where
	P: DeserializeOwned + 'static,
	T: ?Sized + RegistryValue,
{
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn priority(&self) -> i32 {
		self.priority
	}

	fn target(&self) -> &dyn RegistryLifecycle {
		&*self.registry
	}

	fn load(&self, entry: &SourcedEntry, _ctx: &LoadContext<'_>) -> Result<Loaded, DataError> {
		let id = entry.entry().id()?;
		let payload: P = entry.read_json()?;
		let value = (self.map)(&id, payload)?;
		self.registry.register(id.clone(), value)?;
		Ok(Loaded::Entry(id))
	}
}
