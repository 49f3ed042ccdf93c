use std::sync::Arc;

use cairn_primitives::{IdError, ResourceId, is_valid_namespace};
use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::Mutex;

use crate::error::RegistryError;
use crate::holder::RegistryHolder;
use crate::registry::{Registry, RegistryLifecycle, RegistryValue};

type Factory<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

struct Pending<T: ?Sized + RegistryValue> {
	factory: Factory<T>,
	holder: RegistryHolder<T>,
}

struct RegisterState<T: ?Sized + RegistryValue> {
	pending: IndexMap<ResourceId, Pending<T>>,
	bound: bool,
}

/// Namespace-scoped batch of entries that hands out holders before the target
/// registry is populated.
///
/// ```ignore
/// let blocks = Register::<Block>::new("cairn")?;
/// let stone = blocks.add("stone", || Arc::new(Block::solid()))?;
/// // later, from a registration event:
/// event.register_all(&blocks)?;
/// assert!(stone.reference_present());
/// ```
pub struct Register<T: ?Sized + RegistryValue> {
	namespace: String,
	state: Mutex<RegisterState<T>>,
}

impl<T: ?Sized + RegistryValue> Register<T> {
	pub fn new(namespace: &str) -> Result<Self, RegistryError> {
		if !is_valid_namespace(namespace) {
			return Err(IdError::InvalidNamespace(namespace.to_owned()).into());
		}
		Ok(Self {
			namespace: namespace.to_owned(),
			state: Mutex::new(RegisterState {
				pending: IndexMap::new(),
				bound: false,
			}),
		})
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn len(&self) -> usize {
		self.state.lock().pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Queues `namespace:name` and returns its holder.
	///
	/// The factory runs on every [`Register::register_into`] call, so each population
	/// pass receives a fresh value.
	pub fn add(
		&self,
		name: &str,
		factory: impl Fn() -> Arc<T> + Send + Sync + 'static,
	) -> Result<RegistryHolder<T>, RegistryError> {
		let id = ResourceId::new(&self.namespace, name)?;
		let mut state = self.state.lock();
		if state.bound {
			return Err(RegistryError::RegisterConsumed(self.namespace.clone()));
		}

		let factory: Factory<T> = Arc::new(factory);
		match state.pending.entry(id) {
			Entry::Occupied(slot) => Err(RegistryError::DuplicateName(slot.key().clone())),
			Entry::Vacant(slot) => {
				let fallback = Arc::clone(&factory);
				let holder = RegistryHolder::with_fallback(slot.key().clone(), move || fallback());
				slot.insert(Pending {
					factory,
					holder: holder.clone(),
				});
				Ok(holder)
			}
		}
	}

	/// Binds every handed-out holder to `registry` (first call only) and registers a
	/// freshly built value for each queued entry.
	///
	/// Stops at the first failing registration.
	pub fn register_into(&self, registry: &Arc<dyn Registry<T>>) -> Result<(), RegistryError> {
		let mut state = self.state.lock();
		if !state.bound {
			state.bound = true;
			for pending in state.pending.values() {
				pending.holder.bind(registry)?;
			}
		}

		for (id, pending) in &state.pending {
			registry.register(id.clone(), (pending.factory)())?;
		}
		tracing::trace!(
			namespace = %self.namespace,
			registry = %registry.registry_key(),
			count = state.pending.len(),
			"registry.register.flush"
		);
		Ok(())
	}
}
