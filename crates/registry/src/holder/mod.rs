//! Deferred references to registry entries.
//!
//! A [`RegistryHolder`] names an entry that may not exist yet. It never caches the
//! resolved value: every access re-reads the bound registry, so a reload is invisible to
//! whoever holds the reference. Clones share the same binding.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use cairn_primitives::ResourceId;

use crate::error::RegistryError;
use crate::registry::{Registry, RegistryLifecycle, RegistryValue};

type Fallback<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

/// Capability required for [`RegistryHolder::resolve_with_fallback`].
///
/// Intended for tooling that runs without live registries (content generators,
/// offline validators). Normal runtime code has no reason to build one.
#[derive(Debug)]
pub struct FallbackAccess(());

impl FallbackAccess {
	pub fn for_tooling() -> Self {
		Self(())
	}
}

pub struct RegistryHolder<T: ?Sized + RegistryValue> {
	id: ResourceId,
	binding: Arc<OnceLock<Weak<dyn Registry<T>>>>,
	fallback: Option<Fallback<T>>,
}

impl<T: ?Sized + RegistryValue> RegistryHolder<T> {
	/// A holder with no registry yet. Bound later by a [`crate::Register`].
	pub fn unbound(id: ResourceId) -> Self {
		Self {
			id,
			binding: Arc::new(OnceLock::new()),
			fallback: None,
		}
	}

	/// An unbound holder that can construct a stand-in value through the
	/// privileged fallback path.
	pub fn with_fallback(id: ResourceId, fallback: impl Fn() -> Arc<T> + Send + Sync + 'static) -> Self {
		Self {
			id,
			binding: Arc::new(OnceLock::new()),
			fallback: Some(Arc::new(fallback)),
		}
	}

	/// A holder already bound to `registry`. Registry implementations use this for
	/// [`Registry::retrieve_holder`].
	pub fn bound(id: ResourceId, registry: Weak<dyn Registry<T>>) -> Self {
		Self {
			id,
			binding: Arc::new(OnceLock::from(registry)),
			fallback: None,
		}
	}

	pub fn id(&self) -> &ResourceId {
		&self.id
	}

	pub fn is_bound(&self) -> bool {
		self.binding.get().is_some()
	}

	/// Key of the bound registry, if the holder is bound and the registry is alive.
	pub fn registry_key(&self) -> Option<ResourceId> {
		self.registry().map(|registry| registry.registry_key().clone())
	}

	fn registry(&self) -> Option<Arc<dyn Registry<T>>> {
		self.binding.get().and_then(Weak::upgrade)
	}

	/// Binds the holder to `registry`. A holder can be bound once.
	pub(crate) fn bind(&self, registry: &Arc<dyn Registry<T>>) -> Result<(), RegistryError> {
		self.binding
			.set(Arc::downgrade(registry))
			.map_err(|_| RegistryError::HolderAlreadyBound(self.id.clone()))
	}

	/// Whether the bound registry currently holds an entry for this id.
	pub fn reference_present(&self) -> bool {
		self.registry()
			.is_some_and(|registry| registry.contains_key(&self.id))
	}

	/// Reads the entry.
	///
	/// Fails with [`RegistryError::Unbound`] when no live registry is bound, and with
	/// [`RegistryError::Absent`] when the registry has no such entry.
	pub fn get(&self) -> Result<Arc<T>, RegistryError> {
		let registry = self
			.registry()
			.ok_or_else(|| RegistryError::Unbound(self.id.clone()))?;
		registry
			.retrieve_value(&self.id)
			.ok_or_else(|| RegistryError::Absent {
				registry: registry.registry_key().clone(),
				id: self.id.clone(),
			})
	}

	pub fn as_optional(&self) -> Option<Arc<T>> {
		self.registry()?.retrieve_value(&self.id)
	}

	/// Returns the registered value, or a freshly constructed one from the fallback
	/// factory when the entry is not reachable.
	pub fn resolve_with_fallback(&self, _access: &FallbackAccess) -> Option<Arc<T>> {
		if let Some(value) = self.as_optional() {
			return Some(value);
		}
		let fallback = self.fallback.as_ref()?;
		tracing::debug!(id = %self.id, "registry.holder.fallback");
		Some(fallback())
	}
}

impl<T: ?Sized + RegistryValue> Clone for RegistryHolder<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id.clone(),
			binding: Arc::clone(&self.binding),
			fallback: self.fallback.clone(),
		}
	}
}

impl<T: ?Sized + RegistryValue> fmt::Debug for RegistryHolder<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryHolder")
			.field("id", &self.id)
			.field("registry", &self.registry_key())
			.finish()
	}
}

#[cfg(test)]
mod tests;
