use cairn_primitives::ResourceId;

/// A registration listener that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
	pub registry: ResourceId,
	pub listener: String,
	pub message: String,
}

impl std::fmt::Display for ListenerFailure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "listener {:?} on {}: {}", self.listener, self.registry, self.message)
	}
}

/// Outcome of one [`super::RegistryDirectory::populate`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationReport {
	/// Registries whose registration event was fired, in creation order.
	pub populated: Vec<ResourceId>,
	/// Registries skipped because they were already frozen.
	pub skipped_frozen: Vec<ResourceId>,
	/// Non-reloadable registries left as they are during a reload pass.
	pub kept_static: Vec<ResourceId>,
	pub failures: Vec<ListenerFailure>,
}

impl PopulationReport {
	pub fn is_clean(&self) -> bool {
		self.skipped_frozen.is_empty() && self.failures.is_empty()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeReport {
	pub frozen: Vec<ResourceId>,
	pub already_frozen: Vec<ResourceId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
	pub reloaded: Vec<ResourceId>,
	/// Registries left untouched because they are not reloadable.
	pub skipped: Vec<ResourceId>,
}
