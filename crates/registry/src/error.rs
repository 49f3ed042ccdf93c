use cairn_primitives::{IdError, ResourceId};

/// State-misuse and per-registration failures.
///
/// Every variant is surfaced to the caller; the registry is left exactly as it
/// was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("registry {registry} is frozen, cannot register {id}")]
	Frozen { registry: ResourceId, id: ResourceId },

	#[error("registry {registry} already holds an entry for {id}")]
	DuplicateKey { registry: ResourceId, id: ResourceId },

	#[error("registry {registry}: value offered for {id} is already registered as {existing}")]
	DuplicateValue {
		registry: ResourceId,
		id: ResourceId,
		existing: ResourceId,
	},

	/// Two extensions claim the same slot of a typed registry. Startup-fatal.
	#[error("registry {registry}: {id} conflicts with an existing declaration: {reason}")]
	Conflict {
		registry: ResourceId,
		id: ResourceId,
		reason: String,
	},

	#[error("registry {0} is already frozen")]
	AlreadyFrozen(ResourceId),

	#[error("registry {0} cannot be reloaded")]
	NotReloadable(ResourceId),

	#[error("registry {0} is mid-load; only a frozen registry can be reloaded")]
	ReloadWhileUnfrozen(ResourceId),

	#[error("holder for {0} is not bound to a registry")]
	Unbound(ResourceId),

	#[error("registry {registry} has no entry for {id}")]
	Absent { registry: ResourceId, id: ResourceId },

	#[error("holder for {0} is already bound")]
	HolderAlreadyBound(ResourceId),

	#[error("register already queues an entry named {0}")]
	DuplicateName(ResourceId),

	#[error("register for namespace {0:?} is already bound, no more entries can be added")]
	RegisterConsumed(String),

	#[error(transparent)]
	Id(#[from] IdError),
}

impl RegistryError {
	/// Whether this describes conflicting declarations rather than one bad entry.
	pub fn is_conflict(&self) -> bool {
		matches!(self, Self::Conflict { .. })
	}
}

/// Configuration errors raised while collecting or driving registries.
///
/// These are startup-fatal: they describe conflicting extensions, not bad content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
	#[error("a registry named {0} already exists")]
	DuplicateRegistry(ResourceId),

	#[error("registry collection is closed, cannot add {0}")]
	Closed(ResourceId),

	#[error("registry collection must be closed before registries are populated, frozen or reloaded")]
	NotClosed,

	#[error("registry {0} is already frozen and cannot be collected")]
	FrozenRegistry(ResourceId),

	#[error("no registry named {0}")]
	UnknownRegistry(ResourceId),

	#[error("registry {0} holds a different value type")]
	TypeMismatch(ResourceId),

	#[error("registry {0} does not fire registration events")]
	NoEvents(ResourceId),

	#[error("listener {listener} on {registry} declared a conflict: {source}")]
	ListenerConflict {
		registry: ResourceId,
		listener: String,
		#[source]
		source: RegistryError,
	},

	#[error(transparent)]
	Registry(#[from] RegistryError),
}
