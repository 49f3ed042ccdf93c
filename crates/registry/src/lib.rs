//! Content registries with a freeze lifecycle.
//!
//! # Mental Model
//!
//! 1. **Construction:** subsystems create registries through a [`RegistryDirectory`]. Each one
//!    is recorded with a creation index and whether it is populated by a registration event.
//! 2. **Collection close:** [`RegistryDirectory::close_collection`] freezes the directory
//!    itself; no registry can be introduced afterwards.
//! 3. **Population:** [`RegistryDirectory::populate`] visits registries in creation order and
//!    fires one [`RegistrationEvent`] per event-driven registry.
//! 4. **Freezing:** [`RegistryDirectory::freeze_all`] makes every registry read-only.
//! 5. **Reload:** [`RegistryDirectory::reload`] clears only [`ReloadableRegistry`] instances;
//!    population and freezing then run again.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | Typed identifier ↔ value store. |
//! | [`SimpleRegistry`] | Registry frozen once for the whole process lifetime. |
//! | [`ReloadableRegistry`] | Registry that can be cleared and repopulated; readers wait out the reload window. |
//! | [`RegistryHolder`] | Deferred reference to an entry, re-read on every access. |
//! | [`Register`] | Namespace-scoped bulk registration handing out holders up front. |
//! | [`RegistryDirectory`] | Registry of registries; drives the lifecycle. |
//!
//! # Concurrency
//!
//! - **Reads:** shared lock; frozen registries never see writers.
//! - **Writes:** exclusive lock, only on the single loading thread before freeze.
//! - **Reload:** a reloadable registry holds its reload gate exclusively from `reload()` until
//!   the matching `freeze()`. Other threads block on reads for that window; the reloading
//!   thread keeps reading and writing.

mod directory;
mod error;
mod holder;
mod register;
mod registry;

pub use cairn_primitives::{Priority, ResourceId};
pub use directory::{
	FreezeReport, Listener, ListenerFailure, Population, PopulationReport, RegistrationEvent,
	RegistryDirectory, RegistryRecord, ReloadReport,
};
pub use error::{DirectoryError, RegistryError};
pub use holder::{FallbackAccess, RegistryHolder};
pub use register::Register;
pub use registry::{
	Registry, RegistryLifecycle, RegistryValue, ReloadPermit, ReloadableRegistry, SimpleRegistry,
};
