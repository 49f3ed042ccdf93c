//! Startup and reload of all content.
//!
//! # Mental Model
//!
//! 1. [`Lifecycle::bootstrap`] creates the core registries, lets every [`Extension`] add
//!    its own, closes the collection, then subscribes the builtin, data type and extension
//!    listeners.
//! 2. [`Lifecycle::load`] fires registration events, resolves every data source, and
//!    freezes everything.
//! 3. [`Lifecycle::reload`] clears the reloadable registries, fires their events again,
//!    re-runs only the data types that target them, and freezes again.
//!
//! # Concurrency
//!
//! `load` and `reload` are serialized and run on the calling thread. During a reload,
//! readers of a reloadable registry on other threads wait until it is frozen again.

use std::fmt;
use std::sync::Arc;

use cairn_data::{DataManager, DataType, LoadMode, LoadReport};
use cairn_primitives::ResourceId;
use cairn_registry::{
	DirectoryError, FreezeReport, Population, PopulationReport, RegistryDirectory, RegistryLifecycle, ReloadReport,
};
use parking_lot::Mutex;

use crate::builtin::Builtins;
use crate::error::ContentError;
use crate::registries::ContentRegistries;
use crate::{data_types, keys};

/// Hooks for code that contributes registries or content from outside the core.
pub trait Extension: Send + Sync {
	fn name(&self) -> &str;

	/// Runs while the registry collection is still open.
	fn create_registries(&self, _directory: &RegistryDirectory) -> Result<(), DirectoryError> {
		Ok(())
	}

	/// Runs after the collection is closed. Subscribe registration listeners here.
	fn subscribe(&self, _directory: &RegistryDirectory, _content: &ContentRegistries) -> Result<(), DirectoryError> {
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	Collected,
	Loaded,
}

/// Result of one load or reload pass.
#[derive(Debug)]
pub struct LifecycleReport {
	/// Present for reload passes.
	pub reload: Option<ReloadReport>,
	pub population: PopulationReport,
	pub data: LoadReport,
	pub freeze: FreezeReport,
}

impl LifecycleReport {
	/// No listener failed, no registry was unexpectedly frozen, no entry failed, no indexed
	/// file went missing.
	pub fn is_clean(&self) -> bool {
		self.population.is_clean() && self.data.is_clean()
	}
}

impl fmt::Display for LifecycleReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}; {} registries populated, {} listener failures, {} frozen",
			self.data,
			self.population.populated.len(),
			self.population.failures.len(),
			self.freeze.frozen.len()
		)?;
		if let Some(reload) = &self.reload {
			write!(f, ", {} reloaded", reload.reloaded.len())?;
		}
		Ok(())
	}
}

/// State of one collected registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySummary {
	pub index: u32,
	pub key: ResourceId,
	pub len: usize,
	pub frozen: bool,
	pub reloadable: bool,
	pub population: Population,
}

/// Owns the registry directory and drives content through its lifecycle.
pub struct Lifecycle {
	directory: RegistryDirectory,
	content: ContentRegistries,
	builtins: Builtins,
	stage: Mutex<Stage>,
}

impl Lifecycle {
	pub fn bootstrap(extensions: &[Arc<dyn Extension>]) -> Result<Self, ContentError> {
		let directory = RegistryDirectory::new(keys::core(keys::ROOT)?);
		let content = ContentRegistries::create(&directory)?;
		for extension in extensions {
			extension
				.create_registries(&directory)
				.map_err(|source| extension_error(extension.as_ref(), source))?;
		}
		directory.close_collection()?;

		let builtins = Builtins::new()?;
		builtins.subscribe(&directory, &content)?;
		let targets = content.clone();
		directory.subscribe::<dyn DataType, _>(
			content.data_types.registry_key(),
			data_types::LISTENER,
			move |event| data_types::register(event, &targets),
		)?;
		for extension in extensions {
			extension
				.subscribe(&directory, &content)
				.map_err(|source| extension_error(extension.as_ref(), source))?;
		}

		tracing::info!(registries = directory.len(), extensions = extensions.len(), "content.bootstrap.done");
		Ok(Self {
			directory,
			content,
			builtins,
			stage: Mutex::new(Stage::Collected),
		})
	}

	/// Populates, resolves every source of `manager`, and freezes. Runs once.
	pub fn load(&self, manager: &DataManager) -> Result<LifecycleReport, ContentError> {
		let mut stage = self.stage.lock();
		if *stage == Stage::Loaded {
			return Err(ContentError::AlreadyLoaded);
		}

		tracing::info!(sources = manager.sources().len(), "content.load.start");
		let population = self.directory.populate()?;
		let data = manager.load(&self.content.data_types, LoadMode::Initial);
		let freeze = self.directory.freeze_all()?;
		*stage = Stage::Loaded;

		let report = LifecycleReport {
			reload: None,
			population,
			data,
			freeze,
		};
		tracing::info!(clean = report.is_clean(), %report, "content.load.done");
		Ok(report)
	}

	/// Rebuilds the reloadable registries from the current sources of `manager`.
	pub fn reload(&self, manager: &DataManager) -> Result<LifecycleReport, ContentError> {
		let stage = self.stage.lock();
		if *stage != Stage::Loaded {
			return Err(ContentError::NotLoaded);
		}

		tracing::info!(sources = manager.sources().len(), "content.reload.start");
		let reload = self.directory.reload()?;
		let population = self.directory.populate()?;
		let data = manager.load(&self.content.data_types, LoadMode::Reload);
		let freeze = self.directory.freeze_all()?;

		let report = LifecycleReport {
			reload: Some(reload),
			population,
			data,
			freeze,
		};
		tracing::info!(clean = report.is_clean(), %report, "content.reload.done");
		Ok(report)
	}

	pub fn is_loaded(&self) -> bool {
		*self.stage.lock() == Stage::Loaded
	}

	pub fn directory(&self) -> &RegistryDirectory {
		&self.directory
	}

	pub fn content(&self) -> &ContentRegistries {
		&self.content
	}

	pub fn builtins(&self) -> &Builtins {
		&self.builtins
	}

	/// Every collected registry, core and extension, in creation order.
	pub fn summary(&self) -> Vec<RegistrySummary> {
		self.directory
			.records()
			.iter()
			.map(|record| {
				let registry = record.registry();
				RegistrySummary {
					index: record.index(),
					key: record.key().clone(),
					len: registry.len(),
					frozen: registry.is_frozen(),
					reloadable: registry.is_reloadable(),
					population: record.population(),
				}
			})
			.collect()
	}
}

impl fmt::Debug for Lifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Lifecycle")
			.field("directory", &self.directory)
			.field("stage", &*self.stage.lock())
			.finish_non_exhaustive()
	}
}

fn extension_error(extension: &dyn Extension, source: DirectoryError) -> ContentError {
	tracing::error!(extension = extension.name(), error = %source, "content.extension.failed");
	ContentError::Extension {
		extension: extension.name().to_owned(),
		source,
	}
}

#[cfg(test)]
mod tests;
