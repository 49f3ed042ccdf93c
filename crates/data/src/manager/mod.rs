//! Content resolution pipeline.
//!
//! # Mental Model
//!
//! 1. **Order sources:** highest priority first; equal priorities by source name.
//! 2. **Classify:** each candidate entry is matched to a data type. Namespace-level files
//!    are looked up as index files, typed entries by their type segment. Entries of
//!    indexed types are parked by full path for on-demand lookup; the rest are queued.
//! 3. **Load:** data types run highest priority first, each over its queue in source
//!    order. The first definition of an id wins; later ones are rejected as collisions.
//! 4. **Isolate:** every entry yields its own outcome in the [`LoadReport`]. An error or a
//!    panic inside a data type affects only that entry.
//!
//! On [`LoadMode::Reload`] only data types whose target registry is reloadable run.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::data_type::{DataType, LoadContext, Loaded, Parked};
use crate::entry::SourcedEntry;
use crate::error::{DataError, PackError, panic_message};
use crate::pack::PackMeta;
use crate::source::{self, DataSource};
use crate::type_registry::DataTypeRegistry;

mod report;

pub use report::{EntryOutcome, EntryRecord, LoadReport, MissingEntry, Skipped};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
	Initial,
	/// Only data types targeting reloadable registries run.
	Reload,
}

/// Owns the data sources and resolves their entries into registries.
#[derive(Default)]
pub struct DataManager {
	sources: Vec<Arc<dyn DataSource>>,
}

impl DataManager {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(&mut self, source: impl DataSource) -> Result<(), PackError> {
		self.add_shared_source(Arc::new(source))
	}

	pub fn add_shared_source(&mut self, source: Arc<dyn DataSource>) -> Result<(), PackError> {
		if self.source(source.name()).is_some() {
			return Err(PackError::DuplicateSource(source.name().to_owned()));
		}
		tracing::debug!(source = source.name(), priority = source.priority(), "data.source.add");
		self.sources.push(source);
		sort_sources(&mut self.sources);
		Ok(())
	}

	/// Swaps the whole source set, typically before a reload. On error the previous set
	/// is kept.
	pub fn replace_sources(
		&mut self,
		sources: impl IntoIterator<Item = Arc<dyn DataSource>>,
	) -> Result<(), PackError> {
		let mut next: Vec<Arc<dyn DataSource>> = Vec::new();
		for source in sources {
			if next.iter().any(|existing| existing.name() == source.name()) {
				return Err(PackError::DuplicateSource(source.name().to_owned()));
			}
			next.push(source);
		}
		sort_sources(&mut next);
		self.sources = next;
		Ok(())
	}

	/// Sources in resolution order.
	pub fn sources(&self) -> &[Arc<dyn DataSource>] {
		&self.sources
	}

	pub fn source(&self, name: &str) -> Option<&Arc<dyn DataSource>> {
		self.sources.iter().find(|source| source.name() == name)
	}

	/// Descriptors of every source read from a datapack, in resolution order.
	pub fn loaded_datapacks(&self) -> Vec<&PackMeta> {
		self.sources.iter().filter_map(|source| source.datapack()).collect()
	}

	/// Runs one resolution pass against `types`.
	pub fn load(&self, types: &DataTypeRegistry, mode: LoadMode) -> LoadReport {
		tracing::info!(sources = self.sources.len(), ?mode, "data.load.start");

		let mut report = LoadReport::default();
		let mut parked = Parked::default();
		let mut queues: FxHashMap<String, Vec<SourcedEntry>> = FxHashMap::default();

		for source in &self.sources {
			let scan = source::scan(source);
			report.skipped.extend(scan.malformed.into_iter().map(Skipped::Malformed));
			for entry in scan.entries {
				classify(types, entry, &mut parked, &mut queues, &mut report);
			}
		}
		tracing::debug!(parked = parked.len(), queued_types = queues.len(), "data.load.classified");

		for data_type in types.by_priority() {
			if mode == LoadMode::Reload && !data_type.target().is_reloadable() {
				tracing::debug!(data_type = data_type.type_name(), "data.type.skip_static");
				continue;
			}
			let Some(entries) = queues.remove(data_type.type_name()) else {
				continue;
			};
			tracing::debug!(data_type = data_type.type_name(), entries = entries.len(), "data.type.load");
			let ctx = LoadContext::new(data_type.type_name(), &parked);
			for entry in &entries {
				load_entry(data_type.as_ref(), entry, &ctx, &mut report);
			}
		}

		tracing::info!(
			loaded = report.loaded_count(),
			rejected = report.rejections().count(),
			failed = report.failures().count(),
			skipped = report.skipped.len(),
			missing = report.missing.len(),
			"data.load.done"
		);
		report
	}
}

impl std::fmt::Debug for DataManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let names: Vec<_> = self.sources.iter().map(|source| source.name()).collect();
		f.debug_struct("DataManager").field("sources", &names).finish()
	}
}

fn sort_sources(sources: &mut [Arc<dyn DataSource>]) {
	sources.sort_by(|a, b| {
		b.priority()
			.cmp(&a.priority())
			.then_with(|| a.name().cmp(b.name()))
	});
}

fn classify(
	types: &DataTypeRegistry,
	entry: SourcedEntry,
	parked: &mut Parked,
	queues: &mut FxHashMap<String, Vec<SourcedEntry>>,
	report: &mut LoadReport,
) {
	let data = entry.entry();
	if data.is_namespace_level() {
		let Some(data_type) = types.by_index_file(data.filename()) else {
			tracing::warn!(path = entry.path(), source = entry.source_name(), "data.index.unknown");
			report.skipped.push(Skipped::UnknownIndexFile {
				path: entry.path().to_owned(),
				file: data.filename().to_owned(),
			});
			return;
		};
		queues
			.entry(data_type.type_name().to_owned())
			.or_default()
			.push(entry);
		return;
	}

	match types.by_type(data.type_name()) {
		None => {
			tracing::warn!(
				path = entry.path(),
				source = entry.source_name(),
				type_name = data.type_name(),
				"data.type.unknown"
			);
			report.skipped.push(Skipped::UnknownType {
				path: entry.path().to_owned(),
				type_name: data.type_name().to_owned(),
			});
		}
		Some(data_type) if data_type.is_indexed() => {
			let path = entry.path().to_owned();
			let source = entry.source_name().to_owned();
			if !parked.park(entry) {
				tracing::debug!(%path, %source, "data.entry.shadowed");
			}
		}
		Some(data_type) => {
			queues
				.entry(data_type.type_name().to_owned())
				.or_default()
				.push(entry);
		}
	}
}

fn classify_error(error: DataError) -> EntryOutcome {
	if error.is_collision() {
		EntryOutcome::Rejected(error)
	} else {
		EntryOutcome::Failed(error)
	}
}

fn load_entry(data_type: &dyn DataType, entry: &SourcedEntry, ctx: &LoadContext<'_>, report: &mut LoadReport) {
	let type_name = data_type.type_name();
	let source = entry.source_name();
	let loaded = catch_unwind(AssertUnwindSafe(|| data_type.load(entry, ctx)))
		.unwrap_or_else(|payload| Err(DataError::Extension(panic_message(payload.as_ref()))));

	let outcome = match loaded {
		Ok(Loaded::Entry(id)) => EntryOutcome::Loaded(vec![id]),
		Ok(Loaded::Index(outcomes)) => {
			let mut ids = Vec::with_capacity(outcomes.len());
			for outcome in outcomes {
				match outcome.result {
					Ok(id) => ids.push(id),
					Err(DataError::MissingEntry { id, path }) => {
						tracing::warn!(index = entry.path(), %id, %path, "data.entry.missing");
						report.missing.push(MissingEntry {
							index: entry.path().to_owned(),
							id,
							path,
						});
					}
					Err(error) => report.record(
						format!("{}#{}", entry.path(), outcome.key),
						source,
						type_name,
						classify_error(error),
					),
				}
			}
			EntryOutcome::Loaded(ids)
		}
		Err(error) => classify_error(error),
	};
	report.record(entry.path().to_owned(), source, type_name, outcome);
}
