use cairn_primitives::ResourceId;

use crate::error::DataError;

/// What happened to one entry.
#[derive(Debug)]
pub enum EntryOutcome {
	/// Ids registered from this entry.
	Loaded(Vec<ResourceId>),
	/// The id was already defined by a higher or equal priority source.
	Rejected(DataError),
	Failed(DataError),
}

#[derive(Debug)]
pub struct EntryRecord {
	/// Entry path; ids inside an index file are reported as `<path>#<key>`.
	pub path: String,
	pub source: String,
	pub data_type: String,
	pub outcome: EntryOutcome,
}

/// An entry that was never handed to a data type.
#[derive(Debug)]
pub enum Skipped {
	UnknownType { path: String, type_name: String },
	UnknownIndexFile { path: String, file: String },
	Malformed(DataError),
}

/// An id listed in an index whose per-entry file is absent from every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
	pub index: String,
	pub id: ResourceId,
	pub path: String,
}

/// Aggregated per-entry results of one resolution pass.
#[derive(Debug, Default)]
pub struct LoadReport {
	pub entries: Vec<EntryRecord>,
	pub skipped: Vec<Skipped>,
	pub missing: Vec<MissingEntry>,
}

impl LoadReport {
	/// Every id registered during the pass, in load order.
	pub fn loaded(&self) -> impl Iterator<Item = &ResourceId> {
		self.entries.iter().flat_map(|record| match &record.outcome {
			EntryOutcome::Loaded(ids) => ids.as_slice(),
			_ => &[][..],
		})
	}

	pub fn failures(&self) -> impl Iterator<Item = (&EntryRecord, &DataError)> {
		self.entries.iter().filter_map(|record| match &record.outcome {
			EntryOutcome::Failed(error) => Some((record, error)),
			_ => None,
		})
	}

	pub fn rejections(&self) -> impl Iterator<Item = (&EntryRecord, &DataError)> {
		self.entries.iter().filter_map(|record| match &record.outcome {
			EntryOutcome::Rejected(error) => Some((record, error)),
			_ => None,
		})
	}

	pub fn missing(&self) -> &[MissingEntry] {
		&self.missing
	}

	/// No failures, no missing per-entry files. Rejections and skips are tolerated.
	pub fn is_clean(&self) -> bool {
		self.failures().next().is_none() && self.missing.is_empty()
	}

	pub fn loaded_count(&self) -> usize {
		self.loaded().count()
	}

	pub(crate) fn record(&mut self, path: String, source: &str, data_type: &str, outcome: EntryOutcome) {
		match &outcome {
			EntryOutcome::Loaded(ids) => {
				tracing::trace!(%path, source, data_type, count = ids.len(), "data.entry.loaded");
			}
			EntryOutcome::Rejected(error) => {
				tracing::warn!(%path, source, data_type, %error, "data.entry.rejected");
			}
			EntryOutcome::Failed(error) => {
				tracing::error!(%path, source, data_type, %error, "data.entry.failed");
			}
		}
		self.entries.push(EntryRecord {
			path,
			source: source.to_owned(),
			data_type: data_type.to_owned(),
			outcome,
		});
	}
}

impl std::fmt::Display for LoadReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} loaded, {} rejected, {} failed, {} skipped, {} missing",
			self.loaded_count(),
			self.rejections().count(),
			self.failures().count(),
			self.skipped.len(),
			self.missing.len()
		)
	}
}
