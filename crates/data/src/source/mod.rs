//! Prioritized bundles of data files.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`DataSource`] | Name, priority, optional datapack descriptor, file listing and `open`. |
//! | [`MemorySource`] | Files held in memory; the embedded core pack and tests. |
//! | [`DirectorySource`] | A pack directory on disk. |
//! | [`Scan`] | Entries classified from one source's listing, plus malformed paths. |

use std::io::{self, Read};
use std::sync::Arc;

use crate::entry::{DataEntry, SourcedEntry, is_candidate_path};
use crate::error::DataError;
use crate::pack::PackMeta;

mod directory;
mod memory;

pub use directory::DirectorySource;
pub use memory::MemorySource;

/// A bundle of data files with a resolution priority.
///
/// Sources with a higher priority are consulted first; the first definition of an
/// identifier wins.
pub trait DataSource: Send + Sync + 'static {
	/// Unique name, used for diagnostics and equal-priority tie-breaking.
	fn name(&self) -> &str;

	fn priority(&self) -> i32;

	/// Descriptor of the datapack this source was read from, if any.
	fn datapack(&self) -> Option<&PackMeta> {
		None
	}

	/// Every file path in the source, relative to its root, `/`-separated.
	fn files(&self) -> Vec<String>;

	fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>>;
}

/// Result of classifying a source's file listing.
#[derive(Debug, Default)]
pub struct Scan {
	pub entries: Vec<SourcedEntry>,
	pub malformed: Vec<DataError>,
}

/// Lists the entries of `source`, skipping non-candidate files.
pub fn scan(source: &Arc<dyn DataSource>) -> Scan {
	let mut scan = Scan::default();
	for path in source.files() {
		if !is_candidate_path(&path) {
			continue;
		}
		match DataEntry::parse(&path) {
			Ok(entry) => scan.entries.push(SourcedEntry::new(entry, Arc::clone(source))),
			Err(error) => {
				tracing::warn!(source = source.name(), %path, %error, "data.entry.malformed");
				scan.malformed.push(error);
			}
		}
	}
	scan
}
