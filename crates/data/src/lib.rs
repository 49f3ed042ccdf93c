//! Datapacks and the content resolution pipeline.
//!
//! # Mental Model
//!
//! Content arrives as files in [`DataSource`]s: the embedded core pack, one pack per
//! plugin, and external datapacks. Each source has a priority. The [`DataManager`] merges
//! every source, classifies files by their `data/<namespace>/<type>/...` path, and hands
//! them to the [`DataType`] claiming that type, highest priority first. Higher priority
//! sources shadow lower ones because the first registration of an id wins.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`DataEntry`] | Parsed entry path (namespace, type, key, filename). |
//! | [`DataSource`] | Prioritized bundle of files, optionally a datapack. |
//! | [`DataType`] | Loads entries of one type into one registry. |
//! | [`JsonDataType`] | One JSON file per entry. |
//! | [`IndexedDataType`] | One index file listing ids; per-entry files looked up on demand. |
//! | [`DataTypeRegistry`] | Data types by id, type name and index file. |
//! | [`DataManager`] | Orders sources, classifies entries, runs data types. |
//! | [`LoadReport`] | Per-entry outcome of one pass. |

mod data_type;
mod entry;
mod error;
mod manager;
mod pack;
mod source;
mod type_registry;

pub use data_type::{DataType, IndexLoader, IndexedDataType, IndexedOutcome, JsonDataType, LoadContext, Loaded};
pub use entry::{DATA_DIR, DataEntry, META_EXTENSION, SourcedEntry, entry_path, is_candidate_path};
pub use error::{DataError, PackError, TypeRegistryError};
pub use manager::{DataManager, EntryOutcome, EntryRecord, LoadMode, LoadReport, MissingEntry, Skipped};
pub use pack::{LEGACY_DESCRIPTOR, PACK_DESCRIPTOR, PackMeta};
pub use source::{DataSource, DirectorySource, MemorySource, Scan, scan};
pub use type_registry::DataTypeRegistry;
