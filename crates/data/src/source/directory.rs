use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use super::DataSource;
use crate::error::PackError;
use crate::pack::{PackMeta, read_descriptor};

/// A pack directory on disk.
///
/// The file listing is taken once at construction; file contents are read on `open`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	name: String,
	root: PathBuf,
	priority: i32,
	pack: Option<PackMeta>,
	files: Vec<String>,
}

impl DirectorySource {
	/// Walks `root` without requiring a descriptor. Used for plugin-provided packs.
	pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, priority: impl Into<i32>) -> Result<Self, PackError> {
		let name = name.into();
		let root = root.into();
		let files = list_files(&name, &root)?;
		tracing::debug!(source = %name, root = %root.display(), files = files.len(), "data.source.scan");
		Ok(Self {
			name,
			root,
			priority: priority.into(),
			pack: None,
			files,
		})
	}

	/// Opens a datapack directory; `pack.json` is required and names the source.
	pub fn datapack(root: impl Into<PathBuf>, priority: impl Into<i32>) -> Result<Self, PackError> {
		let root = root.into();
		let label = root.display().to_string();
		let pack = read_descriptor(&label, |file| read_optional(&root.join(file)))?;
		let mut source = Self::new(pack.name.clone(), root, priority)?;
		tracing::info!(pack = %pack, root = %label, "data.pack.found");
		source.pack = Some(pack);
		Ok(source)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
		Err(error) => Err(error),
	}
}

fn list_files(name: &str, root: &Path) -> Result<Vec<String>, PackError> {
	if !root.is_dir() {
		return Err(PackError::Io {
			pack: name.to_owned(),
			source: io::Error::new(io::ErrorKind::NotFound, format!("{} is not a directory", root.display())),
		});
	}

	let walker = WalkBuilder::new(root)
		.standard_filters(false)
		.follow_links(false)
		.sort_by_file_path(|a, b| a.cmp(b))
		.build();

	let mut files = Vec::new();
	for entry in walker {
		let entry = entry.map_err(|source| PackError::Walk {
			pack: name.to_owned(),
			source,
		})?;
		if !entry.file_type().is_some_and(|kind| kind.is_file()) {
			continue;
		}
		let Ok(relative) = entry.path().strip_prefix(root) else {
			continue;
		};
		let Some(relative) = relative.to_str() else {
			tracing::warn!(source = %name, path = %entry.path().display(), "data.source.non_utf8_path");
			continue;
		};
		files.push(relative.replace('\\', "/"));
	}
	Ok(files)
}

impl DataSource for DirectorySource {
	fn name(&self) -> &str {
		&self.name
	}

	fn priority(&self) -> i32 {
		self.priority
	}

	fn datapack(&self) -> Option<&PackMeta> {
		self.pack.as_ref()
	}

	fn files(&self) -> Vec<String> {
		self.files.clone()
	}

	fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
		if !self.files.iter().any(|file| file == path) {
			return Err(io::Error::new(
				io::ErrorKind::NotFound,
				format!("{path} is not in {}", self.name),
			));
		}
		let file = File::open(self.root.join(path))?;
		Ok(Box::new(BufReader::new(file)))
	}
}
