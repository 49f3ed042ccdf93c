use std::borrow::Cow;
use std::io::{self, Cursor, Read};

use indexmap::IndexMap;

use super::DataSource;
use crate::error::PackError;
use crate::pack::{PackMeta, read_descriptor};

/// Files held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
	name: String,
	priority: i32,
	pack: Option<PackMeta>,
	files: IndexMap<String, Cow<'static, [u8]>>,
}

impl MemorySource {
	pub fn new(name: impl Into<String>, priority: impl Into<i32>) -> Self {
		Self {
			name: name.into(),
			priority: priority.into(),
			pack: None,
			files: IndexMap::new(),
		}
	}

	pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Cow<'static, [u8]>>) -> Self {
		self.insert(path, contents);
		self
	}

	pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Cow<'static, [u8]>>) {
		let path = path.into().replace('\\', "/");
		self.files.insert(path, contents.into());
	}

	pub fn with_datapack(mut self, pack: PackMeta) -> Self {
		self.pack = Some(pack);
		self
	}

	/// Reads `pack.json` from the files already inserted.
	pub fn into_datapack(mut self) -> Result<Self, PackError> {
		let pack = read_descriptor(&self.name, |file| {
			Ok(self.files.get(file).map(|bytes| bytes.to_vec()))
		})?;
		self.pack = Some(pack);
		Ok(self)
	}
}

impl DataSource for MemorySource {
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
		self.files.keys().cloned().collect()
	}

	fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
		let bytes = self
			.files
			.get(path)
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} is not in {}", self.name)))?;
		Ok(Box::new(Cursor::new(&**bytes)))
	}
}
