use std::sync::Arc;

use cairn_data::{DataError, IndexLoader, LoadContext};
use cairn_primitives::ResourceId;
use cairn_registry::{Registry, RegistryError, RegistryHolder};
use serde::Deserialize;

use super::DimensionType;

/// On-disk world storage format. Builtin only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldFormat {
	pub display_name: &'static str,
	pub extension: &'static str,
}

/// Metadata listed per world in `worlds.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldMeta {
	pub format: ResourceId,
	pub dimension: ResourceId,
}

/// Per-world file, `data/<ns>/world/<name>.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldFile {
	pub display_name: String,
	#[serde(default)]
	pub seed: i64,
	#[serde(default)]
	pub spawn: [i32; 3],
}

/// A playable world. Format and dimension are read through the registries on every
/// access, so a reload of either is picked up.
#[derive(Debug)]
pub struct World {
	pub display_name: String,
	pub seed: i64,
	pub spawn: [i32; 3],
	format: RegistryHolder<WorldFormat>,
	dimension: RegistryHolder<DimensionType>,
}

impl World {
	pub fn format(&self) -> Result<Arc<WorldFormat>, RegistryError> {
		self.format.get()
	}

	pub fn format_id(&self) -> &ResourceId {
		self.format.id()
	}

	pub fn dimension(&self) -> Result<Arc<DimensionType>, RegistryError> {
		self.dimension.get()
	}

	pub fn dimension_id(&self) -> &ResourceId {
		self.dimension.id()
	}
}

/// Builds worlds from `worlds.json` plus one file per listed world.
pub struct WorldLoader {
	formats: Arc<dyn Registry<WorldFormat>>,
	dimensions: Arc<dyn Registry<DimensionType>>,
}

impl WorldLoader {
	pub fn new(formats: Arc<dyn Registry<WorldFormat>>, dimensions: Arc<dyn Registry<DimensionType>>) -> Self {
		Self { formats, dimensions }
	}
}

impl IndexLoader for WorldLoader {
	type Value = World;
	type Meta = WorldMeta;

	fn load_entry(&self, id: &ResourceId, meta: WorldMeta, ctx: &LoadContext<'_>) -> Result<Arc<World>, DataError> {
		let file: WorldFile = ctx.require_entry(id, "json")?.read_json()?;

		if !self.formats.contains_key(&meta.format) {
			return Err(super::schema(id, format!("unknown world format {}", meta.format)));
		}
		let dimension = self
			.dimensions
			.retrieve_value(&meta.dimension)
			.ok_or_else(|| super::schema(id, format!("unknown dimension type {}", meta.dimension)))?;
		if !dimension.contains_y(file.spawn[1]) {
			return Err(super::schema(
				id,
				format!(
					"spawn y {} is outside {}..={} of {}",
					file.spawn[1],
					dimension.min_y,
					dimension.max_y(),
					meta.dimension
				),
			));
		}

		Ok(Arc::new(World {
			display_name: file.display_name,
			seed: file.seed,
			spawn: file.spawn,
			format: self.formats.retrieve_holder(meta.format),
			dimension: self.dimensions.retrieve_holder(meta.dimension),
		}))
	}
}
