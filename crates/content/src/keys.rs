//! Names of the core registries and data types.
//!
//! Registry keys live in [`NAMESPACE`]. A direct data type's name defaults to its
//! registry key's name, so registry names double as the `<type>` path segment.

use cairn_primitives::{IdError, ResourceId};

pub const NAMESPACE: &str = "cairn";

pub const ROOT: &str = "root";
pub const DATA_TYPE: &str = "data_type";
pub const DIMENSION_TYPE: &str = "dimension_type";
pub const WORLD_FORMAT: &str = "world_format";
pub const WORLD: &str = "world";
pub const ITEM: &str = "item";
pub const BLOCK: &str = "block";
pub const ENCHANTMENT: &str = "enchantment";
pub const GAME_RULE: &str = "game_rule";

/// Index file listing the worlds of a namespace.
pub const WORLD_INDEX: &str = "worlds.json";

pub fn core(name: &str) -> Result<ResourceId, IdError> {
	ResourceId::new(NAMESPACE, name)
}
