//! Core content kinds.
//!
//! Values decoded from datapacks validate themselves after deserialization; a violation
//! becomes a [`DataError::Schema`] for that entry only. Cross-references to other
//! registries are kept as [`cairn_registry::RegistryHolder`]s and resolved on access.

use cairn_data::DataError;

mod block;
mod dimension;
mod enchantment;
mod game_rule;
mod item;
mod world;

pub use block::Block;
pub use dimension::DimensionType;
pub use enchantment::{Enchantment, EnchantmentDef};
pub use game_rule::{GameRule, GameRuleValue};
pub use item::{Item, Rarity};
pub use world::{World, WorldFile, WorldFormat, WorldLoader, WorldMeta};

fn schema(id: &cairn_primitives::ResourceId, message: impl std::fmt::Display) -> DataError {
	DataError::Schema(format!("{id}: {message}"))
}
