use std::sync::Arc;

use cairn_data::{DataType, DataTypeRegistry};
use cairn_registry::{Population, RegistryDirectory, RegistryLifecycle, ReloadableRegistry, SimpleRegistry};

use crate::error::ContentError;
use crate::keys;
use crate::types::{Block, DimensionType, Enchantment, GameRule, Item, World, WorldFormat};

/// Handles to every core registry.
///
/// [`ContentRegistries::create`] collects them into the directory in a fixed order.
/// Population and freezing follow that order, so a registry may rely on the content of
/// the ones created before it. Game rules come last.
#[derive(Clone)]
pub struct ContentRegistries {
	pub data_types: Arc<DataTypeRegistry>,
	pub dimension_types: Arc<SimpleRegistry<DimensionType>>,
	pub world_formats: Arc<SimpleRegistry<WorldFormat>>,
	pub worlds: Arc<ReloadableRegistry<World>>,
	pub items: Arc<ReloadableRegistry<Item>>,
	pub blocks: Arc<SimpleRegistry<Block>>,
	pub enchantments: Arc<ReloadableRegistry<Enchantment>>,
	pub game_rules: Arc<SimpleRegistry<GameRule>>,
}

impl ContentRegistries {
	pub fn create(directory: &RegistryDirectory) -> Result<Self, ContentError> {
		let data_types = DataTypeRegistry::new(keys::core(keys::DATA_TYPE)?);
		directory.adopt::<dyn DataType, _>(Arc::clone(&data_types), Population::Event)?;

		let registries = Self {
			data_types,
			dimension_types: directory.create_simple(keys::core(keys::DIMENSION_TYPE)?, Population::Event)?,
			world_formats: directory.create_simple(keys::core(keys::WORLD_FORMAT)?, Population::Event)?,
			worlds: directory.create_reloadable(keys::core(keys::WORLD)?, Population::Direct)?,
			items: directory.create_reloadable(keys::core(keys::ITEM)?, Population::Event)?,
			blocks: directory.create_simple(keys::core(keys::BLOCK)?, Population::Event)?,
			enchantments: directory.create_reloadable(keys::core(keys::ENCHANTMENT)?, Population::Direct)?,
			game_rules: directory.create_simple(keys::core(keys::GAME_RULE)?, Population::Event)?,
		};
		tracing::debug!(registries = directory.len(), "content.registries.created");
		Ok(registries)
	}

	/// Every core registry in creation order.
	pub fn lifecycles(&self) -> [&dyn RegistryLifecycle; 8] {
		[
			&*self.data_types,
			&*self.dimension_types,
			&*self.world_formats,
			&*self.worlds,
			&*self.items,
			&*self.blocks,
			&*self.enchantments,
			&*self.game_rules,
		]
	}
}

impl std::fmt::Debug for ContentRegistries {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut list = f.debug_map();
		for registry in self.lifecycles() {
			list.entry(registry.registry_key(), &registry.len());
		}
		list.finish()
	}
}
