//! Content registered from code rather than datapacks.

use std::sync::Arc;

use cairn_registry::{
	DirectoryError, Register, RegistryDirectory, RegistryError, RegistryHolder, RegistryLifecycle,
};

use crate::keys;
use crate::registries::ContentRegistries;
use crate::types::{Block, GameRule, GameRuleValue, WorldFormat};

/// Listener name used for builtin content.
pub(crate) const LISTENER: &str = "cairn:builtin";

/// Holders for every builtin entry, usable before population.
pub struct Builtins {
	pub anvil: RegistryHolder<WorldFormat>,
	pub polar: RegistryHolder<WorldFormat>,
	pub air: RegistryHolder<Block>,
	pub stone: RegistryHolder<Block>,
	pub natural_regeneration: RegistryHolder<GameRule>,
	pub fall_damage: RegistryHolder<GameRule>,
	pub max_players: RegistryHolder<GameRule>,
	formats: Arc<Register<WorldFormat>>,
	blocks: Arc<Register<Block>>,
	rules: Arc<Register<GameRule>>,
}

impl Builtins {
	pub(crate) fn new() -> Result<Self, RegistryError> {
		let formats = Register::<WorldFormat>::new(keys::NAMESPACE)?;
		let blocks = Register::<Block>::new(keys::NAMESPACE)?;
		let rules = Register::<GameRule>::new(keys::NAMESPACE)?;

		Ok(Self {
			anvil: formats.add("anvil", || {
				Arc::new(WorldFormat {
					display_name: "Anvil",
					extension: "mca",
				})
			})?,
			polar: formats.add("polar", || {
				Arc::new(WorldFormat {
					display_name: "Polar",
					extension: "polar",
				})
			})?,
			air: blocks.add("air", || Arc::new(Block::air()))?,
			stone: blocks.add("stone", || Arc::new(Block::stone()))?,
			natural_regeneration: rules.add("natural_regeneration", || {
				Arc::new(GameRule::new("Players regenerate health when fed", GameRuleValue::Bool(true)))
			})?,
			fall_damage: rules.add("fall_damage", || {
				Arc::new(GameRule::new("Falling hurts", GameRuleValue::Bool(true)))
			})?,
			max_players: rules.add("max_players", || {
				Arc::new(GameRule::new("Player limit per world", GameRuleValue::Int(20)))
			})?,
			formats: Arc::new(formats),
			blocks: Arc::new(blocks),
			rules: Arc::new(rules),
		})
	}

	pub(crate) fn subscribe(
		&self,
		directory: &RegistryDirectory,
		content: &ContentRegistries,
	) -> Result<(), DirectoryError> {
		let formats = Arc::clone(&self.formats);
		directory.subscribe::<WorldFormat, _>(content.world_formats.registry_key(), LISTENER, move |event| {
			event.register_all(&formats)
		})?;

		let blocks = Arc::clone(&self.blocks);
		directory.subscribe::<Block, _>(content.blocks.registry_key(), LISTENER, move |event| {
			event.register_all(&blocks)
		})?;

		let rules = Arc::clone(&self.rules);
		directory.subscribe::<GameRule, _>(content.game_rules.registry_key(), LISTENER, move |event| {
			event.register_all(&rules)
		})?;
		Ok(())
	}
}

impl std::fmt::Debug for Builtins {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Builtins")
			.field("world_formats", &self.formats.len())
			.field("blocks", &self.blocks.len())
			.field("game_rules", &self.rules.len())
			.finish()
	}
}
