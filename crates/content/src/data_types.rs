//! Core data types, registered through the data type registry's registration event.

use std::sync::Arc;

use cairn_data::{DataType, IndexedDataType, JsonDataType};
use cairn_primitives::Priority;
use cairn_registry::{RegistrationEvent, Registry, RegistryError};

use crate::keys;
use crate::registries::ContentRegistries;
use crate::types::{DimensionType, Enchantment, EnchantmentDef, Item, World, WorldFormat, WorldLoader};

/// Listener name used for the core data types.
pub(crate) const LISTENER: &str = "cairn:core_data_types";

/// Dimension types and worlds load before items and enchantments. Worlds resolve their
/// dimension while loading, so `dimension_type` is registered ahead of `world`.
pub(crate) fn register(
	event: &RegistrationEvent<'_, dyn DataType>,
	content: &ContentRegistries,
) -> Result<(), RegistryError> {
	let dimensions: Arc<dyn Registry<DimensionType>> = content.dimension_types.clone();
	let formats: Arc<dyn Registry<WorldFormat>> = content.world_formats.clone();
	let items: Arc<dyn Registry<Item>> = content.items.clone();
	let worlds: Arc<dyn Registry<World>> = content.worlds.clone();
	let enchantments: Arc<dyn Registry<Enchantment>> = content.enchantments.clone();

	let dimension_type = JsonDataType::new(Arc::clone(&dimensions), |id, dimension: DimensionType| {
		dimension.validate(id).map(Arc::new)
	})
	.with_priority(Priority::High);
	event.register(keys::core(keys::DIMENSION_TYPE)?, Arc::new(dimension_type))?;

	let world = IndexedDataType::new(
		keys::WORLD,
		keys::WORLD_INDEX,
		worlds,
		WorldLoader::new(formats, dimensions),
	)
	.with_priority(Priority::High);
	event.register(keys::core(keys::WORLD)?, Arc::new(world))?;

	let item = JsonDataType::new(Arc::clone(&items), |id, item: Item| item.validate(id).map(Arc::new));
	event.register(keys::core(keys::ITEM)?, Arc::new(item))?;

	let enchantment = JsonDataType::new(enchantments, move |id, def: EnchantmentDef| {
		Enchantment::from_def(id, def, &items).map(Arc::new)
	});
	event.register(keys::core(keys::ENCHANTMENT)?, Arc::new(enchantment))?;

	Ok(())
}
