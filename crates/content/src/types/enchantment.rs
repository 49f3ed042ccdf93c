use std::sync::Arc;

use cairn_data::DataError;
use cairn_primitives::ResourceId;
use cairn_registry::{Registry, RegistryHolder};
use serde::Deserialize;

use super::Item;

/// Enchantment as written in a datapack.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnchantmentDef {
	pub display_name: String,
	pub max_level: u8,
	#[serde(default)]
	pub supported_items: Vec<ResourceId>,
}

#[derive(Debug)]
pub struct Enchantment {
	pub display_name: String,
	pub max_level: u8,
	pub supported_items: Vec<RegistryHolder<Item>>,
}

impl Enchantment {
	/// Resolves item references against `items`. Every referenced item must already be
	/// registered.
	pub fn from_def(id: &ResourceId, def: EnchantmentDef, items: &Arc<dyn Registry<Item>>) -> Result<Self, DataError> {
		if def.max_level == 0 {
			return Err(super::schema(id, "max_level must be at least 1"));
		}
		let supported_items = def
			.supported_items
			.into_iter()
			.map(|item| {
				if items.contains_key(&item) {
					Ok(items.retrieve_holder(item))
				} else {
					Err(super::schema(id, format!("unknown item {item}")))
				}
			})
			.collect::<Result<_, _>>()?;
		Ok(Self {
			display_name: def.display_name,
			max_level: def.max_level,
			supported_items,
		})
	}

	pub fn supports(&self, item: &ResourceId) -> bool {
		self.supported_items.iter().any(|holder| holder.id() == item)
	}
}
