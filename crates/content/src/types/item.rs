use cairn_data::DataError;
use cairn_primitives::ResourceId;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
	#[default]
	Common,
	Uncommon,
	Rare,
	Epic,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
	pub display_name: String,
	#[serde(default = "default_stack")]
	pub max_stack_size: u8,
	#[serde(default)]
	pub rarity: Rarity,
}

fn default_stack() -> u8 {
	64
}

const MAX_STACK: u8 = 99;

impl Item {
	pub fn validate(self, id: &ResourceId) -> Result<Self, DataError> {
		if self.display_name.trim().is_empty() {
			return Err(super::schema(id, "display_name is empty"));
		}
		if !(1..=MAX_STACK).contains(&self.max_stack_size) {
			return Err(super::schema(
				id,
				format!("max_stack_size {} is outside 1..={MAX_STACK}", self.max_stack_size),
			));
		}
		Ok(self)
	}
}
