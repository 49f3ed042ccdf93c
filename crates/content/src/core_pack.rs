//! The datapack compiled into the binary.

use cairn_data::{MemorySource, PackError};
use cairn_primitives::Priority;

/// Source name of the core pack.
pub const CORE_PACK: &str = "cairn";

macro_rules! pack_files {
	($($path:literal),* $(,)?) => {
		[$(($path, include_bytes!(concat!("../pack/", $path)).as_slice())),*]
	};
}

const FILES: [(&str, &[u8]); 10] = pack_files![
	"pack.json",
	"data/cairn/dimension_type/overworld.json",
	"data/cairn/dimension_type/the_nether.json",
	"data/cairn/item/stick.json",
	"data/cairn/item/iron_pickaxe.json",
	"data/cairn/item/totem.json",
	"data/cairn/enchantment/efficiency.json",
	"data/cairn/worlds.json",
	"data/cairn/world/lobby.json",
	"data/cairn/world/nether_hub.json",
];

/// The core pack at [`Priority::Lowest`], so every plugin or external pack overrides it.
pub fn core_pack() -> Result<MemorySource, PackError> {
	FILES
		.iter()
		.fold(MemorySource::new(CORE_PACK, Priority::Lowest), |source, (path, bytes)| {
			source.with_file(*path, *bytes)
		})
		.into_datapack()
}
