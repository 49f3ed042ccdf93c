/// Block properties. Blocks are builtin only.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	pub hardness: f32,
	pub solid: bool,
}

impl Block {
	pub fn air() -> Self {
		Self {
			hardness: 0.0,
			solid: false,
		}
	}

	pub fn stone() -> Self {
		Self {
			hardness: 1.5,
			solid: true,
		}
	}
}
