use cairn_data::DataError;
use cairn_primitives::ResourceId;
use serde::Deserialize;

/// Vertical extent and lighting of a dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionType {
	#[serde(default)]
	pub ambient_light: f32,
	#[serde(default = "yes")]
	pub has_skylight: bool,
	#[serde(default)]
	pub has_ceiling: bool,
	pub min_y: i32,
	pub height: u32,
	#[serde(default = "unit_scale")]
	pub coordinate_scale: f64,
}

fn yes() -> bool {
	true
}

fn unit_scale() -> f64 {
	1.0
}

/// Chunk sections are 16 blocks tall; dimension bounds must align with them.
const SECTION: i64 = 16;

impl DimensionType {
	pub fn max_y(&self) -> i32 {
		let top = i64::from(self.min_y) + i64::from(self.height) - 1;
		i32::try_from(top).unwrap_or(i32::MAX)
	}

	pub fn contains_y(&self, y: i32) -> bool {
		y >= self.min_y && y <= self.max_y()
	}

	pub fn validate(self, id: &ResourceId) -> Result<Self, DataError> {
		if self.height == 0 || i64::from(self.height) % SECTION != 0 {
			return Err(super::schema(id, format!("height {} is not a positive multiple of 16", self.height)));
		}
		if i64::from(self.min_y) % SECTION != 0 {
			return Err(super::schema(id, format!("min_y {} is not a multiple of 16", self.min_y)));
		}
		if i64::from(self.min_y) + i64::from(self.height) > i64::from(i32::MAX) {
			return Err(super::schema(id, "dimension extends past the coordinate range"));
		}
		if !(0.0..=1.0).contains(&self.ambient_light) {
			return Err(super::schema(id, format!("ambient_light {} is outside 0..=1", self.ambient_light)));
		}
		if self.coordinate_scale.is_nan() || self.coordinate_scale <= 0.0 {
			return Err(super::schema(id, "coordinate_scale must be positive"));
		}
		Ok(self)
	}
}
