use serde::{Deserialize, Serialize};

/// Named priority levels. Higher values are processed first and win overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Lowest,
	Low,
	#[default]
	Normal,
	High,
	Highest,
}

impl Priority {
	pub const fn value(self) -> i32 {
		match self {
			Self::Lowest => 0,
			Self::Low => 250,
			Self::Normal => 500,
			Self::High => 750,
			Self::Highest => 1000,
		}
	}
}

impl From<Priority> for i32 {
	fn from(priority: Priority) -> Self {
		priority.value()
	}
}

impl std::fmt::Display for Priority {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let label = match self {
			Self::Lowest => "lowest",
			Self::Low => "low",
			Self::Normal => "normal",
			Self::High => "high",
			Self::Highest => "highest",
		};
		write!(f, "{label} ({})", self.value())
	}
}
