use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRuleValue {
	Bool(bool),
	Int(i64),
}

impl fmt::Display for GameRuleValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
		}
	}
}

/// A server rule with its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRule {
	pub description: &'static str,
	pub default: GameRuleValue,
}

impl GameRule {
	pub const fn new(description: &'static str, default: GameRuleValue) -> Self {
		Self { description, default }
	}
}
