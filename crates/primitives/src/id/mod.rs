//! Namespaced resource identifiers.
//!
//! A [`ResourceId`] is rendered as `namespace:name`. The namespace allows
//! `[a-z0-9._-]`, the name additionally allows `/` so content can be nested
//! (`cairn:tools/iron_pickaxe`). The rendered form never exceeds
//! [`MAX_ID_LEN`] characters.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Longest accepted rendered identifier (`namespace:name`).
pub const MAX_ID_LEN: usize = i16::MAX as usize;

const SEPARATOR: char = ':';

/// Identifier validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
	#[error("invalid namespace {0:?}, must match [a-z0-9._-]+")]
	InvalidNamespace(String),
	#[error("invalid name {0:?}, must match [a-z0-9/._-]+")]
	InvalidName(String),
	#[error("identifier is {len} characters long, limit is {MAX_ID_LEN}")]
	TooLong { len: usize },
	#[error("malformed identifier {0:?}")]
	Malformed(String),
}

/// Immutable `(namespace, name)` key.
///
/// Cloning is cheap; both halves are reference counted. Equality, hashing and
/// ordering are structural (namespace first, then name).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
	namespace: Arc<str>,
	name: Arc<str>,
}

impl ResourceId {
	/// Builds an identifier after validating both halves.
	pub fn new(namespace: &str, name: &str) -> Result<Self, IdError> {
		if !is_valid_namespace(namespace) {
			return Err(IdError::InvalidNamespace(namespace.to_owned()));
		}
		if !is_valid_name(name) {
			return Err(IdError::InvalidName(name.to_owned()));
		}
		let len = namespace.len() + 1 + name.len();
		if len > MAX_ID_LEN {
			return Err(IdError::TooLong { len });
		}
		Ok(Self {
			namespace: Arc::from(namespace),
			name: Arc::from(name),
		})
	}

	/// Parses `namespace:name`. A bare `name` is rejected.
	pub fn parse(input: &str) -> Result<Self, IdError> {
		Self::parse_inner(input, None)
	}

	/// Parses `namespace:name`, or a bare `name` placed in `default_namespace`.
	pub fn parse_with_default(input: &str, default_namespace: &str) -> Result<Self, IdError> {
		Self::parse_inner(input, Some(default_namespace))
	}

	fn parse_inner(input: &str, default_namespace: Option<&str>) -> Result<Self, IdError> {
		if input.is_empty() {
			return Err(IdError::Malformed(input.to_owned()));
		}
		if input.len() > MAX_ID_LEN {
			return Err(IdError::TooLong { len: input.len() });
		}

		let mut parts = input.splitn(3, SEPARATOR);
		let first = parts.next().unwrap_or_default();
		match (parts.next(), parts.next()) {
			(None, _) => match default_namespace {
				Some(namespace) => Self::new(namespace, first),
				None => Err(IdError::Malformed(input.to_owned())),
			},
			(Some(name), None) => Self::new(first, name),
			(Some(_), Some(_)) => Err(IdError::Malformed(input.to_owned())),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns a sibling identifier in the same namespace.
	pub fn with_name(&self, name: &str) -> Result<Self, IdError> {
		Self::new(&self.namespace, name)
	}
}

/// Checks a namespace against `[a-z0-9._-]+`.
pub fn is_valid_namespace(namespace: &str) -> bool {
	!namespace.is_empty() && namespace.bytes().all(is_namespace_byte)
}

/// Checks a name against `[a-z0-9/._-]+`.
pub fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name.bytes().all(|b| b == b'/' || is_namespace_byte(b))
}

fn is_namespace_byte(b: u8) -> bool {
	matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-')
}

impl fmt::Display for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{SEPARATOR}{}", self.namespace, self.name)
	}
}

impl fmt::Debug for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ResourceId({self})")
	}
}

impl FromStr for ResourceId {
	type Err = IdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for ResourceId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for ResourceId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}
