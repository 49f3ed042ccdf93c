//! Core content and the lifecycle that loads it.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Lifecycle`] | Bootstrap, load and reload of every registry. |
//! | [`ContentRegistries`] | Handles to the core registries, in creation order. |
//! | [`Builtins`] | Holders for content registered from code. |
//! | [`Extension`] | Hooks for registries and listeners contributed from outside the core. |
//!
//! The embedded core datapack is available from [`core_pack`].

mod builtin;
mod core_pack;
mod data_types;
mod error;
pub mod keys;
mod lifecycle;
mod registries;
pub mod types;

pub use builtin::Builtins;
pub use core_pack::{CORE_PACK, core_pack};
pub use error::ContentError;
pub use lifecycle::{Extension, Lifecycle, LifecycleReport, RegistrySummary};
pub use registries::ContentRegistries;
