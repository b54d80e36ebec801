//! # WILDLANDS Core
//!
//! Storage and math shared by the terrain generator and the simulation.
//!
//! ## Architecture Rules
//!
//! 1. **Stable handles** - Entities are addressed by typed indices, never by reference
//! 2. **Append-only** - Entities are never removed or reordered once stored
//! 3. **Graceful staleness** - Looking up a handle returns `Option`, never panics
//!
//! ## Example
//!
//! ```rust,ignore
//! use wildlands_core::{Arena, Vec3};
//!
//! let mut arena = Arena::new();
//! let id = arena.insert(Vec3::new(1.0, 2.0, 3.0));
//! assert_eq!(arena.get(id).map(|v| v.y), Some(2.0));
//! ```

#![deny(unsafe_code)]

pub mod arena;
pub mod math;

pub use arena::{Arena, Handle};
pub use math::{Transform, Vec3};
