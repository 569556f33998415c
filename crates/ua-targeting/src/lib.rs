//! `ua-targeting`: target handles and target search.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`target`]   | `Target` handle (identity, tags, position, active flag)    |
//! | [`provider`] | `TargetProvider` trait, brute-force impl for `[Target]`    |
//! | [`index`]    | `SpatialTargetIndex` (R-tree), `SpatialTargetIndexBuilder` |
//! | [`error`]    | `TargetingError`, `TargetingResult<T>`                     |
//!
//! The decision engine only depends on the [`TargetProvider`] contract;
//! [`SpatialTargetIndex`] is one replaceable implementation of it.

pub mod error;
pub mod index;
pub mod provider;
pub mod target;


pub use error::{TargetingError, TargetingResult};
pub use index::{SpatialTargetIndex, SpatialTargetIndexBuilder};
pub use provider::TargetProvider;
pub use target::Target;
