//! `ua-blackboard`: type-keyed per-agent state.
//!
//! # Crate layout
//!
//! | Module          | Contents                                          |
//! |-----------------|---------------------------------------------------|
//! | [`blackboard`]  | `Blackboard`, the sealed `Slot` trait, `TypedSlot<T>` |
//!
//! Considerations read an agent's blackboard through the decision context;
//! the running action gets mutable access through its action context.  The
//! engine itself never inspects the stored values.

pub mod blackboard;


pub use blackboard::{Blackboard, Slot, TypedSlot};
