//! Domain model for workout records.
//!
//! # Responsibility
//! - Define the canonical workout record and its write-side inputs.
//! - Own field-level constraints shared by every layer.
//!
//! # Invariants
//! - Every stored workout is identified by a store-assigned `WorkoutId`.
//! - `title`, `load` and `reps` are valid for every constructed write input.

pub mod workout;
