//! Resource layer: CRUD use cases over one entity collection.
//!
//! # Responsibility
//! - Validate operation inputs before touching the store.
//! - Normalize store failures into the resource error taxonomy.

pub mod workout_resource;
