//! Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the document-collection contract the resource layer consumes.
//! - Keep SQL details behind the store boundary.
//!
//! # Invariants
//! - Malformed ids raise `StoreError::MalformedId`; absent ids return `None`.
//! - Update and delete are single atomic statements.

pub mod workout_store;
