//! Note store abstraction and persistence implementations.
//!
//! # Responsibility
//! - Define the date-keyed store contract used by the lifecycle services.
//! - Keep filesystem details out of service/business orchestration.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`) in addition to I/O errors.

pub mod fs_store;
pub mod memory_store;
pub mod note_store;
