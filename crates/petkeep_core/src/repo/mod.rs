//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the catalog data-access contract (owners, pets, adoption).
//! - Isolate SQLite query and transaction details from callers.
//!
//! # Invariants
//! - Every operation runs inside exactly one store transaction; reads map
//!   their snapshots before that transaction ends.
//! - Repository APIs return semantic errors (owner/pet not found) in
//!   addition to DB transport errors.

pub mod catalog_repo;
pub(crate) mod snapshot;
