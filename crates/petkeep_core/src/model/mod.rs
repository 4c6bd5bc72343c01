//! Catalog domain model: owner and pet snapshots.
//!
//! # Responsibility
//! - Define the detached value objects returned by repository operations.
//! - Centralize input validation shared by owner and pet write paths.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID, never reused.
//! - Snapshots carry no reference back to the store or its transactions;
//!   once returned they are safe to hold, move across threads, or serialize.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod owner;
pub mod pet;

/// Input validation failure caught before any store access.
///
/// A rejected input is never partially applied: the repository validates
/// before opening its transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyOwnerName,
    EmptyPetName,
    NegativeAge(i64),
}

impl Display for CatalogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOwnerName => write!(f, "owner name cannot be empty"),
            Self::EmptyPetName => write!(f, "pet name cannot be empty"),
            Self::NegativeAge(age) => write!(f, "pet age cannot be negative, got {age}"),
        }
    }
}

impl Error for CatalogValidationError {}
