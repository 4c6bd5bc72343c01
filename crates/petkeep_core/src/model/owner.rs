//! Owner snapshot.
//!
//! # Invariants
//! - `id` is stable and never reused for another owner.
//! - `number_of_pets` always equals the live count of pets referencing this
//!   owner at the time the snapshot was taken, never a cached value.

use crate::model::pet::Pet;
use crate::model::CatalogValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an owner record.
pub type OwnerId = Uuid;

/// Detached owner snapshot with its owned pets materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Stable global ID, generated at creation.
    pub id: OwnerId,
    pub name: String,
    /// Opaque image reference resolved by the UI layer.
    pub image: Option<String>,
    /// Pets currently owned, loaded inside the snapshot's read transaction.
    pub pets: Vec<Pet>,
    /// Live referencing-pet count at snapshot time.
    pub number_of_pets: u64,
}

impl Owner {
    /// Creates an owner snapshot with a generated stable ID and no pets.
    pub fn new(name: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image,
            pets: Vec::new(),
            number_of_pets: 0,
        }
    }

    /// Checks write-path input constraints.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyOwnerName);
        }
        Ok(())
    }
}
