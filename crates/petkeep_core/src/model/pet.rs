//! Pet snapshot and species catalog.
//!
//! # Invariants
//! - `id` is stable and never reused for another pet.
//! - `age` is non-negative for every persisted pet.
//! - Adoption state is derived from `owner_id`; there is no separately
//!   stored flag that could drift out of sync.

use crate::model::owner::OwnerId;
use crate::model::CatalogValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a pet record.
pub type PetId = Uuid;

/// Fixed catalog of pet kinds accepted by the shelter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Dog,
    Cat,
    Octopus,
    Squirrel,
    Squid,
    Penguin,
    Seal,
    Snake,
    Fish,
    Owl,
    Chameleon,
    Fox,
    Pig,
    Tiger,
    Cow,
    Wolf,
    Skunk,
    Rat,
    Panda,
    Monkey,
    Frog,
    Spider,
    Duck,
    Bug,
    Bear,
    Bird,
}

impl Species {
    /// Every species in catalog order, for pickers and filter UIs.
    pub const ALL: &'static [Species] = &[
        Self::Dog,
        Self::Cat,
        Self::Octopus,
        Self::Squirrel,
        Self::Squid,
        Self::Penguin,
        Self::Seal,
        Self::Snake,
        Self::Fish,
        Self::Owl,
        Self::Chameleon,
        Self::Fox,
        Self::Pig,
        Self::Tiger,
        Self::Cow,
        Self::Wolf,
        Self::Skunk,
        Self::Rat,
        Self::Panda,
        Self::Monkey,
        Self::Frog,
        Self::Spider,
        Self::Duck,
        Self::Bug,
        Self::Bear,
        Self::Bird,
    ];

    /// Stable storage name, also the value matched by species filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Octopus => "octopus",
            Self::Squirrel => "squirrel",
            Self::Squid => "squid",
            Self::Penguin => "penguin",
            Self::Seal => "seal",
            Self::Snake => "snake",
            Self::Fish => "fish",
            Self::Owl => "owl",
            Self::Chameleon => "chameleon",
            Self::Fox => "fox",
            Self::Pig => "pig",
            Self::Tiger => "tiger",
            Self::Cow => "cow",
            Self::Wolf => "wolf",
            Self::Skunk => "skunk",
            Self::Rat => "rat",
            Self::Panda => "panda",
            Self::Monkey => "monkey",
            Self::Frog => "frog",
            Self::Spider => "spider",
            Self::Duck => "duck",
            Self::Bug => "bug",
            Self::Bear => "bear",
            Self::Bird => "bird",
        }
    }

    /// Parses a stored species name back into the enum.
    pub fn parse(value: &str) -> Option<Species> {
        Self::ALL
            .iter()
            .copied()
            .find(|species| species.as_str() == value)
    }
}

/// Detached pet snapshot.
///
/// `owner_name` is only populated by adopted-pet listings, where the owner
/// row is joined inside the same read transaction for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Stable global ID, generated at creation.
    pub id: PetId,
    pub name: String,
    /// Age in years. Non-negative for every persisted pet.
    pub age: i64,
    pub species: Species,
    /// Opaque image reference resolved by the UI layer.
    pub image: Option<String>,
    /// Owning owner, when adopted.
    pub owner_id: Option<OwnerId>,
    /// Owner display name, denormalized for adopted-pet listings.
    pub owner_name: Option<String>,
}

impl Pet {
    /// Creates an unowned pet snapshot with a generated stable ID.
    pub fn new(name: impl Into<String>, age: i64, species: Species, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            species,
            image,
            owner_id: None,
            owner_name: None,
        }
    }

    /// Adoption state, derived from the owner reference.
    pub fn is_adopted(&self) -> bool {
        self.owner_id.is_some()
    }

    /// Checks write-path input constraints.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyPetName);
        }
        if self.age < 0 {
            return Err(CatalogValidationError::NegativeAge(self.age));
        }
        Ok(())
    }
}
