//! Row-to-snapshot mapping.
//!
//! # Responsibility
//! - Convert live store rows into detached [`Owner`] and [`Pet`] values.
//! - Traverse the owner/pet relation through the caller's open transaction,
//!   never after it.
//!
//! # Invariants
//! - Every helper takes the transaction connection that produced the row;
//!   no field access or relation traversal happens outside it.
//! - Corrupt persisted state is rejected as `InvalidData`, not masked.

use crate::model::owner::{Owner, OwnerId};
use crate::model::pet::{Pet, PetId, Species};
use crate::repo::catalog_repo::{RepoError, RepoResult};
use rusqlite::{Connection, Row};
use uuid::Uuid;

pub(crate) const OWNER_SELECT_SQL: &str = "SELECT uuid, name, image FROM owners";

pub(crate) const PET_SELECT_SQL: &str =
    "SELECT uuid, name, age, species, image, owner_uuid FROM pets";

pub(crate) const ADOPTED_PET_SELECT_SQL: &str = "SELECT
    pets.uuid,
    pets.name,
    pets.age,
    pets.species,
    pets.image,
    pets.owner_uuid,
    owners.name AS owner_name
FROM pets
JOIN owners ON owners.uuid = pets.owner_uuid";

/// Maps an owner row, materializing its pet set and live pet count through
/// the same transaction that selected the row.
pub(crate) fn owner_from_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Owner> {
    let id = parse_uuid(&row.get::<_, String>("uuid")?, "owners.uuid")?;
    let pets = pets_of_owner(conn, id)?;
    let number_of_pets = pets.len() as u64;

    let owner = Owner {
        id,
        name: row.get("name")?,
        image: row.get("image")?,
        pets,
        number_of_pets,
    };
    owner.validate()?;
    Ok(owner)
}

/// Maps a plain pet row. `owner_name` stays unset; listings that need it
/// join the owner row and use [`adopted_pet_from_row`].
pub(crate) fn pet_from_row(row: &Row<'_>) -> RepoResult<Pet> {
    let id: PetId = parse_uuid(&row.get::<_, String>("uuid")?, "pets.uuid")?;

    let species_text: String = row.get("species")?;
    let species = Species::parse(&species_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid species `{species_text}` in pets.species"))
    })?;

    let owner_id = match row.get::<_, Option<String>>("owner_uuid")? {
        Some(text) => Some(parse_uuid(&text, "pets.owner_uuid")?),
        None => None,
    };

    let pet = Pet {
        id,
        name: row.get("name")?,
        age: row.get("age")?,
        species,
        image: row.get("image")?,
        owner_id,
        owner_name: None,
    };
    pet.validate()?;
    Ok(pet)
}

/// Maps a pet row joined with its owner, denormalizing the owner name.
pub(crate) fn adopted_pet_from_row(row: &Row<'_>) -> RepoResult<Pet> {
    let mut pet = pet_from_row(row)?;
    pet.owner_name = Some(row.get("owner_name")?);
    Ok(pet)
}

fn pets_of_owner(conn: &Connection, owner_id: OwnerId) -> RepoResult<Vec<Pet>> {
    let mut stmt = conn.prepare(&format!(
        "{PET_SELECT_SQL} WHERE owner_uuid = ?1 ORDER BY name ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([owner_id.to_string()])?;

    let mut pets = Vec::new();
    while let Some(row) = rows.next()? {
        pets.push(pet_from_row(row)?);
    }
    Ok(pets)
}

fn parse_uuid(text: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}
