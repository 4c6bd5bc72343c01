//! Catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the owner/pet catalog operations over canonical storage.
//! - Enforce referential integrity between owners and pets on every write.
//!
//! # Invariants
//! - Input validation runs before any store access; a rejected input is
//!   never partially applied.
//! - Each operation is one transaction. Multi-record mutations (adoption,
//!   cascade delete) either commit both sides of the owner/pet relation or
//!   neither.
//! - Snapshots returned to callers are mapped inside the transaction that
//!   performed the query.

use crate::db::DbError;
use crate::db::migrations::latest_version;
use crate::model::owner::{Owner, OwnerId};
use crate::model::pet::{Pet, PetId, Species};
use crate::model::CatalogValidationError;
use crate::repo::snapshot;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_TABLES: &[&str] = &["owners", "pets"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CatalogValidationError),
    Db(DbError),
    OwnerNotFound(OwnerId),
    PetNotFound(PetId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::OwnerNotFound(id) => write!(f, "owner not found: {id}"),
            Self::PetNotFound(id) => write!(f, "pet not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not initialized to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogValidationError> for RepoError {
    fn from(value: CatalogValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Catalog data-access contract.
///
/// Every operation is atomic: it either fully applies or leaves the store
/// in its pre-call state.
pub trait CatalogRepository {
    fn add_owner(&self, name: &str, image: Option<&str>) -> RepoResult<Owner>;
    fn update_owner(&self, owner_id: OwnerId, name: &str, image: Option<&str>) -> RepoResult<()>;
    fn get_owners(&self) -> RepoResult<Vec<Owner>>;
    fn get_owner(&self, owner_id: OwnerId) -> RepoResult<Owner>;
    fn add_pet(
        &self,
        name: &str,
        age: i64,
        species: Species,
        image: Option<&str>,
    ) -> RepoResult<Pet>;
    fn get_pets_to_adopt(&self) -> RepoResult<Vec<Pet>>;
    fn get_adopted_pets(&self) -> RepoResult<Vec<Pet>>;
    fn adopt_pet(&self, pet_id: PetId, owner_id: OwnerId) -> RepoResult<()>;
    fn delete_owner(&self, owner_id: OwnerId) -> RepoResult<()>;
    fn delete_pet(&self, pet_id: PetId) -> RepoResult<()>;
    fn get_filtered_pets(&self, species_prefix: &str) -> RepoResult<Vec<Pet>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Wraps a bootstrapped connection after checking its schema state.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when the schema lacks a catalog table.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        for &table in REQUIRED_TABLES {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(
                    SELECT 1
                    FROM sqlite_master
                    WHERE type = 'table' AND name = ?1
                );",
                [table],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn add_owner(&self, name: &str, image: Option<&str>) -> RepoResult<Owner> {
        let owner = Owner::new(name, image.map(str::to_string));
        owner.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO owners (uuid, name, image) VALUES (?1, ?2, ?3);",
            params![owner.id.to_string(), owner.name.as_str(), owner.image.as_deref()],
        )?;
        tx.commit()?;

        Ok(owner)
    }

    fn update_owner(&self, owner_id: OwnerId, name: &str, image: Option<&str>) -> RepoResult<()> {
        if name.trim().is_empty() {
            return Err(CatalogValidationError::EmptyOwnerName.into());
        }

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE owners
             SET
                name = ?1,
                image = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![name, image, owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::OwnerNotFound(owner_id));
        }
        tx.commit()?;

        Ok(())
    }

    fn get_owners(&self) -> RepoResult<Vec<Owner>> {
        let tx = self.conn.unchecked_transaction()?;
        let owners = {
            // BINARY collation keeps the name ordering a case-sensitive
            // ordinal compare; uuid breaks ties deterministically.
            let mut stmt = tx.prepare(&format!(
                "{} ORDER BY name ASC, uuid ASC;",
                snapshot::OWNER_SELECT_SQL
            ))?;
            let mut rows = stmt.query([])?;

            let mut owners = Vec::new();
            while let Some(row) = rows.next()? {
                owners.push(snapshot::owner_from_row(&tx, row)?);
            }
            owners
        };
        tx.commit()?;

        Ok(owners)
    }

    fn get_owner(&self, owner_id: OwnerId) -> RepoResult<Owner> {
        let tx = self.conn.unchecked_transaction()?;
        let owner = {
            let mut stmt = tx.prepare(&format!(
                "{} WHERE uuid = ?1;",
                snapshot::OWNER_SELECT_SQL
            ))?;
            let mut rows = stmt.query([owner_id.to_string()])?;
            match rows.next()? {
                Some(row) => snapshot::owner_from_row(&tx, row)?,
                None => return Err(RepoError::OwnerNotFound(owner_id)),
            }
        };
        tx.commit()?;

        Ok(owner)
    }

    fn add_pet(
        &self,
        name: &str,
        age: i64,
        species: Species,
        image: Option<&str>,
    ) -> RepoResult<Pet> {
        let pet = Pet::new(name, age, species, image.map(str::to_string));
        pet.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO pets (uuid, name, age, species, image, owner_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL);",
            params![
                pet.id.to_string(),
                pet.name.as_str(),
                pet.age,
                pet.species.as_str(),
                pet.image.as_deref(),
            ],
        )?;
        tx.commit()?;

        Ok(pet)
    }

    fn get_pets_to_adopt(&self) -> RepoResult<Vec<Pet>> {
        let tx = self.conn.unchecked_transaction()?;
        let pets = {
            let mut stmt = tx.prepare(&format!(
                "{} WHERE owner_uuid IS NULL;",
                snapshot::PET_SELECT_SQL
            ))?;
            let mut rows = stmt.query([])?;

            let mut pets = Vec::new();
            while let Some(row) = rows.next()? {
                pets.push(snapshot::pet_from_row(row)?);
            }
            pets
        };
        tx.commit()?;

        Ok(pets)
    }

    fn get_adopted_pets(&self) -> RepoResult<Vec<Pet>> {
        let tx = self.conn.unchecked_transaction()?;
        let pets = {
            let mut stmt = tx.prepare(&format!(
                "{} WHERE pets.owner_uuid IS NOT NULL
                 ORDER BY pets.name ASC, pets.uuid ASC;",
                snapshot::ADOPTED_PET_SELECT_SQL
            ))?;
            let mut rows = stmt.query([])?;

            let mut pets = Vec::new();
            while let Some(row) = rows.next()? {
                pets.push(snapshot::adopted_pet_from_row(row)?);
            }
            pets
        };
        tx.commit()?;

        Ok(pets)
    }

    fn adopt_pet(&self, pet_id: PetId, owner_id: OwnerId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        // Both identities are checked before any mutation so a missing one
        // never leaves a half-applied adoption.
        if !pet_exists(&tx, pet_id)? {
            return Err(RepoError::PetNotFound(pet_id));
        }
        if !owner_exists(&tx, owner_id)? {
            return Err(RepoError::OwnerNotFound(owner_id));
        }

        // Ownership is stored single-sided; reassigning it detaches the pet
        // from any previous owner in the same write.
        tx.execute(
            "UPDATE pets
             SET
                owner_uuid = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![owner_id.to_string(), pet_id.to_string()],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn delete_owner(&self, owner_id: OwnerId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        if !owner_exists(&tx, owner_id)? {
            return Err(RepoError::OwnerNotFound(owner_id));
        }

        // Cascade: owned pets go first, then the owner, in one transaction.
        tx.execute(
            "DELETE FROM pets WHERE owner_uuid = ?1;",
            [owner_id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM owners WHERE uuid = ?1;",
            [owner_id.to_string()],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn delete_pet(&self, pet_id: PetId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM pets WHERE uuid = ?1;", [pet_id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PetNotFound(pet_id));
        }
        tx.commit()?;

        Ok(())
    }

    fn get_filtered_pets(&self, species_prefix: &str) -> RepoResult<Vec<Pet>> {
        let tx = self.conn.unchecked_transaction()?;
        let pets = {
            // substr comparison instead of LIKE: SQLite LIKE is ASCII
            // case-insensitive, the species filter must match ordinally.
            let mut stmt = tx.prepare(&format!(
                "{} WHERE owner_uuid IS NULL
                 AND substr(species, 1, length(?1)) = ?1;",
                snapshot::PET_SELECT_SQL
            ))?;
            let mut rows = stmt.query([species_prefix])?;

            let mut pets = Vec::new();
            while let Some(row) = rows.next()? {
                pets.push(snapshot::pet_from_row(row)?);
            }
            pets
        };
        tx.commit()?;

        Ok(pets)
    }
}

fn owner_exists(conn: &Connection, owner_id: OwnerId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM owners WHERE uuid = ?1);",
        [owner_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn pet_exists(conn: &Connection, pet_id: PetId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pets WHERE uuid = ?1);",
        [pet_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
