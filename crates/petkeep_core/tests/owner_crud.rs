use petkeep_core::db::open_db_in_memory;
use petkeep_core::{
    CatalogRepository, CatalogValidationError, RepoError, Species, SqliteCatalogRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn add_and_get_owner_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let created = repo.add_owner("Amy", Some("amy.png")).unwrap();
    assert_eq!(created.name, "Amy");
    assert_eq!(created.image.as_deref(), Some("amy.png"));
    assert!(created.pets.is_empty());
    assert_eq!(created.number_of_pets, 0);

    let loaded = repo.get_owner(created.id).unwrap();
    assert_eq!(loaded.id, created.id);
    assert_eq!(loaded.name, "Amy");
    assert_eq!(loaded.image.as_deref(), Some("amy.png"));
    assert_eq!(loaded.number_of_pets, 0);
}

#[test]
fn add_owner_rejects_empty_name_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let err = repo.add_owner("   ", None).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(CatalogValidationError::EmptyOwnerName)
    ));
    assert!(repo.get_owners().unwrap().is_empty());
}

#[test]
fn update_owner_changes_name_and_image() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let owner = repo.add_owner("Amy", None).unwrap();
    repo.update_owner(owner.id, "Amelia", Some("amelia.png"))
        .unwrap();

    let loaded = repo.get_owner(owner.id).unwrap();
    assert_eq!(loaded.name, "Amelia");
    assert_eq!(loaded.image.as_deref(), Some("amelia.png"));
}

#[test]
fn update_unknown_owner_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let unknown = Uuid::new_v4();
    let err = repo.update_owner(unknown, "Nobody", None).unwrap_err();
    assert!(matches!(err, RepoError::OwnerNotFound(id) if id == unknown));
}

#[test]
fn get_unknown_owner_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let unknown = Uuid::new_v4();
    let err = repo.get_owner(unknown).unwrap_err();
    assert!(matches!(err, RepoError::OwnerNotFound(id) if id == unknown));
}

#[test]
fn get_owners_sorts_by_name_ascending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    repo.add_owner("Zoe", None).unwrap();
    repo.add_owner("Amy", None).unwrap();
    repo.add_owner("Max", None).unwrap();

    let names: Vec<String> = repo
        .get_owners()
        .unwrap()
        .into_iter()
        .map(|owner| owner.name)
        .collect();
    assert_eq!(names, ["Amy", "Max", "Zoe"]);
}

#[test]
fn owner_name_ordering_is_case_sensitive_ordinal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    repo.add_owner("amy", None).unwrap();
    repo.add_owner("Zoe", None).unwrap();

    // Ordinal compare puts uppercase before lowercase.
    let names: Vec<String> = repo
        .get_owners()
        .unwrap()
        .into_iter()
        .map(|owner| owner.name)
        .collect();
    assert_eq!(names, ["Zoe", "amy"]);
}

#[test]
fn number_of_pets_reflects_live_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let owner = repo.add_owner("Amy", None).unwrap();
    let rex = repo.add_pet("Rex", 3, Species::Dog, None).unwrap();
    let milo = repo.add_pet("Milo", 1, Species::Cat, None).unwrap();
    repo.adopt_pet(rex.id, owner.id).unwrap();
    repo.adopt_pet(milo.id, owner.id).unwrap();

    for listed in repo.get_owners().unwrap() {
        assert_eq!(listed.number_of_pets, listed.pets.len() as u64);
        assert_eq!(listed.number_of_pets, 2);
    }

    repo.delete_pet(rex.id).unwrap();
    let reloaded = repo.get_owner(owner.id).unwrap();
    assert_eq!(reloaded.number_of_pets, 1);
    assert_eq!(reloaded.pets[0].id, milo.id);
}

#[test]
fn delete_owner_removes_it_from_listings() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let owner = repo.add_owner("Amy", None).unwrap();
    repo.delete_owner(owner.id).unwrap();

    assert!(repo.get_owners().unwrap().is_empty());
    let err = repo.get_owner(owner.id).unwrap_err();
    assert!(matches!(err, RepoError::OwnerNotFound(id) if id == owner.id));
}

#[test]
fn delete_unknown_owner_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let unknown = Uuid::new_v4();
    let err = repo.delete_owner(unknown).unwrap_err();
    assert!(matches!(err, RepoError::OwnerNotFound(id) if id == unknown));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteCatalogRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();

    let result = SqliteCatalogRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("owners"))
    ));
}

#[test]
fn owner_snapshot_serializes_with_stable_field_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();

    let owner = repo.add_owner("Amy", None).unwrap();
    let pet = repo.add_pet("Rex", 3, Species::Dog, None).unwrap();
    repo.adopt_pet(pet.id, owner.id).unwrap();

    let json = serde_json::to_value(repo.get_owner(owner.id).unwrap()).unwrap();
    assert_eq!(json["name"], "Amy");
    assert_eq!(json["number_of_pets"], 1);
    assert_eq!(json["pets"][0]["species"], "dog");
}
