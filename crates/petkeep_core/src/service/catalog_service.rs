//! Catalog use-case service with background execution.
//!
//! # Responsibility
//! - Execute every repository call on a dedicated worker thread owning the
//!   store connection; callers never touch the store on their own thread.
//! - Drive the operation status protocol: `Loading` immediately, then one
//!   terminal status once the transaction finishes.
//!
//! # Invariants
//! - Jobs run in submission order on a single worker; the store's own
//!   transaction serialization is the only mutual exclusion.
//! - Dropping a caller's status stream never aborts a running transaction.
//! - Dropping the service closes the queue, drains outstanding jobs, and
//!   joins the worker.

use crate::db::{self, DbResult};
use crate::model::owner::{Owner, OwnerId};
use crate::model::pet::{Pet, PetId, Species};
use crate::repo::catalog_repo::{CatalogRepository, RepoResult, SqliteCatalogRepository};
use crate::status::{OperationStatus, StatusStream};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce(&Connection) + Send>;

/// Asynchronous facade over the catalog repository.
pub struct CatalogService {
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl CatalogService {
    /// Opens (and migrates) the database at `path`, then starts the worker.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::with_connection(db::open_db(path)?))
    }

    /// Opens an in-memory database, then starts the worker.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::with_connection(db::open_db_in_memory()?))
    }

    /// Starts the service over an already-bootstrapped connection.
    ///
    /// The connection moves onto the worker thread and serves every
    /// subsequent operation.
    pub fn with_connection(conn: Connection) -> Self {
        let (jobs, queue) = unbounded::<Job>();
        let worker = thread::spawn(move || worker_loop(conn, queue));
        info!("event=worker_start module=service status=ok");

        Self {
            jobs: Some(jobs),
            worker: Some(worker),
        }
    }

    pub fn add_owner(&self, name: &str, image: Option<&str>) -> StatusStream<Owner> {
        let name = name.to_string();
        let image = image.map(str::to_string);
        self.submit("add_owner", move |repo: &SqliteCatalogRepository<'_>| {
            repo.add_owner(&name, image.as_deref())
        })
    }

    pub fn update_owner(
        &self,
        owner_id: OwnerId,
        name: &str,
        image: Option<&str>,
    ) -> StatusStream<()> {
        let name = name.to_string();
        let image = image.map(str::to_string);
        self.submit("update_owner", move |repo: &SqliteCatalogRepository<'_>| {
            repo.update_owner(owner_id, &name, image.as_deref())
        })
    }

    pub fn get_owners(&self) -> StatusStream<Vec<Owner>> {
        self.submit("get_owners", |repo: &SqliteCatalogRepository<'_>| {
            repo.get_owners()
        })
    }

    pub fn get_owner(&self, owner_id: OwnerId) -> StatusStream<Owner> {
        self.submit("get_owner", move |repo: &SqliteCatalogRepository<'_>| {
            repo.get_owner(owner_id)
        })
    }

    pub fn add_pet(
        &self,
        name: &str,
        age: i64,
        species: Species,
        image: Option<&str>,
    ) -> StatusStream<Pet> {
        let name = name.to_string();
        let image = image.map(str::to_string);
        self.submit("add_pet", move |repo: &SqliteCatalogRepository<'_>| {
            repo.add_pet(&name, age, species, image.as_deref())
        })
    }

    pub fn get_pets_to_adopt(&self) -> StatusStream<Vec<Pet>> {
        self.submit("get_pets_to_adopt", |repo: &SqliteCatalogRepository<'_>| {
            repo.get_pets_to_adopt()
        })
    }

    pub fn get_adopted_pets(&self) -> StatusStream<Vec<Pet>> {
        self.submit("get_adopted_pets", |repo: &SqliteCatalogRepository<'_>| {
            repo.get_adopted_pets()
        })
    }

    pub fn adopt_pet(&self, pet_id: PetId, owner_id: OwnerId) -> StatusStream<()> {
        self.submit("adopt_pet", move |repo: &SqliteCatalogRepository<'_>| {
            repo.adopt_pet(pet_id, owner_id)
        })
    }

    pub fn delete_owner(&self, owner_id: OwnerId) -> StatusStream<()> {
        self.submit("delete_owner", move |repo: &SqliteCatalogRepository<'_>| {
            repo.delete_owner(owner_id)
        })
    }

    pub fn delete_pet(&self, pet_id: PetId) -> StatusStream<()> {
        self.submit("delete_pet", move |repo: &SqliteCatalogRepository<'_>| {
            repo.delete_pet(pet_id)
        })
    }

    pub fn get_filtered_pets(&self, species_prefix: &str) -> StatusStream<Vec<Pet>> {
        let species_prefix = species_prefix.to_string();
        self.submit(
            "get_filtered_pets",
            move |repo: &SqliteCatalogRepository<'_>| repo.get_filtered_pets(&species_prefix),
        )
    }

    fn submit<T, F>(&self, op_name: &'static str, op: F) -> StatusStream<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteCatalogRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let (statuses, stream) = unbounded();

        // Loading goes onto the channel before the job is queued, so the
        // caller always observes it first.
        let _ = statuses.send(OperationStatus::Loading);

        let terminal = statuses.clone();
        let job: Job = Box::new(move |conn| {
            debug!("event=op_run module=service op={op_name} status=start");
            let outcome = SqliteCatalogRepository::try_new(conn).and_then(|repo| op(&repo));
            // A dropped stream is advisory cancellation: the transaction
            // above already ran, the terminal send is simply unobserved.
            let _ = statuses.send(OperationStatus::from_result(outcome));
        });

        let queued = self
            .jobs
            .as_ref()
            .map(|queue| queue.send(job).is_ok())
            .unwrap_or(false);
        if !queued {
            warn!("event=op_submit module=service op={op_name} status=error error_code=worker_stopped");
            let _ = terminal.send(OperationStatus::StoreError(
                "catalog worker is no longer running".to_string(),
            ));
        }

        StatusStream::new(stream)
    }
}

impl Drop for CatalogService {
    fn drop(&mut self) {
        // Dropping the sender closes the queue; the worker drains what is
        // already queued and exits.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=worker_stop module=service status=error error_code=worker_panicked");
            } else {
                info!("event=worker_stop module=service status=ok");
            }
        }
    }
}

fn worker_loop(conn: Connection, queue: Receiver<Job>) {
    for job in queue.iter() {
        job(&conn);
    }
}
