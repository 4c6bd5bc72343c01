//! Asynchronous operation status protocol.
//!
//! # Responsibility
//! - Give every catalog operation a uniform lifecycle: `Loading` first,
//!   then exactly one terminal status.
//! - Carry failures as values instead of throwing them across the
//!   background-worker boundary.
//!
//! # Invariants
//! - A stream delivers `Loading` before its terminal status.
//! - Exactly one terminal status follows; the stream then ends.

use crate::repo::catalog_repo::{RepoError, RepoResult};
use crossbeam_channel::Receiver;

/// Lifecycle of one catalog operation as observed by its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus<T> {
    /// Emitted immediately when the operation is issued.
    Loading,
    Success(T),
    /// A referenced identity was absent at transaction time.
    NotFound(String),
    /// Malformed input rejected before any store access.
    ValidationError(String),
    /// Store unavailable, I/O failure, or corrupt persisted state.
    StoreError(String),
}

impl<T> OperationStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Terminal statuses are final; nothing follows them on a stream.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub(crate) fn from_result(result: RepoResult<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(RepoError::Validation(err)) => Self::ValidationError(err.to_string()),
            Err(err @ (RepoError::OwnerNotFound(_) | RepoError::PetNotFound(_))) => {
                Self::NotFound(err.to_string())
            }
            Err(other) => Self::StoreError(other.to_string()),
        }
    }
}

/// Receiving end of one operation's status channel.
///
/// Dropping the stream is advisory cancellation only: the operation still
/// runs to completion or rollback on the worker.
pub struct StatusStream<T> {
    statuses: Receiver<OperationStatus<T>>,
}

impl<T> StatusStream<T> {
    pub(crate) fn new(statuses: Receiver<OperationStatus<T>>) -> Self {
        Self { statuses }
    }

    /// Blocks for the next status; `None` once the stream has ended.
    pub fn recv(&self) -> Option<OperationStatus<T>> {
        self.statuses.recv().ok()
    }

    /// Blocks until the terminal status and returns it.
    ///
    /// A stream whose worker vanished before delivering a terminal status
    /// reports that as a `StoreError` rather than completing silently.
    pub fn wait(self) -> OperationStatus<T> {
        while let Some(status) = self.recv() {
            if status.is_terminal() {
                return status;
            }
        }
        OperationStatus::StoreError("status stream ended without a terminal status".to_string())
    }
}

impl<T> Iterator for StatusStream<T> {
    type Item = OperationStatus<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.statuses.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::OperationStatus;
    use crate::model::CatalogValidationError;
    use crate::repo::catalog_repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn loading_is_not_terminal() {
        let status: OperationStatus<()> = OperationStatus::Loading;
        assert!(status.is_loading());
        assert!(!status.is_terminal());
    }

    #[test]
    fn results_map_onto_the_status_taxonomy() {
        assert_eq!(
            OperationStatus::from_result(Ok(7)),
            OperationStatus::Success(7)
        );

        let validation: OperationStatus<i32> = OperationStatus::from_result(Err(
            RepoError::Validation(CatalogValidationError::NegativeAge(-3)),
        ));
        assert!(matches!(validation, OperationStatus::ValidationError(_)));

        let missing: OperationStatus<i32> =
            OperationStatus::from_result(Err(RepoError::OwnerNotFound(Uuid::new_v4())));
        assert!(matches!(missing, OperationStatus::NotFound(_)));

        let store: OperationStatus<i32> =
            OperationStatus::from_result(Err(RepoError::InvalidData("bad row".to_string())));
        assert!(matches!(store, OperationStatus::StoreError(_)));
    }
}
