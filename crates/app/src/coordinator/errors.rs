//! Coordinator errors.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use partlist::{costs::CostError, parts::ValidationError};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{detail}")]
    RemoteRejection { status: StatusCode, detail: String },

    #[error("could not reach the parts store")]
    TransportFailure(#[source] StoreError),

    #[error("the parts store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("the change was saved but the parts could not be reloaded")]
    Reconcile(#[source] Box<CoordinatorError>),

    #[error(transparent)]
    Cost(#[from] CostError),
}

impl From<StoreError> for CoordinatorError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Rejected { status, detail } => Self::RemoteRejection { status, detail },
            StoreError::Transport(_) | StoreError::Decode(_) => Self::TransportFailure(error),
        }
    }
}
