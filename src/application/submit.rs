use crate::application::{SubmissionRequest, SubmissionScope};
use crate::domain::{NewSubmission, SubmissionRecord};
use crate::infrastructure::database::{DatabaseError, SubmissionRepository};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Invalid documentType")]
    InvalidDocumentType,

    #[error("{0}")]
    SchemaValidation(String),

    /// Infrastructure fault. The cause is logged where it happens and never
    /// carried to the caller.
    #[error("Storage failure")]
    Storage,
}

impl SubmissionError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SubmissionError::Storage)
    }
}

/// Create and list submissions within one scope.
#[derive(Clone)]
pub struct SubmitUseCase {
    repository: Arc<dyn SubmissionRepository>,
}

impl SubmitUseCase {
    pub fn new(repository: Arc<dyn SubmissionRepository>) -> Self {
        Self { repository }
    }

    pub fn create(
        &self,
        scope: &SubmissionScope,
        request: SubmissionRequest,
    ) -> Result<SubmissionRecord, SubmissionError> {
        let document_type = scope.resolve(request.document_type.as_deref())?;

        let submission = NewSubmission::new(
            request.name.unwrap_or_default(),
            document_type,
            request.id_number,
        )
        .with_file(request.file_name, request.file_data);

        match self.repository.insert(&submission) {
            Ok(record) => Ok(record),
            Err(DatabaseError::SchemaValidation(reason)) => {
                tracing::warn!(scope = scope.label, %reason, "submission failed schema validation");
                Err(SubmissionError::SchemaValidation(reason))
            }
            Err(e) => {
                tracing::error!(scope = scope.label, error = %e, "failed to save submission");
                Err(SubmissionError::Storage)
            }
        }
    }

    pub fn list(&self, scope: &SubmissionScope) -> Result<Vec<SubmissionRecord>, SubmissionError> {
        self.repository.find_all(scope.filter()).map_err(|e| {
            tracing::error!(scope = scope.label, error = %e, "failed to fetch submissions");
            SubmissionError::Storage
        })
    }

    pub fn count(&self) -> Result<usize, SubmissionError> {
        self.repository.count().map_err(|e| {
            tracing::error!(error = %e, "failed to count submissions");
            SubmissionError::Storage
        })
    }
}
