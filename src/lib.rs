pub mod application;
pub mod domain;
pub mod handlers;
pub mod infrastructure;
pub mod server;

// Re-export commonly used types
pub use application::{SubmissionError, SubmissionScope, SubmitUseCase};
pub use domain::{DocumentType, NewSubmission, SubmissionRecord};
pub use infrastructure::database::{SqliteRepository, SubmissionRepository};
