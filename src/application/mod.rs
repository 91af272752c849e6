mod scope;
mod submit;
mod types;

pub use scope::SubmissionScope;
pub use submit::{SubmissionError, SubmitUseCase};
pub use types::{ErrorResponse, SubmissionRequest};
