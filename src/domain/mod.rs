mod submission;

pub use submission::{DocumentType, NewSubmission, SubmissionRecord, UnknownDocumentType};
