use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of document categories a submission can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    Dl,
    VoterId,
    Face,
    DigiLocker,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown document type: {0}")]
pub struct UnknownDocumentType(pub String);

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Aadhaar,
        DocumentType::Pan,
        DocumentType::Dl,
        DocumentType::VoterId,
        DocumentType::Face,
        DocumentType::DigiLocker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Aadhaar => "aadhaar",
            DocumentType::Pan => "pan",
            DocumentType::Dl => "dl",
            DocumentType::VoterId => "voterid",
            DocumentType::Face => "face",
            DocumentType::DigiLocker => "digilocker",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDocumentType(s.to_string()))
    }
}

/// Insert payload for the document store, after tag resolution and
/// `idNumber` coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub document_type: DocumentType,
    pub id_number: String,
    pub file_name: Option<String>,
    pub file_data: Option<String>,
}

impl NewSubmission {
    /// Placeholder stored when the client leaves out the id number.
    pub const MISSING_ID_NUMBER: &'static str = "N/A";

    pub fn new(
        name: impl Into<String>,
        document_type: DocumentType,
        id_number: Option<String>,
    ) -> Self {
        let id_number = id_number
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| Self::MISSING_ID_NUMBER.to_string());

        Self {
            name: name.into(),
            document_type,
            id_number,
            file_name: None,
            file_data: None,
        }
    }

    pub fn with_file(mut self, file_name: Option<String>, file_data: Option<String>) -> Self {
        self.file_name = file_name;
        self.file_data = file_data;
        self
    }
}

/// A persisted submission. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: String,
    pub name: String,
    pub document_type: DocumentType,
    pub id_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Base64 data URI of the uploaded or captured file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn from_new(new: &NewSubmission) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.clone(),
            document_type: new.document_type,
            id_number: new.id_number.clone(),
            file_name: new.file_name.clone(),
            file_data: new.file_data.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
