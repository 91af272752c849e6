use crate::application::SubmissionError;
use crate::domain::DocumentType;

/// One submission resource: the tags it accepts and, for the single-purpose
/// resources, the tag every stored record is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionScope {
    /// Singular noun for create failures ("Failed to save {label}").
    pub label: &'static str,
    /// Plural noun for list failures ("Failed to fetch {list_label}").
    pub list_label: &'static str,
    accepts: &'static [DocumentType],
    pinned: Option<DocumentType>,
}

impl SubmissionScope {
    /// Identity documents typed in by the user.
    pub const GENERAL: SubmissionScope = SubmissionScope {
        label: "submission",
        list_label: "submissions",
        accepts: &[
            DocumentType::Aadhaar,
            DocumentType::Pan,
            DocumentType::Dl,
            DocumentType::VoterId,
        ],
        pinned: None,
    };

    pub const FACE: SubmissionScope = SubmissionScope {
        label: "face data",
        list_label: "face data",
        accepts: &[DocumentType::Face],
        pinned: Some(DocumentType::Face),
    };

    pub const DIGILOCKER: SubmissionScope = SubmissionScope {
        label: "digilocker data",
        list_label: "digilocker data",
        accepts: &[DocumentType::DigiLocker],
        pinned: Some(DocumentType::DigiLocker),
    };

    /// Equality filter applied when listing. The general resource lists everything.
    pub fn filter(&self) -> Option<DocumentType> {
        self.pinned
    }

    /// Turn the caller-supplied tag into the tag that gets stored.
    ///
    /// The tag must name one of the known document types. A pinned scope then
    /// overwrites it with its own tag; an unpinned scope requires it to be in
    /// the accepted set.
    pub fn resolve(&self, raw: Option<&str>) -> Result<DocumentType, SubmissionError> {
        let requested: DocumentType = raw
            .ok_or(SubmissionError::InvalidDocumentType)?
            .parse()
            .map_err(|_| SubmissionError::InvalidDocumentType)?;

        match self.pinned {
            Some(pinned) => Ok(pinned),
            None if self.accepts.contains(&requested) => Ok(requested),
            None => Err(SubmissionError::InvalidDocumentType),
        }
    }
}
