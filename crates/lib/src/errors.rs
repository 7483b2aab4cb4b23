use thiserror::Error;

/// Custom error types for the support assistant.
#[derive(Error, Debug)]
pub enum SupportError {
    /// Caller input failed a required-field check. The message is shown to the user as-is.
    #[error("{0}")]
    Validation(String),
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("Storage provider is not configured")]
    MissingStorageProvider,
    #[error("Invalid prompt template: {0}")]
    InvalidPromptTemplate(String),
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider returned a malformed response: {0}")]
    AiMalformedResponse(String),
    #[error("Storage provider connection error: {0}")]
    StorageConnection(String),
    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),
    #[error("Knowledge base has {records} records, above the grounding limit of {limit}")]
    KnowledgeBaseTooLarge { records: usize, limit: usize },
    /// An error reported by a remote support server, as seen by a client.
    #[error("{0}")]
    Remote(String),
}

/// The broad category an error belongs to. Determines how it is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Recoverable by re-prompting the user.
    Validation,
    /// A required credential or setting is absent. Not recoverable by the user.
    Configuration,
    /// The knowledge base or lead store failed.
    Collaborator,
    /// The generation provider failed or returned unusable output.
    Provider,
}

impl SupportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SupportError::Validation(_) => ErrorKind::Validation,
            SupportError::MissingAiProvider(_)
            | SupportError::MissingStorageProvider
            | SupportError::InvalidPromptTemplate(_) => ErrorKind::Configuration,
            SupportError::StorageConnection(_)
            | SupportError::StorageOperationFailed(_)
            | SupportError::KnowledgeBaseTooLarge { .. } => ErrorKind::Collaborator,
            SupportError::ReqwestClientBuild(_)
            | SupportError::AiRequest(_)
            | SupportError::AiDeserialization(_)
            | SupportError::AiApi(_)
            | SupportError::AiMalformedResponse(_)
            | SupportError::Remote(_) => ErrorKind::Provider,
        }
    }
}

impl From<turso::Error> for SupportError {
    fn from(err: turso::Error) -> Self {
        SupportError::StorageOperationFailed(err.to_string())
    }
}
