/// Storage errors for the domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository.read")]
    Read,
    #[error("repository.parse")]
    Parse,
    #[error("repository.write")]
    Write,
}

impl RepositoryError {
    pub fn read() -> Self {
        RepositoryError::Read
    }
    pub fn parse() -> Self {
        RepositoryError::Parse
    }
    pub fn write() -> Self {
        RepositoryError::Write
    }
}
