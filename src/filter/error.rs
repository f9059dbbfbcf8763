use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid media type filter: {0} (expected all, movie, show or novel)")]
    InvalidMediaType(String),
}
