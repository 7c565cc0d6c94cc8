use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}
