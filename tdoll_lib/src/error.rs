//! Error types for the library layer.

use thiserror::Error;

/// A field could not be read from a character page.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No node matched the field's selector.
    #[error("{field}: no element matches `{selector}`")]
    Missing {
        field: &'static str,
        selector: String,
    },
    /// The node was found but lacks the attribute the field is read from.
    #[error("{field}: element has no `{attr}` attribute")]
    MissingAttr {
        field: &'static str,
        attr: &'static str,
    },
    /// Text that should be a number is not.
    #[error("{field}: cannot parse {raw:?} as a number")]
    InvalidNumber { field: &'static str, raw: String },
    #[error("unknown weapon class {0:?}")]
    UnknownWeaponClass(String),
    /// The text was found but does not have the expected layout.
    #[error("{field}: {reason}")]
    Malformed {
        field: &'static str,
        reason: String,
    },
    #[error("invalid selector `{0}`")]
    Selector(String),
}

/// Anything that aborts the processing of one character, or of the run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Api(#[from] gfwiki_api::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
