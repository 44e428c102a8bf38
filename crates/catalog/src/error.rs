/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The RON source did not match the catalog schema.
    #[error("Catalog parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A colour field was not a `#rrggbb` hex string.
    #[error("Invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// Two records of the same kind share an id.
    #[error("Duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    /// A record points at a planet or project that does not exist.
    #[error("{owner} references missing {kind} {id:?}")]
    DanglingReference {
        owner: String,
        kind: &'static str,
        id: String,
    },
}
