use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("catalog contains no media items")]
    EmptyCatalog,

    #[error("range start {start} is after range end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("{0} is outside the selectable range")]
    DateOutOfRange(NaiveDate),

    #[error("item index {index} out of bounds for catalog of {len}")]
    ItemOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
