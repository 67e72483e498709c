#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidPool(String),
    #[error("{0}")]
    InvalidBlueprint(String),
    #[error("{0}")]
    InvalidCatalog(String),
}
