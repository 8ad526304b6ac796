use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid console config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("could not encode TOML: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),
}
