use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid value for {key}: {message}")]
    InvalidConfig { key: String, message: String },
}
