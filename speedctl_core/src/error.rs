use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ControlError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("hardware bring-up failed: {0}")]
    BringUp(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing actuator")]
    MissingActuator,
    #[error("missing display")]
    MissingDisplay,
    #[error("missing encoder")]
    MissingEncoder,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
