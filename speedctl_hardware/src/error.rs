use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("pwm error: {0}")]
    Pwm(String),
    #[error("gpio unavailable: {0}")]
    Unavailable(String),
    #[error("pwm frequency must be positive and finite, got {0}")]
    InvalidFrequency(f64),
}

pub type Result<T> = std::result::Result<T, HwError>;
