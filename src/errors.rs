use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("Parse decimal error: {0}")]
    ParseDecimal(#[from] bigdecimal::ParseBigDecimalError),

    #[error("Invalid liquidity value {value:?}: {reason}")]
    InvalidLiquidity { value: String, reason: String },

    #[error("Tick spacing must be positive, got {0}")]
    InvalidTickSpacing(i32),

    #[error("Outcome token {0} is neither token0 nor token1 of the pool")]
    UnknownOutcomeToken(Address),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
