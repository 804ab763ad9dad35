//! The module contains the errors the engine can throw.
//!
//! Only [`DuplicateRedeemCode`] is part of the ledger contract: inserting a
//! coupon whose non-blank redeem code is already taken. Mutations that target
//! a missing coupon are silent no-ops and never surface as errors.
//!
//!  [`DuplicateRedeemCode`]: EngineError::DuplicateRedeemCode
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("A coupon with redeem code \"{0}\" already exists")]
    DuplicateRedeemCode(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Corrupt history entry: {0}")]
    CorruptHistory(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateRedeemCode(a), Self::DuplicateRedeemCode(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::CorruptHistory(a), Self::CorruptHistory(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
