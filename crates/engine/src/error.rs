//! The module contains the errors the engine can return.
//!
//! Every variant belongs to one [`ErrorKind`], so callers can tell bad input
//! from a missing record from a broken database without parsing messages:
//!
//! - [`InvalidInput`] thrown when a field is malformed or out of range.
//! - [`EssenceNotFound`], [`ContainerNotFound`], [`SaleNotFound`] thrown when
//!   an id does not resolve.
//! - [`InsufficientStock`] and [`CapacityExceeded`] thrown by the sale engine.
//! - [`Database`] and [`Corrupted`] thrown when storage is unusable.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`EssenceNotFound`]: EngineError::EssenceNotFound
//!  [`ContainerNotFound`]: EngineError::ContainerNotFound
//!  [`SaleNotFound`]: EngineError::SaleNotFound
//!  [`InsufficientStock`]: EngineError::InsufficientStock
//!  [`CapacityExceeded`]: EngineError::CapacityExceeded
//!  [`Database`]: EngineError::Database
//!  [`Corrupted`]: EngineError::Corrupted
use rust_decimal::Decimal;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("essence \"{0}\" not found!")]
    EssenceNotFound(String),
    #[error("container \"{0}\" not found!")]
    ContainerNotFound(String),
    #[error("sale \"{0}\" not found!")]
    SaleNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Insufficient stock for {item}: available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        available: Decimal,
        requested: Decimal,
    },
    #[error("Capacity exceeded for container {container}: capacity {capacity} ml, requested {requested} ml")]
    CapacityExceeded {
        container: String,
        capacity: Decimal,
        requested: Decimal,
    },
    #[error("Corrupted record: {0}")]
    Corrupted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    InsufficientStock,
    CapacityExceeded,
    Storage,
}

impl ErrorKind {
    /// Storage failures are worth a retry; every other kind needs new input.
    #[must_use]
    pub const fn is_storage(self) -> bool {
        matches!(self, Self::Storage)
    }
}

impl EngineError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::EssenceNotFound(_) | Self::ContainerNotFound(_) | Self::SaleNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::ExistingKey(_) => ErrorKind::AlreadyExists,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::Corrupted(_) | Self::Database(_) => ErrorKind::Storage,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::EssenceNotFound(a), Self::EssenceNotFound(b)) => a == b,
            (Self::ContainerNotFound(a), Self::ContainerNotFound(b)) => a == b,
            (Self::SaleNotFound(a), Self::SaleNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (
                Self::InsufficientStock {
                    item: a,
                    available: a_av,
                    requested: a_req,
                },
                Self::InsufficientStock {
                    item: b,
                    available: b_av,
                    requested: b_req,
                },
            ) => a == b && a_av == b_av && a_req == b_req,
            (
                Self::CapacityExceeded {
                    container: a,
                    capacity: a_cap,
                    requested: a_req,
                },
                Self::CapacityExceeded {
                    container: b,
                    capacity: b_cap,
                    requested: b_req,
                },
            ) => a == b && a_cap == b_cap && a_req == b_req,
            (Self::Corrupted(a), Self::Corrupted(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
