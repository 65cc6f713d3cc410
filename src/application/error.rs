use thiserror::Error;

use crate::domain::CardError;

#[derive(Error, Debug)]
pub enum AppError {
    /// Domain rejection: balance limit exceeded or insufficient funds. The
    /// card is unchanged; the caller may correct the precondition and
    /// retry.
    #[error(transparent)]
    Card(#[from] CardError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid zone {0}: zones are numbered from 1")]
    InvalidZone(u32),
}
