//! Error types.
//!
//! Structural errors are fatal for the operation that raised them and are
//! returned synchronously to its caller. Usage mistakes that can degrade to a
//! no-op are logged with `tracing::warn!` instead.

use thiserror::Error;

use crate::types::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid node: {0} is not registered")]
    InvalidNode(NodeId),

    #[error("invalid root node: the root must be a scene root context")]
    InvalidRoot,

    #[error("an existing engine instance is already being mounted")]
    EngineBusy,

    #[error("invalid call outside of a mounting engine instance")]
    NotMounting,

    #[error("surface does not support 2D rendering")]
    Unsupported2d,

    #[error("no scene root is declared")]
    MissingRoot,

    #[error("{0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;
