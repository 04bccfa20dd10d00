//! Error kinds raised by the scene graph, the serializer and the settings layer.
//!
//! Every variant is a local, recoverable condition. Callers surface
//! `MalformedDocument` to the user and otherwise keep going.

use thiserror::Error;

use crate::connection::ConnectionId;
use crate::model::ShapeId;

#[derive(Error, Debug)]
pub enum DiagramError {
    /// A referenced shape id is not present in the document.
    #[error("shape {0} not found")]
    ShapeNotFound(ShapeId),

    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    /// Self-loop connection request.
    #[error("invalid connection from {start} to {end}")]
    InvalidConnection { start: ShapeId, end: ShapeId },

    /// Candidate bounds would violate the minimum frame size.
    #[error("invalid resize to {width}x{height}")]
    InvalidResize { width: f32, height: f32 },

    /// Only frames carry resize handles.
    #[error("shape {0} cannot be resized")]
    NotResizable(ShapeId),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, DiagramError>;

impl From<serde_json::Error> for DiagramError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            DiagramError::Io(err.into())
        } else {
            DiagramError::MalformedDocument(err.to_string())
        }
    }
}
