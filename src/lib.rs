//! # Taskboard
//!
//! Scene model and geometry engine for a task diagram editor:
//!
//! - **geometry** - boundary intersection math used to anchor connection lines
//! - **model** - shape variants, task metadata, colours and frame resize handles
//! - **connection** - directed edges between shapes
//! - **scene** - the [`Document`], owner of shapes and connections
//! - **interaction** - pointer/keyboard gestures turned into document mutations
//! - **doc_format** - JSON save/load
//! - **settings** - user preferences
//!
//! The `taskboard` binary is an egui front end over this crate.

pub mod connection;
pub mod doc_format;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod scene;
pub mod settings;

pub use connection::{Connection, ConnectionId};
pub use doc_format::{deserialize, read_document, serialize, write_document};
pub use error::{DiagramError, Result};
pub use geometry::{Point, RectF};
pub use interaction::{Effect, Gesture, InputEvent, Interaction, Tool};
pub use model::{
    Color, ColorKind, ResizeHandle, Shape, ShapeColors, ShapeId, ShapeKind, ShapeType, Status,
    TaskMeta,
};
pub use scene::Document;
pub use settings::AppSettings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (for example the
/// `log_filter` setting) is used. Calling this twice is harmless.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
