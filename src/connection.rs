use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DiagramError, Result};
use crate::geometry::{self, Point};
use crate::model::{Shape, ShapeId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Directed edge between two shapes, drawn between their boundary points.
///
/// The endpoints are cached and go stale whenever either shape moves or is
/// resized; the owning document calls [`Connection::recompute_endpoints`]
/// after every such mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    start: ShapeId,
    end: ShapeId,
    start_point: Point,
    end_point: Point,
}

impl Connection {
    pub fn new(id: ConnectionId, start: &Shape, end: &Shape) -> Result<Self> {
        if start.id() == end.id() {
            return Err(DiagramError::InvalidConnection {
                start: start.id(),
                end: end.id(),
            });
        }
        let mut conn = Self {
            id,
            start: start.id(),
            end: end.id(),
            start_point: start.center(),
            end_point: end.center(),
        };
        conn.recompute_endpoints(start, end);
        Ok(conn)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn start(&self) -> ShapeId {
        self.start
    }

    pub fn end(&self) -> ShapeId {
        self.end
    }

    pub fn touches(&self, shape: ShapeId) -> bool {
        self.start == shape || self.end == shape
    }

    pub fn endpoints(&self) -> (Point, Point) {
        (self.start_point, self.end_point)
    }

    pub fn recompute_endpoints(&mut self, start: &Shape, end: &Shape) {
        self.start_point = start.edge_point(end.center());
        self.end_point = end.edge_point(start.center());
    }

    pub fn arrow_head(&self, size: f32) -> Option<[Point; 3]> {
        geometry::arrow_head(self.start_point, self.end_point, size)
    }
}
