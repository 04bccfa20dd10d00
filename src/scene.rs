//! The document: every shape and connection of one diagram.
//!
//! The document owns connections; shapes only keep the ids of the
//! connections that touch them. All mutations that move or resize a shape
//! go through here so incident connection endpoints are recomputed.

use std::collections::BTreeMap;
use tracing::debug;

use crate::connection::{Connection, ConnectionId};
use crate::error::{DiagramError, Result};
use crate::geometry::{Point, RectF};
use crate::model::{Color, ColorKind, Shape, ShapeId, ShapeType, TaskMeta};

#[derive(Clone, Debug)]
pub struct Document {
    shapes: BTreeMap<ShapeId, Shape>,
    connections: Vec<Connection>,
    next_shape_id: u64,
    next_connection_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            shapes: BTreeMap::new(),
            connections: Vec::new(),
            next_shape_id: 1,
            next_connection_id: 1,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_shape_id(&mut self) -> ShapeId {
        let id = ShapeId::new(self.next_shape_id);
        self.next_shape_id += 1;
        id
    }

    fn allocate_connection_id(&mut self) -> ConnectionId {
        let id = ConnectionId::new(self.next_connection_id);
        self.next_connection_id += 1;
        id
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains_shape(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id() == id)
    }

    /// Bottom-to-top paint order: frames first, then everything else, each
    /// group in creation order.
    pub fn shapes_in_draw_order(&self) -> impl Iterator<Item = &Shape> {
        let frames = self.shapes.values().filter(|s| s.is_frame());
        let others = self.shapes.values().filter(|s| !s.is_frame());
        frames.chain(others)
    }

    /// Every shape containing `point`, topmost first.
    pub fn shapes_at(&self, point: Point) -> impl Iterator<Item = &Shape> {
        let mut hits: Vec<&Shape> = self
            .shapes_in_draw_order()
            .filter(|s| s.contains(point))
            .collect();
        hits.reverse();
        hits.into_iter()
    }

    pub fn query_shape_at(&self, point: Point) -> Option<&Shape> {
        self.shapes_at(point).next()
    }

    /// Shapes whose outline overlaps `area`.
    pub fn shapes_in_rect(&self, area: RectF) -> Vec<ShapeId> {
        let area = area.normalized();
        self.shapes
            .values()
            .filter(|s| s.bounds().intersects(&area) && s.boundary().intersects_rect(&area))
            .map(|s| s.id())
            .collect()
    }

    /// Registers `shape` under a fresh id. Any incidence list it carried is dropped.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        let id = self.allocate_shape_id();
        shape.id = id;
        shape.connections.clear();
        debug!(%id, kind = shape.shape_type().name(), "shape added");
        self.shapes.insert(id, shape);
        id
    }

    pub fn place_shape(&mut self, shape_type: ShapeType, position: Point) -> ShapeId {
        self.add_shape(Shape::new(shape_type, position))
    }

    /// Removes a shape and every connection touching it.
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape> {
        let shape = self
            .shapes
            .remove(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.touches(id) {
                removed.push((c.id(), c.start(), c.end()));
                false
            } else {
                true
            }
        });
        for (cid, start, end) in &removed {
            for other in [start, end] {
                if let Some(s) = self.shapes.get_mut(other) {
                    s.connections.retain(|c| c != cid);
                }
            }
        }
        debug!(%id, cascaded = removed.len(), "shape removed");
        Ok(shape)
    }

    /// Connects `start -> end`. Duplicate connections between the same pair
    /// are allowed.
    pub fn add_connection(&mut self, start: ShapeId, end: ShapeId) -> Result<ConnectionId> {
        let start_shape = self
            .shapes
            .get(&start)
            .ok_or(DiagramError::ShapeNotFound(start))?;
        let end_shape = self
            .shapes
            .get(&end)
            .ok_or(DiagramError::ShapeNotFound(end))?;
        if start == end {
            return Err(DiagramError::InvalidConnection { start, end });
        }
        let id = ConnectionId::new(self.next_connection_id);
        let conn = Connection::new(id, start_shape, end_shape)?;
        self.allocate_connection_id();
        self.connections.push(conn);
        for shape_id in [start, end] {
            if let Some(s) = self.shapes.get_mut(&shape_id) {
                s.connections.push(id);
            }
        }
        debug!(%id, %start, %end, "connection added");
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection> {
        let idx = self
            .connections
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DiagramError::ConnectionNotFound(id))?;
        let conn = self.connections.remove(idx);
        for shape_id in [conn.start(), conn.end()] {
            if let Some(s) = self.shapes.get_mut(&shape_id) {
                s.connections.retain(|c| *c != id);
            }
        }
        debug!(%id, "connection removed");
        Ok(conn)
    }

    fn refresh_connections_of(&mut self, id: ShapeId) {
        let Some(shape) = self.shapes.get(&id) else {
            return;
        };
        for cid in &shape.connections {
            let Some(conn) = self.connections.iter_mut().find(|c| c.id() == *cid) else {
                continue;
            };
            if let (Some(start), Some(end)) =
                (self.shapes.get(&conn.start()), self.shapes.get(&conn.end()))
            {
                conn.recompute_endpoints(start, end);
            }
        }
    }

    pub fn move_shape(&mut self, id: ShapeId, position: Point) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        shape.set_position(position);
        self.refresh_connections_of(id);
        Ok(())
    }

    pub fn translate_shape(&mut self, id: ShapeId, delta: Point) -> Result<()> {
        let position = self
            .shapes
            .get(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?
            .position();
        self.move_shape(id, position + delta)
    }

    /// Resizes a frame. On error the previous rectangle is kept.
    pub fn resize_shape(&mut self, id: ShapeId, bounds: RectF) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        shape.resize(bounds)?;
        self.refresh_connections_of(id);
        Ok(())
    }

    pub fn apply_metadata(&mut self, id: ShapeId, meta: TaskMeta) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        shape.apply_metadata(meta);
        Ok(())
    }

    pub fn set_color(&mut self, id: ShapeId, kind: ColorKind, color: Option<Color>) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        shape.set_color(kind, color);
        Ok(())
    }

    /// Returns whether the shape is a frame and took the new width.
    pub fn set_border_width(&mut self, id: ShapeId, width: u32) -> Result<bool> {
        let shape = self
            .shapes
            .get_mut(&id)
            .ok_or(DiagramError::ShapeNotFound(id))?;
        Ok(shape.set_border_width(width))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.connections.clear();
        debug!("document cleared");
    }
}
