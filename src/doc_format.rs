//! JSON document format.
//!
//! Shapes are written in creation order; connections refer to shapes by
//! their index in the `shapes` array, so ids never reach the file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::info;

use crate::error::{DiagramError, Result};
use crate::geometry::{Point, RectF};
use crate::model::{
    Color, ColorKind, DEFAULT_BORDER_WIDTH, DEFAULT_CATEGORY, MIN_FRAME_SIZE, Shape, ShapeId,
    ShapeType, Status, TaskMeta,
};
use crate::scene::Document;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ShapeRecord {
    #[serde(rename = "type")]
    type_name: String,
    x: f32,
    y: f32,
    title: String,
    #[serde(default = "default_category")]
    category: String,
    description: String,
    status: Status,
    #[serde(default)]
    custom_bg_color: Option<Color>,
    #[serde(default)]
    custom_text_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    border_width: Option<u32>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct ConnectionRecord {
    #[serde(alias = "startIndex")]
    start: usize,
    #[serde(alias = "endIndex")]
    end: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct DocumentRecord {
    shapes: Vec<ShapeRecord>,
    connections: Vec<ConnectionRecord>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl ShapeRecord {
    fn from_shape(shape: &Shape) -> Self {
        let frame = shape.is_frame();
        let meta = shape.meta();
        Self {
            type_name: shape.shape_type().name().to_string(),
            x: shape.position().x,
            y: shape.position().y,
            title: meta.title.clone(),
            category: meta.category.clone(),
            description: meta.description.clone(),
            status: meta.status,
            custom_bg_color: shape.custom_color(ColorKind::Background),
            custom_text_color: shape.custom_color(ColorKind::Text),
            width: frame.then(|| shape.width()),
            height: frame.then(|| shape.height()),
            border_width: shape.border_width(),
        }
    }

    fn into_shape(self, index: usize) -> Result<Shape> {
        let shape_type = ShapeType::from_name(&self.type_name).ok_or_else(|| {
            DiagramError::MalformedDocument(format!(
                "shape {index}: unknown type {:?}",
                self.type_name
            ))
        })?;
        let position = Point::new(self.x, self.y);
        let mut shape = Shape::new(shape_type, position);
        if shape.is_frame() {
            let (default_w, default_h) = shape_type.default_size();
            let width = self.width.unwrap_or(default_w);
            let height = self.height.unwrap_or(default_h);
            if !(width >= MIN_FRAME_SIZE && height >= MIN_FRAME_SIZE) {
                return Err(DiagramError::MalformedDocument(format!(
                    "shape {index}: frame size {width}x{height} below minimum"
                )));
            }
            shape.resize(RectF::from_origin_size(position, width, height))?;
            shape.set_border_width(self.border_width.unwrap_or(DEFAULT_BORDER_WIDTH));
        }
        shape.apply_metadata(TaskMeta {
            title: self.title,
            category: self.category,
            description: self.description,
            status: self.status,
        });
        shape.set_color(ColorKind::Background, self.custom_bg_color);
        shape.set_color(ColorKind::Text, self.custom_text_color);
        Ok(shape)
    }
}

fn to_record(doc: &Document) -> DocumentRecord {
    let mut index_of: HashMap<ShapeId, usize> = HashMap::new();
    let mut shapes = Vec::with_capacity(doc.shape_count());
    for shape in doc.shapes() {
        index_of.insert(shape.id(), shapes.len());
        shapes.push(ShapeRecord::from_shape(shape));
    }
    let connections = doc
        .connections()
        .iter()
        .filter_map(|c| {
            Some(ConnectionRecord {
                start: *index_of.get(&c.start())?,
                end: *index_of.get(&c.end())?,
            })
        })
        .collect();
    DocumentRecord {
        shapes,
        connections,
    }
}

fn from_record(record: DocumentRecord) -> Result<Document> {
    let mut doc = Document::new();
    let mut ids = Vec::with_capacity(record.shapes.len());
    for (index, shape) in record.shapes.into_iter().enumerate() {
        ids.push(doc.add_shape(shape.into_shape(index)?));
    }
    for (index, conn) in record.connections.iter().enumerate() {
        let resolve = |i: usize| {
            ids.get(i).copied().ok_or_else(|| {
                DiagramError::MalformedDocument(format!(
                    "connection {index}: shape index {i} out of range ({} shapes)",
                    ids.len()
                ))
            })
        };
        let (start, end) = (resolve(conn.start)?, resolve(conn.end)?);
        doc.add_connection(start, end).map_err(|err| {
            DiagramError::MalformedDocument(format!("connection {index}: {err}"))
        })?;
    }
    Ok(doc)
}

/// Pretty-printed JSON for `doc`.
pub fn serialize(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_record(doc))?)
}

/// Builds a fresh document from `text`. Nothing is returned on failure, so
/// callers keep their current document untouched.
pub fn deserialize(text: &str) -> Result<Document> {
    let record: DocumentRecord = serde_json::from_str(text)?;
    from_record(record)
}

pub fn write_document<W: Write>(mut writer: W, doc: &Document) -> Result<()> {
    let record = to_record(doc);
    serde_json::to_writer_pretty(&mut writer, &record)?;
    writer.flush()?;
    info!(
        shapes = record.shapes.len(),
        connections = record.connections.len(),
        "document written"
    );
    Ok(())
}

pub fn read_document<R: Read>(reader: R) -> Result<Document> {
    let record: DocumentRecord = serde_json::from_reader(reader)?;
    let doc = from_record(record)?;
    info!(
        shapes = doc.shape_count(),
        connections = doc.connection_count(),
        "document read"
    );
    Ok(doc)
}
