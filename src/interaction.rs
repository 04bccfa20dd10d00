//! Pointer and keyboard input turned into document mutations.
//!
//! Events are handled one at a time. A gesture starts on pointer-down and
//! ends on pointer-up; only one gesture may be active, and a pointer-down
//! that arrives mid-gesture is ignored.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::connection::ConnectionId;
use crate::error::DiagramError;
use crate::geometry::{Point, RectF};
use crate::model::{ResizeHandle, ShapeId, ShapeType};
use crate::scene::Document;

pub const DEFAULT_HANDLE_SIZE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Select,
    Place(ShapeType),
    Connect,
}

impl Tool {
    /// Tool strip order.
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Place(ShapeType::Rectangle),
        Tool::Place(ShapeType::Circle),
        Tool::Place(ShapeType::Diamond),
        Tool::Place(ShapeType::Triangle),
        Tool::Place(ShapeType::Frame),
        Tool::Connect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Place(t) => t.name(),
            Tool::Connect => "Connect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    DoubleClick(Point),
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    Connecting {
        source: ShapeId,
        anchor: Point,
        current: Point,
    },
    Resizing {
        shape: ShapeId,
        handle: ResizeHandle,
        start_rect: RectF,
        start_pointer: Point,
    },
    /// `shape` follows the pointer; `companions` are the rest of the
    /// selection and move by the same delta.
    DraggingShape {
        shape: ShapeId,
        grab_offset: Point,
        companions: Vec<ShapeId>,
    },
    SelectingArea {
        start: Point,
        current: Point,
    },
}

/// What a handled event did, for the caller to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    None,
    Ignored,
    ShapePlaced(ShapeId),
    Connected(ConnectionId),
    Moved(ShapeId),
    Resized(ShapeId),
    SelectionChanged,
    Deleted(Vec<ShapeId>),
    /// Double-click on a shape; the caller runs the edit dialog and applies
    /// the result with [`Document::apply_metadata`].
    EditRequested(ShapeId),
}

#[derive(Clone, Debug)]
pub struct Interaction {
    tool: Tool,
    gesture: Gesture,
    selection: BTreeSet<ShapeId>,
    handle_size: f32,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_SIZE)
    }
}

impl Interaction {
    pub fn new(handle_size: f32) -> Self {
        Self {
            tool: Tool::Select,
            gesture: Gesture::Idle,
            selection: BTreeSet::new(),
            handle_size,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switching tools abandons any gesture in flight.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            debug!(?tool, "tool changed");
        }
        self.tool = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    pub fn selection(&self) -> &BTreeSet<ShapeId> {
        &self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn select_only(&mut self, id: ShapeId) {
        self.selection.clear();
        self.selection.insert(id);
    }

    /// Resets gesture and selection, for use after replacing the document.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.selection.clear();
    }

    /// Rubber line drawn while a connect gesture is active.
    pub fn transient_line(&self) -> Option<(Point, Point)> {
        match self.gesture {
            Gesture::Connecting {
                anchor, current, ..
            } => Some((anchor, current)),
            _ => None,
        }
    }

    pub fn selection_area(&self) -> Option<RectF> {
        match self.gesture {
            Gesture::SelectingArea { start, current } => {
                Some(RectF::from_min_max(start, current))
            }
            _ => None,
        }
    }

    pub fn handle(&mut self, doc: &mut Document, event: InputEvent) -> Effect {
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(doc, p),
            InputEvent::PointerMove(p) => self.pointer_move(doc, p),
            InputEvent::PointerUp(p) => self.pointer_up(doc, p),
            InputEvent::DoubleClick(p) => self.double_click(doc, p),
            InputEvent::Delete => self.delete_selected(doc),
        }
    }

    fn resize_target(&self, doc: &Document, p: Point) -> Option<(ShapeId, ResizeHandle, RectF)> {
        doc.shapes_in_draw_order()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .filter(|s| s.is_frame() && self.selection.contains(&s.id()))
            .find_map(|s| {
                ResizeHandle::at(&s.bounds(), p, self.handle_size)
                    .map(|h| (s.id(), h, s.bounds()))
            })
    }

    fn pointer_down(&mut self, doc: &mut Document, p: Point) -> Effect {
        if !self.is_idle() {
            debug!(gesture = ?self.gesture, "pointer-down during active gesture ignored");
            return Effect::Ignored;
        }
        match self.tool {
            Tool::Place(shape_type) => {
                let id = doc.place_shape(shape_type, p);
                Effect::ShapePlaced(id)
            }
            Tool::Connect => match doc.query_shape_at(p) {
                Some(source) => {
                    self.gesture = Gesture::Connecting {
                        source: source.id(),
                        anchor: p,
                        current: p,
                    };
                    Effect::None
                }
                None => Effect::None,
            },
            Tool::Select => {
                if let Some((shape, handle, start_rect)) = self.resize_target(doc, p) {
                    debug!(%shape, handle = handle.name(), "resize started");
                    self.gesture = Gesture::Resizing {
                        shape,
                        handle,
                        start_rect,
                        start_pointer: p,
                    };
                    return Effect::None;
                }
                match doc.query_shape_at(p) {
                    Some(hit) => {
                        let id = hit.id();
                        let grab_offset = p - hit.position();
                        let newly_selected = !self.selection.contains(&id);
                        if newly_selected {
                            self.select_only(id);
                        }
                        let companions = self
                            .selection
                            .iter()
                            .copied()
                            .filter(|other| *other != id)
                            .collect();
                        self.gesture = Gesture::DraggingShape {
                            shape: id,
                            grab_offset,
                            companions,
                        };
                        if newly_selected {
                            Effect::SelectionChanged
                        } else {
                            Effect::None
                        }
                    }
                    None => {
                        self.gesture = Gesture::SelectingArea {
                            start: p,
                            current: p,
                        };
                        if self.selection.is_empty() {
                            Effect::None
                        } else {
                            self.selection.clear();
                            Effect::SelectionChanged
                        }
                    }
                }
            }
        }
    }

    fn pointer_move(&mut self, doc: &mut Document, p: Point) -> Effect {
        match &mut self.gesture {
            Gesture::Idle => Effect::None,
            Gesture::Connecting { current, .. } | Gesture::SelectingArea { current, .. } => {
                *current = p;
                Effect::None
            }
            Gesture::DraggingShape {
                shape,
                grab_offset,
                companions,
            } => {
                let id = *shape;
                let Some(before) = doc.shape(id).map(|s| s.position()) else {
                    warn!(%id, "drag target vanished");
                    self.gesture = Gesture::Idle;
                    return Effect::Ignored;
                };
                let target = p - *grab_offset;
                let delta = target - before;
                companions.retain(|other| doc.translate_shape(*other, delta).is_ok());
                match doc.move_shape(id, target) {
                    Ok(()) => Effect::Moved(id),
                    Err(err) => {
                        warn!(%err, "drag target vanished");
                        self.gesture = Gesture::Idle;
                        Effect::Ignored
                    }
                }
            }
            Gesture::Resizing {
                shape,
                handle,
                start_rect,
                start_pointer,
            } => {
                let id = *shape;
                let candidate = handle.apply(*start_rect, p - *start_pointer);
                match doc.resize_shape(id, candidate) {
                    Ok(()) => Effect::Resized(id),
                    Err(DiagramError::InvalidResize { width, height }) => {
                        debug!(%id, width, height, "resize step rejected");
                        Effect::Ignored
                    }
                    Err(err) => {
                        warn!(%err, "resize target vanished");
                        self.gesture = Gesture::Idle;
                        Effect::Ignored
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self, doc: &mut Document, p: Point) -> Effect {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Connecting { source, .. } => {
                let target = doc.shapes_at(p).map(|s| s.id()).find(|id| *id != source);
                let Some(target) = target else {
                    return Effect::None;
                };
                match doc.add_connection(source, target) {
                    Ok(cid) => Effect::Connected(cid),
                    Err(err) => {
                        warn!(%err, "connect gesture dropped");
                        Effect::Ignored
                    }
                }
            }
            Gesture::SelectingArea { start, .. } => {
                if start == p {
                    return Effect::None;
                }
                let area = RectF::from_min_max(start, p);
                let hits = doc.shapes_in_rect(area);
                if hits.is_empty() {
                    return Effect::None;
                }
                self.selection.extend(hits);
                Effect::SelectionChanged
            }
            Gesture::Resizing { shape, .. } => {
                debug!(%shape, "resize finished");
                Effect::None
            }
            Gesture::DraggingShape { .. } | Gesture::Idle => Effect::None,
        }
    }

    fn double_click(&mut self, doc: &Document, p: Point) -> Effect {
        if !self.is_idle() || self.tool != Tool::Select {
            return Effect::Ignored;
        }
        match doc.query_shape_at(p) {
            Some(hit) => {
                let id = hit.id();
                self.select_only(id);
                Effect::EditRequested(id)
            }
            None => Effect::None,
        }
    }

    fn delete_selected(&mut self, doc: &mut Document) -> Effect {
        if !self.is_idle() {
            return Effect::Ignored;
        }
        if self.selection.is_empty() {
            return Effect::None;
        }
        let removed: Vec<ShapeId> = std::mem::take(&mut self.selection)
            .into_iter()
            .filter(|id| doc.remove_shape(*id).is_ok())
            .collect();
        debug!(count = removed.len(), "selection deleted");
        Effect::Deleted(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_release(ix: &mut Interaction, doc: &mut Document, at: Point) -> Effect {
        let effect = ix.handle(doc, InputEvent::PointerDown(at));
        ix.handle(doc, InputEvent::PointerUp(at));
        effect
    }

    #[test]
    fn placement_tool_creates_shape_at_pointer() {
        let mut doc = Document::new();
        let mut ix = Interaction::default();
        ix.set_tool(Tool::Place(ShapeType::Diamond));
        let effect = press_release(&mut ix, &mut doc, Point::new(30.0, 40.0));
        let Effect::ShapePlaced(id) = effect else {
            panic!("expected placement, got {effect:?}");
        };
        let shape = doc.shape(id).unwrap();
        assert_eq!(shape.shape_type(), ShapeType::Diamond);
        assert_eq!(shape.position(), Point::new(30.0, 40.0));
        assert!(ix.is_idle());
    }

    #[test]
    fn connect_gesture_between_shapes() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Rectangle, Point::new(0.0, 0.0));
        let b = doc.place_shape(ShapeType::Circle, Point::new(300.0, 0.0));
        let mut ix = Interaction::default();
        ix.set_tool(Tool::Connect);

        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerMove(Point::new(200.0, 30.0)));
        assert_eq!(
            ix.transient_line(),
            Some((Point::new(10.0, 10.0), Point::new(200.0, 30.0)))
        );
        assert_eq!(doc.connection_count(), 0);

        let effect = ix.handle(&mut doc, InputEvent::PointerUp(Point::new(350.0, 50.0)));
        assert!(matches!(effect, Effect::Connected(_)));
        let conn = &doc.connections()[0];
        assert_eq!((conn.start(), conn.end()), (a, b));
        assert!(ix.transient_line().is_none());
    }

    #[test]
    fn connect_released_on_empty_or_source_does_nothing() {
        let mut doc = Document::new();
        doc.place_shape(ShapeType::Rectangle, Point::new(0.0, 0.0));
        let mut ix = Interaction::default();
        ix.set_tool(Tool::Connect);

        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(900.0, 900.0)));
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(20.0, 20.0)));
        assert_eq!(doc.connection_count(), 0);
        assert!(ix.is_idle());
    }

    #[test]
    fn connect_release_reaches_shape_beneath_source() {
        let mut doc = Document::new();
        let frame = doc.place_shape(ShapeType::Frame, Point::ZERO);
        let rect = doc.place_shape(ShapeType::Rectangle, Point::new(20.0, 20.0));
        let mut ix = Interaction::default();
        ix.set_tool(Tool::Connect);
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(30.0, 30.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(40.0, 40.0)));
        let conn = &doc.connections()[0];
        assert_eq!((conn.start(), conn.end()), (rect, frame));
    }

    #[test]
    fn drag_moves_shape_and_selects_it() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Rectangle, Point::new(0.0, 0.0));
        let mut ix = Interaction::default();
        let effect = ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        assert_eq!(effect, Effect::SelectionChanged);
        assert!(ix.is_selected(a));
        let effect = ix.handle(&mut doc, InputEvent::PointerMove(Point::new(60.0, 30.0)));
        assert_eq!(effect, Effect::Moved(a));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(60.0, 30.0)));
        assert_eq!(doc.shape(a).unwrap().position(), Point::new(50.0, 20.0));
        assert!(ix.is_idle());
    }

    #[test]
    fn resize_via_handle_of_selected_frame() {
        let mut doc = Document::new();
        let f = doc.place_shape(ShapeType::Frame, Point::ZERO);
        let mut ix = Interaction::default();
        ix.select_only(f);
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(300.0, 200.0)));
        assert!(matches!(ix.gesture(), Gesture::Resizing { .. }));
        let effect = ix.handle(&mut doc, InputEvent::PointerMove(Point::new(350.0, 260.0)));
        assert_eq!(effect, Effect::Resized(f));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(350.0, 260.0)));
        let b = doc.shape(f).unwrap().bounds();
        assert_eq!((b.width(), b.height()), (350.0, 260.0));
        assert_eq!(b.min, Point::ZERO);
    }

    #[test]
    fn handles_are_inactive_on_unselected_frames() {
        let mut doc = Document::new();
        let f = doc.place_shape(ShapeType::Frame, Point::ZERO);
        let mut ix = Interaction::default();
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(299.0, 199.0)));
        assert_eq!(
            ix.gesture(),
            &Gesture::DraggingShape {
                shape: f,
                grab_offset: Point::new(299.0, 199.0),
                companions: Vec::new(),
            }
        );
    }

    #[test]
    fn dragging_one_of_an_area_selection_moves_them_all() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Rectangle, Point::ZERO);
        let b = doc.place_shape(ShapeType::Circle, Point::new(400.0, 0.0));
        let far = doc.place_shape(ShapeType::Diamond, Point::new(0.0, 600.0));
        let ab = doc.add_connection(a, b).unwrap();
        let mut ix = Interaction::default();

        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(-10.0, -10.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(450.0, 50.0)));
        assert!(ix.is_selected(a) && ix.is_selected(b) && !ix.is_selected(far));

        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerMove(Point::new(35.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerMove(Point::new(60.0, 10.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(60.0, 10.0)));

        assert_eq!(doc.shape(a).unwrap().position(), Point::new(50.0, 0.0));
        assert_eq!(doc.shape(b).unwrap().position(), Point::new(450.0, 0.0));
        assert_eq!(doc.shape(far).unwrap().position(), Point::new(0.0, 600.0));
        let (start, end) = doc.connection(ab).unwrap().endpoints();
        assert!((start.x - 200.0).abs() < 1e-3);
        assert!((end.x - 450.0).abs() < 0.1);
    }

    #[test]
    fn click_on_empty_canvas_selects_nothing() {
        let mut doc = Document::new();
        let circle = doc.place_shape(ShapeType::Circle, Point::ZERO);
        let mut ix = Interaction::default();
        assert!(doc.query_shape_at(Point::new(3.0, 3.0)).is_none());

        let effect = press_release(&mut ix, &mut doc, Point::new(3.0, 3.0));
        assert_eq!(effect, Effect::None);
        assert!(!ix.is_selected(circle));

        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(1.0, 1.0)));
        ix.handle(&mut doc, InputEvent::PointerUp(Point::new(8.0, 8.0)));
        assert!(!ix.is_selected(circle));
    }

    #[test]
    fn top_left_resize_moves_anchor() {
        let mut doc = Document::new();
        let f = doc.place_shape(ShapeType::Frame, Point::new(100.0, 100.0));
        let mut ix = Interaction::default();
        ix.select_only(f);
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(100.0, 100.0)));
        ix.handle(&mut doc, InputEvent::PointerMove(Point::new(80.0, 130.0)));
        let b = doc.shape(f).unwrap().bounds();
        assert_eq!(b.min, Point::new(80.0, 130.0));
        assert_eq!(b.max, Point::new(400.0, 300.0));
    }

    #[test]
    fn pointer_down_mid_gesture_is_ignored() {
        let mut doc = Document::new();
        doc.place_shape(ShapeType::Rectangle, Point::ZERO);
        let mut ix = Interaction::default();
        ix.set_tool(Tool::Connect);
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(10.0, 10.0)));
        let effect = ix.handle(&mut doc, InputEvent::PointerDown(Point::new(500.0, 500.0)));
        assert_eq!(effect, Effect::Ignored);
        assert!(matches!(ix.gesture(), Gesture::Connecting { .. }));
    }

    #[test]
    fn delete_removes_selection_with_connections() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Rectangle, Point::ZERO);
        let b = doc.place_shape(ShapeType::Rectangle, Point::new(400.0, 0.0));
        doc.add_connection(a, b).unwrap();
        let mut ix = Interaction::default();
        ix.select_only(a);
        let effect = ix.handle(&mut doc, InputEvent::Delete);
        assert_eq!(effect, Effect::Deleted(vec![a]));
        assert_eq!(doc.shape_count(), 1);
        assert_eq!(doc.connection_count(), 0);
        assert!(ix.selection().is_empty());
        assert_eq!(ix.handle(&mut doc, InputEvent::Delete), Effect::None);
    }

    #[test]
    fn area_selection_on_empty_canvas() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Rectangle, Point::new(50.0, 50.0));
        let b = doc.place_shape(ShapeType::Circle, Point::new(500.0, 500.0));
        let mut ix = Interaction::default();
        ix.handle(&mut doc, InputEvent::PointerDown(Point::new(0.0, 0.0)));
        ix.handle(&mut doc, InputEvent::PointerMove(Point::new(100.0, 100.0)));
        assert!(ix.selection_area().is_some());
        let effect = ix.handle(&mut doc, InputEvent::PointerUp(Point::new(100.0, 100.0)));
        assert_eq!(effect, Effect::SelectionChanged);
        assert!(ix.is_selected(a));
        assert!(!ix.is_selected(b));
    }

    #[test]
    fn double_click_requests_edit() {
        let mut doc = Document::new();
        let a = doc.place_shape(ShapeType::Triangle, Point::ZERO);
        let mut ix = Interaction::default();
        let effect = ix.handle(&mut doc, InputEvent::DoubleClick(Point::new(50.0, 80.0)));
        assert_eq!(effect, Effect::EditRequested(a));
        let effect = ix.handle(&mut doc, InputEvent::DoubleClick(Point::new(-50.0, -80.0)));
        assert_eq!(effect, Effect::None);
    }
}
