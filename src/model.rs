use serde::{Deserialize, Serialize};
use std::fmt;

use crate::connection::ConnectionId;
use crate::error::{DiagramError, Result};
use crate::geometry::{self, Point, RectF};

pub const MIN_FRAME_SIZE: f32 = 50.0;
pub const MIN_BORDER_WIDTH: u32 = 1;
pub const MAX_BORDER_WIDTH: u32 = 10;
pub const DEFAULT_BORDER_WIDTH: u32 = 2;
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_TITLE: &str = "New Task";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(u64);

impl ShapeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Rectangle,
    Circle,
    Diamond,
    Triangle,
    Frame,
}

impl ShapeType {
    pub const ALL: [ShapeType; 5] = [
        ShapeType::Rectangle,
        ShapeType::Circle,
        ShapeType::Diamond,
        ShapeType::Triangle,
        ShapeType::Frame,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "Rectangle",
            ShapeType::Circle => "Circle",
            ShapeType::Diamond => "Diamond",
            ShapeType::Triangle => "Triangle",
            ShapeType::Frame => "Frame",
        }
    }

    /// Accepts the short names as well as the older `RectangleShape` style tags.
    pub fn from_name(name: &str) -> Option<Self> {
        let short = name.strip_suffix("Shape").unwrap_or(name);
        Self::ALL.into_iter().find(|t| t.name() == short)
    }

    pub fn default_size(self) -> (f32, f32) {
        match self {
            ShapeType::Rectangle => (150.0, 80.0),
            ShapeType::Circle => (100.0, 100.0),
            ShapeType::Diamond => (120.0, 80.0),
            ShapeType::Triangle => (100.0, 100.0),
            ShapeType::Frame => (300.0, 200.0),
        }
    }

    fn base_color(self) -> Color {
        match self {
            ShapeType::Rectangle => Color::rgb(0x0e, 0x63, 0x9c),
            ShapeType::Circle => Color::rgb(0xd1, 0x38, 0x38),
            ShapeType::Diamond => Color::rgb(0x8e, 0x38, 0xd1),
            ShapeType::Triangle => Color::rgb(0xd1, 0x8e, 0x38),
            ShapeType::Frame => Color::rgb(0x55, 0x55, 0x55),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
    Triangle,
    Frame { border_width: u32 },
}

impl ShapeKind {
    pub fn shape_type(self) -> ShapeType {
        match self {
            ShapeKind::Rectangle => ShapeType::Rectangle,
            ShapeKind::Circle => ShapeType::Circle,
            ShapeKind::Diamond => ShapeType::Diamond,
            ShapeKind::Triangle => ShapeType::Triangle,
            ShapeKind::Frame { .. } => ShapeType::Frame,
        }
    }
}

impl From<ShapeType> for ShapeKind {
    fn from(t: ShapeType) -> Self {
        match t {
            ShapeType::Rectangle => ShapeKind::Rectangle,
            ShapeType::Circle => ShapeKind::Circle,
            ShapeType::Diamond => ShapeKind::Diamond,
            ShapeType::Triangle => ShapeKind::Triangle,
            ShapeType::Frame => ShapeKind::Frame {
                border_width: DEFAULT_BORDER_WIDTH,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "Todo",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque RGB colour, persisted as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn scaled(self, factor: f32) -> Self {
        let s = |c: u8| ((c as f32) * factor).round().clamp(0.0, 255.0) as u8;
        Self::rgb(s(self.r), s(self.g), s(self.b))
    }

    /// `factor` is a percentage; 120 brightens by a fifth.
    pub fn lighter(self, factor: u32) -> Self {
        self.scaled(factor as f32 / 100.0)
    }

    pub fn darker(self, factor: u32) -> Self {
        if factor == 0 {
            return self;
        }
        self.scaled(100.0 / factor as f32)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid colour {s:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorKind {
    Background,
    Text,
}

/// The fields edited by the metadata dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskMeta {
    pub title: String,
    pub category: String,
    pub description: String,
    pub status: Status,
}

impl Default for TaskMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            status: Status::Todo,
        }
    }
}

/// Colours a renderer should use for a shape, computed on demand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeColors {
    pub fill: Color,
    pub fill_alpha: u8,
    pub border: Color,
    pub text: Color,
}

impl ShapeColors {
    pub fn highlighted(self) -> Self {
        Self {
            fill: self.fill.lighter(120),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Boundary {
    Polygon(Vec<Point>),
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
    },
}

impl Boundary {
    pub fn edge_point(&self, center: Point, target: Point) -> Point {
        match self {
            Boundary::Polygon(points) => geometry::polygon_edge_point(points, center, target),
            Boundary::Ellipse {
                center,
                radius_x,
                radius_y,
            } => geometry::ellipse_edge_point(*center, *radius_x, *radius_y, target),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Boundary::Polygon(points) => geometry::polygon_contains(points, p),
            Boundary::Ellipse {
                center,
                radius_x,
                radius_y,
            } => geometry::ellipse_contains(*center, *radius_x, *radius_y, p),
        }
    }

    /// `area` must be normalized.
    pub fn intersects_rect(&self, area: &RectF) -> bool {
        match self {
            Boundary::Polygon(points) => geometry::polygon_intersects_rect(points, area),
            Boundary::Ellipse {
                center,
                radius_x,
                radius_y,
            } => geometry::ellipse_intersects_rect(*center, *radius_x, *radius_y, area),
        }
    }
}

/// Which edges of the bounding rectangle a handle drags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandleEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
        ResizeHandle::Top,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
        ResizeHandle::Right,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResizeHandle::TopLeft => "top_left",
            ResizeHandle::TopRight => "top_right",
            ResizeHandle::BottomLeft => "bottom_left",
            ResizeHandle::BottomRight => "bottom_right",
            ResizeHandle::Top => "top",
            ResizeHandle::Bottom => "bottom",
            ResizeHandle::Left => "left",
            ResizeHandle::Right => "right",
        }
    }

    pub fn edges(self) -> HandleEdges {
        let mut e = HandleEdges::default();
        match self {
            ResizeHandle::TopLeft => {
                e.top = true;
                e.left = true;
            }
            ResizeHandle::TopRight => {
                e.top = true;
                e.right = true;
            }
            ResizeHandle::BottomLeft => {
                e.bottom = true;
                e.left = true;
            }
            ResizeHandle::BottomRight => {
                e.bottom = true;
                e.right = true;
            }
            ResizeHandle::Top => e.top = true,
            ResizeHandle::Bottom => e.bottom = true,
            ResizeHandle::Left => e.left = true,
            ResizeHandle::Right => e.right = true,
        }
        e
    }

    /// Centre of the handle square on `rect`.
    pub fn anchor(self, rect: &RectF) -> Point {
        let c = rect.center();
        match self {
            ResizeHandle::TopLeft => rect.min,
            ResizeHandle::TopRight => Point::new(rect.max.x, rect.min.y),
            ResizeHandle::BottomLeft => Point::new(rect.min.x, rect.max.y),
            ResizeHandle::BottomRight => rect.max,
            ResizeHandle::Top => Point::new(c.x, rect.min.y),
            ResizeHandle::Bottom => Point::new(c.x, rect.max.y),
            ResizeHandle::Left => Point::new(rect.min.x, c.y),
            ResizeHandle::Right => Point::new(rect.max.x, c.y),
        }
    }

    pub fn hit_rect(self, rect: &RectF, handle_size: f32) -> RectF {
        let a = self.anchor(rect);
        let half = handle_size * 0.5;
        RectF::from_min_max(
            Point::new(a.x - half, a.y - half),
            Point::new(a.x + half, a.y + half),
        )
    }

    pub fn at(rect: &RectF, p: Point, handle_size: f32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.hit_rect(rect, handle_size).contains(p))
    }

    /// Moves this handle's edges of `start` by `delta` and normalizes the result.
    pub fn apply(self, start: RectF, delta: Point) -> RectF {
        let edges = self.edges();
        let mut min = start.min;
        let mut max = start.max;
        if edges.left {
            min.x += delta.x;
        }
        if edges.right {
            max.x += delta.x;
        }
        if edges.top {
            min.y += delta.y;
        }
        if edges.bottom {
            max.y += delta.y;
        }
        RectF { min, max }.normalized()
    }
}

/// A placed diagram node: geometry for one variant plus task metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub(crate) id: ShapeId,
    kind: ShapeKind,
    rect: RectF,
    meta: TaskMeta,
    custom_background_color: Option<Color>,
    custom_text_color: Option<Color>,
    pub(crate) connections: Vec<ConnectionId>,
}

impl Shape {
    /// New shape with the variant's default size, anchored at `position`.
    pub fn new(shape_type: ShapeType, position: Point) -> Self {
        let (w, h) = shape_type.default_size();
        Self {
            id: ShapeId::default(),
            kind: shape_type.into(),
            rect: RectF::from_origin_size(position, w, h),
            meta: TaskMeta::default(),
            custom_background_color: None,
            custom_text_color: None,
            connections: Vec::new(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, ShapeKind::Frame { .. })
    }

    pub fn position(&self) -> Point {
        self.rect.min
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    pub fn bounds(&self) -> RectF {
        self.rect
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn meta(&self) -> &TaskMeta {
        &self.meta
    }

    pub fn title(&self) -> &str {
        &self.meta.title
    }

    pub fn category(&self) -> &str {
        &self.meta.category
    }

    pub fn description(&self) -> &str {
        &self.meta.description
    }

    pub fn status(&self) -> Status {
        self.meta.status
    }

    pub fn custom_color(&self, kind: ColorKind) -> Option<Color> {
        match kind {
            ColorKind::Background => self.custom_background_color,
            ColorKind::Text => self.custom_text_color,
        }
    }

    pub fn border_width(&self) -> Option<u32> {
        match self.kind {
            ShapeKind::Frame { border_width } => Some(border_width),
            _ => None,
        }
    }

    /// Ids of incident connections in attachment order.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    /// Frames show their category, or `Group` while it is still the default.
    pub fn display_label(&self) -> &str {
        if self.is_frame() && self.meta.category == DEFAULT_CATEGORY {
            "Group"
        } else {
            &self.meta.category
        }
    }

    pub fn set_position(&mut self, position: Point) {
        let delta = position - self.rect.min;
        self.rect = self.rect.translated(delta);
    }

    pub fn apply_metadata(&mut self, meta: TaskMeta) {
        self.meta = meta;
    }

    pub fn set_color(&mut self, kind: ColorKind, color: Option<Color>) {
        match kind {
            ColorKind::Background => self.custom_background_color = color,
            ColorKind::Text => self.custom_text_color = color,
        }
    }

    /// Clamps into `1..=10`. Returns `false` for non-frame shapes.
    pub fn set_border_width(&mut self, width: u32) -> bool {
        match &mut self.kind {
            ShapeKind::Frame { border_width } => {
                *border_width = width.clamp(MIN_BORDER_WIDTH, MAX_BORDER_WIDTH);
                true
            }
            _ => false,
        }
    }

    /// Replaces the frame rectangle; `bounds` is normalized first.
    pub fn resize(&mut self, bounds: RectF) -> Result<()> {
        if !self.is_frame() {
            return Err(DiagramError::NotResizable(self.id));
        }
        let bounds = bounds.normalized();
        if !(bounds.width() >= MIN_FRAME_SIZE && bounds.height() >= MIN_FRAME_SIZE) {
            return Err(DiagramError::InvalidResize {
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        self.rect = bounds;
        Ok(())
    }

    pub fn boundary(&self) -> Boundary {
        let r = self.rect;
        let c = r.center();
        match self.kind {
            ShapeKind::Rectangle | ShapeKind::Frame { .. } => Boundary::Polygon(r.corners().to_vec()),
            ShapeKind::Circle => Boundary::Ellipse {
                center: c,
                radius_x: r.width() * 0.5,
                radius_y: r.height() * 0.5,
            },
            ShapeKind::Diamond => Boundary::Polygon(vec![
                Point::new(c.x, r.min.y),
                Point::new(r.max.x, c.y),
                Point::new(c.x, r.max.y),
                Point::new(r.min.x, c.y),
            ]),
            ShapeKind::Triangle => Boundary::Polygon(vec![
                Point::new(c.x, r.min.y),
                r.max,
                Point::new(r.min.x, r.max.y),
            ]),
        }
    }

    /// Outline vertices for polygon variants, `None` for the ellipse.
    pub fn boundary_polygon(&self) -> Option<Vec<Point>> {
        match self.boundary() {
            Boundary::Polygon(points) => Some(points),
            Boundary::Ellipse { .. } => None,
        }
    }

    pub fn center_and_radii(&self) -> Option<(Point, f32, f32)> {
        match self.boundary() {
            Boundary::Ellipse {
                center,
                radius_x,
                radius_y,
            } => Some((center, radius_x, radius_y)),
            Boundary::Polygon(_) => None,
        }
    }

    pub fn edge_point(&self, target: Point) -> Point {
        self.boundary().edge_point(self.center(), target)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.boundary().contains(p)
    }

    pub fn resolved_colors(&self) -> ShapeColors {
        if self.is_frame() {
            return ShapeColors {
                fill: self
                    .custom_background_color
                    .unwrap_or(Color::rgb(0x2a, 0x2a, 0x2a)),
                fill_alpha: 30,
                border: self
                    .custom_text_color
                    .unwrap_or(Color::rgb(0x88, 0x88, 0x88)),
                text: self
                    .custom_text_color
                    .unwrap_or(Color::rgb(0xaa, 0xaa, 0xaa)),
            };
        }
        let (fill, border) = match (self.custom_background_color, self.meta.status) {
            (Some(custom), _) => (custom, custom.darker(120)),
            (None, Status::Done) => (Color::rgb(0x38, 0xd1, 0x56), Color::rgb(0x00, 0xff, 0x00)),
            (None, Status::InProgress) => {
                (Color::rgb(0x38, 0x8e, 0xd1), Color::rgb(0xff, 0xaa, 0x00))
            }
            (None, Status::Todo) => (
                self.shape_type().base_color(),
                Color::rgb(0x00, 0x99, 0xff),
            ),
        };
        ShapeColors {
            fill,
            fill_alpha: 255,
            border,
            text: self.custom_text_color.unwrap_or(Color::BLACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn default_sizes_per_variant() {
        let r = Shape::new(ShapeType::Rectangle, Point::new(10.0, 20.0));
        assert_eq!((r.width(), r.height()), (150.0, 80.0));
        assert_eq!(r.position(), Point::new(10.0, 20.0));
        let f = Shape::new(ShapeType::Frame, Point::ZERO);
        assert_eq!((f.width(), f.height()), (300.0, 200.0));
        assert_eq!(f.border_width(), Some(DEFAULT_BORDER_WIDTH));
        assert_eq!(f.meta().category, "General");
        assert_eq!(f.meta().title, "New Task");
    }

    #[test]
    fn type_names_accept_legacy_tags() {
        assert_eq!(ShapeType::from_name("Diamond"), Some(ShapeType::Diamond));
        assert_eq!(ShapeType::from_name("FrameShape"), Some(ShapeType::Frame));
        assert_eq!(ShapeType::from_name("Hexagon"), None);
        assert_eq!(ShapeType::from_name("Shape"), None);
    }

    #[test]
    fn color_hex_parsing() {
        assert_eq!(Color::from_hex("#0e639c"), Some(Color::rgb(0x0e, 0x63, 0x9c)));
        assert_eq!(Color::from_hex("#FFaa00"), Some(Color::rgb(0xff, 0xaa, 0x00)));
        assert_eq!(Color::from_hex("0e639c"), None);
        assert_eq!(Color::from_hex("#0e63"), None);
        assert_eq!(Color::from_hex("#zz0000"), None);
        assert_eq!(Color::rgb(0xab, 0x01, 0xff).to_hex(), "#ab01ff");
    }

    #[test]
    fn status_drives_default_colors() {
        let mut s = Shape::new(ShapeType::Circle, Point::ZERO);
        assert_eq!(s.resolved_colors().fill, Color::rgb(0xd1, 0x38, 0x38));
        let mut meta = s.meta().clone();
        meta.status = Status::Done;
        s.apply_metadata(meta);
        let colors = s.resolved_colors();
        assert_eq!(colors.fill, Color::rgb(0x38, 0xd1, 0x56));
        assert_eq!(colors.border, Color::rgb(0x00, 0xff, 0x00));
        assert_eq!(colors.text, Color::BLACK);
    }

    #[test]
    fn custom_colors_override_status() {
        let mut s = Shape::new(ShapeType::Rectangle, Point::ZERO);
        s.set_color(ColorKind::Background, Some(Color::rgb(120, 60, 240)));
        s.set_color(ColorKind::Text, Some(Color::rgb(255, 255, 255)));
        let colors = s.resolved_colors();
        assert_eq!(colors.fill, Color::rgb(120, 60, 240));
        assert_eq!(colors.border, Color::rgb(100, 50, 200));
        assert_eq!(colors.text, Color::rgb(255, 255, 255));
        s.set_color(ColorKind::Background, None);
        assert_eq!(s.resolved_colors().fill, Color::rgb(0x0e, 0x63, 0x9c));
    }

    #[test]
    fn frame_ignores_status() {
        let mut f = Shape::new(ShapeType::Frame, Point::ZERO);
        let mut meta = f.meta().clone();
        meta.status = Status::Done;
        f.apply_metadata(meta);
        let colors = f.resolved_colors();
        assert_eq!(colors.fill, Color::rgb(0x2a, 0x2a, 0x2a));
        assert_eq!(colors.fill_alpha, 30);
        assert_eq!(colors.border, Color::rgb(0x88, 0x88, 0x88));
        assert_eq!(f.display_label(), "Group");
    }

    #[test]
    fn border_width_is_clamped_and_frame_only() {
        let mut f = Shape::new(ShapeType::Frame, Point::ZERO);
        assert!(f.set_border_width(42));
        assert_eq!(f.border_width(), Some(10));
        assert!(f.set_border_width(0));
        assert_eq!(f.border_width(), Some(1));
        let mut r = Shape::new(ShapeType::Rectangle, Point::ZERO);
        assert!(!r.set_border_width(3));
        assert_eq!(r.border_width(), None);
    }

    #[test]
    fn diamond_and_triangle_boundaries() {
        let d = Shape::new(ShapeType::Diamond, Point::ZERO);
        let poly = d.boundary_polygon().unwrap();
        assert_eq!(poly[0], Point::new(60.0, 0.0));
        assert_eq!(poly[1], Point::new(120.0, 40.0));
        assert!(close(d.edge_point(Point::new(500.0, 40.0)), Point::new(120.0, 40.0)));

        let t = Shape::new(ShapeType::Triangle, Point::ZERO);
        assert_eq!(t.boundary_polygon().unwrap().len(), 3);
        assert!(close(t.edge_point(Point::new(50.0, 500.0)), Point::new(50.0, 100.0)));
        assert!(t.contains(Point::new(50.0, 60.0)));
        assert!(!t.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn circle_edge_point_and_radii() {
        let c = Shape::new(ShapeType::Circle, Point::new(100.0, 100.0));
        let (center, rx, ry) = c.center_and_radii().unwrap();
        assert_eq!(center, Point::new(150.0, 150.0));
        assert_eq!((rx, ry), (50.0, 50.0));
        assert!(c.boundary_polygon().is_none());
        assert!(close(c.edge_point(Point::new(150.0, 0.0)), Point::new(150.0, 100.0)));
    }

    #[test]
    fn resize_rejects_non_frames_and_small_bounds() {
        let mut r = Shape::new(ShapeType::Rectangle, Point::ZERO);
        assert!(matches!(
            r.resize(RectF::from_origin_size(Point::ZERO, 400.0, 400.0)),
            Err(DiagramError::NotResizable(_))
        ));

        let mut f = Shape::new(ShapeType::Frame, Point::ZERO);
        let before = f.bounds();
        assert!(matches!(
            f.resize(RectF::from_origin_size(Point::ZERO, 49.0, 300.0)),
            Err(DiagramError::InvalidResize { .. })
        ));
        assert_eq!(f.bounds(), before);
        f.resize(RectF::from_origin_size(Point::new(5.0, 5.0), 50.0, 50.0))
            .unwrap();
        assert_eq!(f.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn handle_apply_moves_expected_edges() {
        let start = RectF::from_origin_size(Point::ZERO, 300.0, 200.0);
        let r = ResizeHandle::Left.apply(start, Point::new(20.0, 99.0));
        assert_eq!(r, RectF::from_min_max(Point::new(20.0, 0.0), Point::new(300.0, 200.0)));
        let r = ResizeHandle::TopRight.apply(start, Point::new(10.0, -10.0));
        assert_eq!(r, RectF::from_min_max(Point::new(0.0, -10.0), Point::new(310.0, 200.0)));
    }

    #[test]
    fn handle_apply_normalizes_past_opposite_edge() {
        let start = RectF::from_origin_size(Point::ZERO, 300.0, 200.0);
        let r = ResizeHandle::Right.apply(start, Point::new(-400.0, 0.0));
        assert_eq!(r.min, Point::new(-100.0, 0.0));
        assert_eq!(r.max, Point::new(0.0, 200.0));
        assert!(r.is_valid());
    }

    #[test]
    fn handle_lookup_uses_handle_squares() {
        let rect = RectF::from_origin_size(Point::ZERO, 300.0, 200.0);
        assert_eq!(
            ResizeHandle::at(&rect, Point::new(302.0, 198.0), 10.0),
            Some(ResizeHandle::BottomRight)
        );
        assert_eq!(
            ResizeHandle::at(&rect, Point::new(150.0, -3.0), 10.0),
            Some(ResizeHandle::Top)
        );
        assert_eq!(ResizeHandle::at(&rect, Point::new(150.0, 100.0), 10.0), None);
        assert_eq!(ResizeHandle::BottomRight.name(), "bottom_right");
    }
}
