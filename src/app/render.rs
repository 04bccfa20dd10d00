use eframe::egui;
use std::f32::consts::TAU;
use taskboard::model::{Boundary, ResizeHandle};
use taskboard::{Document, Interaction, Point, RectF, Shape, Tool};

use super::{View, to_color32};

const ELLIPSE_SEGMENTS: usize = 48;
const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 255, 0);

pub(super) fn tool_button(ui: &mut egui::Ui, label: &str, tool: Tool, selected: &mut Tool) {
    let active = *selected == tool;
    if ui.selectable_label(active, label).clicked() {
        *selected = tool;
    }
}

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect, view: &View) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(0x1e, 0x1e, 0x1e));
    let grid_color = egui::Color32::from_gray(45);
    let spacing_screen = 50.0 * view.zoom;
    if spacing_screen < 16.0 {
        return;
    }
    let start = rect.min + view.pan_screen;
    let mut x = ((rect.min.x - start.x) / spacing_screen).floor() * spacing_screen + start.x;
    while x < rect.max.x {
        painter.line_segment(
            [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
            egui::Stroke::new(1.0, grid_color),
        );
        x += spacing_screen;
    }
    let mut y = ((rect.min.y - start.y) / spacing_screen).floor() * spacing_screen + start.y;
    while y < rect.max.y {
        painter.line_segment(
            [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
            egui::Stroke::new(1.0, grid_color),
        );
        y += spacing_screen;
    }
}

fn outline_screen(origin: egui::Pos2, view: &View, shape: &Shape) -> Vec<egui::Pos2> {
    match shape.boundary() {
        Boundary::Polygon(points) => points
            .into_iter()
            .map(|p| view.world_to_screen(origin, p))
            .collect(),
        Boundary::Ellipse {
            center,
            radius_x,
            radius_y,
        } => (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let t = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
                let p = Point::new(center.x + radius_x * t.cos(), center.y + radius_y * t.sin());
                view.world_to_screen(origin, p)
            })
            .collect(),
    }
}

fn draw_text(
    painter: &egui::Painter,
    pos: egui::Pos2,
    anchor: egui::Align2,
    text: &str,
    size: f32,
    color: egui::Color32,
) {
    if text.is_empty() {
        return;
    }
    painter.text(pos, anchor, text, egui::FontId::proportional(size), color);
}

/// Frames first so every task shape paints on top of them.
pub(super) fn draw_shapes(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    doc: &Document,
    interaction: &Interaction,
) {
    for shape in doc.shapes_in_draw_order() {
        let selected = interaction.is_selected(shape.id());
        let mut colors = shape.resolved_colors();
        if selected {
            colors = colors.highlighted();
        }
        let points = outline_screen(origin, view, shape);
        let fill = to_color32(colors.fill, colors.fill_alpha);
        let text_color = to_color32(colors.text, 255);
        let bounds = shape.bounds();
        let min = view.world_to_screen(origin, bounds.min);
        let center = view.world_to_screen(origin, bounds.center());

        if let Some(border_width) = shape.border_width() {
            let border = if selected {
                SELECTION_COLOR
            } else {
                to_color32(colors.border, 255)
            };
            painter.add(egui::Shape::convex_polygon(
                points.clone(),
                fill,
                egui::Stroke::NONE,
            ));
            let stroke = egui::Stroke::new(border_width as f32 * view.zoom, border);
            let dashes = egui::Shape::dashed_line(
                &[points.as_slice(), &points[..1]].concat(),
                stroke,
                10.0 * view.zoom,
                5.0 * view.zoom,
            );
            painter.extend(dashes);
            draw_text(
                painter,
                min + egui::vec2(10.0, 10.0) * view.zoom,
                egui::Align2::LEFT_TOP,
                shape.display_label(),
                16.0 * view.zoom,
                text_color,
            );
            continue;
        }

        let border = if selected {
            SELECTION_COLOR
        } else {
            to_color32(colors.border, 255)
        };
        painter.add(egui::Shape::convex_polygon(
            points,
            fill,
            egui::Stroke::new(3.0 * view.zoom, border),
        ));
        draw_text(
            painter,
            center - egui::vec2(0.0, bounds.height() * 0.25 * view.zoom),
            egui::Align2::CENTER_CENTER,
            shape.category(),
            10.0 * view.zoom,
            text_color,
        );
        draw_text(
            painter,
            center,
            egui::Align2::CENTER_CENTER,
            shape.title(),
            13.0 * view.zoom,
            text_color,
        );
    }
}

pub(super) fn draw_connections(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    doc: &Document,
    arrow_size: f32,
) {
    let color = egui::Color32::WHITE;
    let stroke = egui::Stroke::new(3.0 * view.zoom, color);
    for conn in doc.connections() {
        let (a, b) = conn.endpoints();
        painter.line_segment(
            [view.world_to_screen(origin, a), view.world_to_screen(origin, b)],
            stroke,
        );
        if let Some(head) = conn.arrow_head(arrow_size) {
            let head = head.map(|p| view.world_to_screen(origin, p)).to_vec();
            painter.add(egui::Shape::convex_polygon(head, color, egui::Stroke::NONE));
        }
    }
}

/// Resize handles on every selected frame.
pub(super) fn draw_handles(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    doc: &Document,
    interaction: &Interaction,
) {
    let size = interaction.handle_size();
    for id in interaction.selection() {
        let Some(shape) = doc.shape(*id).filter(|s| s.is_frame()) else {
            continue;
        };
        let bounds = shape.bounds();
        for handle in ResizeHandle::ALL {
            let r = handle.hit_rect(&bounds, size);
            let screen = egui::Rect::from_min_max(
                view.world_to_screen(origin, r.min),
                view.world_to_screen(origin, r.max),
            );
            painter.rect(
                screen,
                0.0,
                egui::Color32::from_rgb(255, 255, 0),
                egui::Stroke::new(1.0, egui::Color32::BLACK),
                egui::StrokeKind::Middle,
            );
        }
    }
}

pub(super) fn draw_transient_line(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    from: Point,
    to: Point,
) {
    let stroke = egui::Stroke::new(2.0, egui::Color32::from_gray(200));
    let points = [view.world_to_screen(origin, from), view.world_to_screen(origin, to)];
    painter.extend(egui::Shape::dashed_line(&points, stroke, 6.0, 4.0));
}

pub(super) fn draw_selection_area(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    area: RectF,
) {
    let r = egui::Rect::from_two_pos(
        view.world_to_screen(origin, area.min),
        view.world_to_screen(origin, area.max),
    );
    painter.rect_filled(r, 0.0, egui::Color32::from_rgba_unmultiplied(90, 160, 255, 30));
    let s = egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255));
    painter.rect_stroke(r, 0.0, s, egui::StrokeKind::Middle);
}
