use eframe::egui;
use taskboard::model::{MAX_BORDER_WIDTH, MIN_BORDER_WIDTH};
use taskboard::{Color, ColorKind, Effect, InputEvent, Status, Tool};

use super::render::{
    draw_background, draw_connections, draw_handles, draw_selection_area, draw_shapes,
    draw_transient_line, tool_button,
};
use super::{EditDialog, TaskboardApp};

impl eframe::App for TaskboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        let mut events = Vec::new();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                self.save();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                self.open_dialog();
            }
            if wants_keyboard || self.edit.is_some() {
                return;
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                self.interaction.set_tool(Tool::Select);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                events.push(InputEvent::Delete);
            }
        });
        for event in events {
            let effect = self.interaction.handle(&mut self.doc, event);
            self.apply_effect(effect);
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (⌘O)").clicked() {
                        self.open_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Save (⌘S)").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        self.save_as_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(!self.doc.is_empty(), egui::Button::new("Clear"))
                        .clicked()
                    {
                        self.clear();
                        ui.close_menu();
                    }
                });
            });
            ui.horizontal(|ui| {
                let mut tool = self.interaction.tool();
                for t in Tool::ALL {
                    tool_button(ui, t.name(), t, &mut tool);
                }
                if tool != self.interaction.tool() {
                    self.interaction.set_tool(tool);
                }
            });
            ui.horizontal(|ui| {
                let has_selection = !self.interaction.selection().is_empty();
                ui.label("Background");
                ui.color_edit_button_srgb(&mut self.background_pick);
                if ui
                    .add_enabled(has_selection, egui::Button::new("Apply"))
                    .clicked()
                {
                    let [r, g, b] = self.background_pick;
                    self.set_selection_color(ColorKind::Background, Some(Color::rgb(r, g, b)));
                }
                ui.separator();
                ui.label("Text");
                ui.color_edit_button_srgb(&mut self.text_pick);
                if ui
                    .add_enabled(has_selection, egui::Button::new("Apply"))
                    .clicked()
                {
                    let [r, g, b] = self.text_pick;
                    self.set_selection_color(ColorKind::Text, Some(Color::rgb(r, g, b)));
                }
                ui.separator();
                if ui
                    .add_enabled(has_selection, egui::Button::new("Reset colours"))
                    .clicked()
                {
                    self.reset_selection_colors();
                }
                ui.separator();
                ui.label("Border");
                if ui
                    .add_enabled(has_selection, egui::Button::new("-"))
                    .clicked()
                {
                    self.adjust_border_width(-1);
                }
                if ui
                    .add_enabled(has_selection, egui::Button::new("+"))
                    .clicked()
                {
                    self.adjust_border_width(1);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Zoom: {:.0}%", self.view.zoom * 100.0));
                    ui.separator();
                    ui.label(format!("Connections: {}", self.doc.connection_count()));
                    ui.separator();
                    ui.label(format!("Shapes: {}", self.doc.shape_count()));
                    ui.separator();
                    ui.label(format!("Selected: {}", self.interaction.selection().len()));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let origin = rect.min;

            let scroll_delta = ctx.input(|i| i.raw_scroll_delta.y);
            if scroll_delta.abs() > 0.0 {
                if let Some(hover_pos) = ctx.input(|i| i.pointer.hover_pos()) {
                    if rect.contains(hover_pos) {
                        let zoom_delta = (1.0 + scroll_delta * 0.001).clamp(0.8, 1.25);
                        self.view.zoom_about_screen_point(origin, hover_pos, zoom_delta);
                    }
                }
            }
            if response.dragged_by(egui::PointerButton::Middle) {
                self.view.pan_screen += response.drag_delta();
            }

            let to_world = |p: egui::Pos2| self.view.screen_to_world(origin, p);
            let pointer_world = ctx.input(|i| i.pointer.interact_pos()).map(to_world);
            let press_world = ctx.input(|i| i.pointer.press_origin()).map(to_world);

            let mut events = Vec::new();
            if response.double_clicked() {
                events.extend(pointer_world.map(InputEvent::DoubleClick));
            } else if response.clicked() {
                if let Some(p) = pointer_world {
                    events.push(InputEvent::PointerDown(p));
                    events.push(InputEvent::PointerUp(p));
                }
            } else {
                if response.drag_started_by(egui::PointerButton::Primary) {
                    events.extend(press_world.or(pointer_world).map(InputEvent::PointerDown));
                }
                if response.dragged_by(egui::PointerButton::Primary)
                    && response.drag_delta() != egui::Vec2::ZERO
                {
                    events.extend(pointer_world.map(InputEvent::PointerMove));
                }
                if response.drag_stopped_by(egui::PointerButton::Primary) {
                    events.extend(pointer_world.map(InputEvent::PointerUp));
                }
            }
            for event in events {
                let effect = self.interaction.handle(&mut self.doc, event);
                self.apply_effect(effect);
            }

            let painter = ui.painter_at(rect);
            draw_background(&painter, rect, &self.view);
            draw_shapes(&painter, origin, &self.view, &self.doc, &self.interaction);
            draw_connections(&painter, origin, &self.view, &self.doc, self.settings.arrow_size);
            draw_handles(&painter, origin, &self.view, &self.doc, &self.interaction);
            if let Some((a, b)) = self.interaction.transient_line() {
                draw_transient_line(&painter, origin, &self.view, a, b);
            }
            if let Some(area) = self.interaction.selection_area() {
                draw_selection_area(&painter, origin, &self.view, area);
            }
        });

        self.show_edit_dialog(ctx);
    }
}

impl TaskboardApp {
    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ShapePlaced(id) => {
                self.interaction.select_only(id);
                self.status = Some(format!("Placed shape {id}"));
            }
            Effect::Connected(id) => self.status = Some(format!("Connection {id} added")),
            Effect::Deleted(ids) => self.status = Some(format!("Deleted {} shape(s)", ids.len())),
            Effect::EditRequested(id) => self.open_editor(id),
            Effect::Moved(_)
            | Effect::Resized(_)
            | Effect::SelectionChanged
            | Effect::Ignored
            | Effect::None => {}
        }
    }

    fn show_edit_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.edit.as_mut() else {
            return;
        };
        let mut confirmed = false;
        let mut cancelled = false;
        let is_frame = dialog.border_width.is_some();
        let title = if is_frame { "Frame Properties" } else { "Edit Task" };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                edit_fields(ui, dialog);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });
        if confirmed {
            if let Some(dialog) = self.edit.take() {
                self.commit_edit(dialog);
            }
        } else if cancelled {
            self.edit = None;
        }
    }
}

fn edit_fields(ui: &mut egui::Ui, dialog: &mut EditDialog) {
    egui::Grid::new("edit_fields")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            if let Some(width) = dialog.border_width.as_mut() {
                ui.label("Label");
                ui.text_edit_singleline(&mut dialog.category);
                ui.end_row();
                ui.label("Border width");
                ui.add(egui::Slider::new(width, MIN_BORDER_WIDTH..=MAX_BORDER_WIDTH));
                ui.end_row();
                return;
            }
            ui.label("Title");
            ui.text_edit_singleline(&mut dialog.title);
            ui.end_row();
            ui.label("Category");
            ui.text_edit_singleline(&mut dialog.category);
            ui.end_row();
            ui.label("Description");
            ui.text_edit_multiline(&mut dialog.description);
            ui.end_row();
            ui.label("Status");
            egui::ComboBox::from_id_salt("edit_status")
                .selected_text(dialog.status.label())
                .show_ui(ui, |ui| {
                    for status in Status::ALL {
                        ui.selectable_value(&mut dialog.status, status, status.label());
                    }
                });
            ui.end_row();
        });
}
