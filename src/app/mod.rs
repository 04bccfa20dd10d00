use eframe::egui;
use std::path::PathBuf;
use taskboard::settings::{self, AppSettings};
use taskboard::{
    Color, ColorKind, Document, Interaction, Point, ShapeId, Status, TaskMeta, doc_format,
};

mod render;
mod update;

#[derive(Clone, Copy, Debug)]
struct View {
    pan_screen: egui::Vec2,
    zoom: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan_screen: egui::Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl View {
    fn world_to_screen(&self, origin: egui::Pos2, world: Point) -> egui::Pos2 {
        origin + self.pan_screen + egui::vec2(world.x, world.y) * self.zoom
    }

    fn screen_to_world(&self, origin: egui::Pos2, screen: egui::Pos2) -> Point {
        let v = (screen - origin - self.pan_screen) / self.zoom;
        Point::new(v.x, v.y)
    }

    fn zoom_about_screen_point(
        &mut self,
        origin: egui::Pos2,
        screen_point: egui::Pos2,
        zoom_delta: f32,
    ) {
        let before = self.screen_to_world(origin, screen_point);
        self.zoom = (self.zoom * zoom_delta).clamp(0.1, 8.0);
        let after_screen = self.world_to_screen(origin, before);
        self.pan_screen += screen_point - after_screen;
    }
}

fn to_color32(color: Color, alpha: u8) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

/// Working copy of a shape's fields while the edit window is open.
#[derive(Clone, Debug)]
struct EditDialog {
    shape: ShapeId,
    title: String,
    category: String,
    description: String,
    status: Status,
    /// Present only when editing a frame.
    border_width: Option<u32>,
}

impl EditDialog {
    fn for_shape(doc: &Document, id: ShapeId) -> Option<Self> {
        let shape = doc.shape(id)?;
        let meta = shape.meta();
        // Frames show their label, which reads "Group" until renamed.
        Some(Self {
            shape: id,
            title: meta.title.clone(),
            category: shape.display_label().to_string(),
            description: meta.description.clone(),
            status: meta.status,
            border_width: shape.border_width(),
        })
    }

    fn meta(&self) -> TaskMeta {
        TaskMeta {
            title: self.title.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

pub struct TaskboardApp {
    doc: Document,
    interaction: Interaction,
    view: View,
    settings: AppSettings,
    settings_path: PathBuf,
    /// Current document file, set after a successful open or save.
    document_path: Option<PathBuf>,
    status: Option<String>,
    edit: Option<EditDialog>,
    background_pick: [u8; 3],
    text_pick: [u8; 3],
}

impl TaskboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let mut interaction = Interaction::new(settings.handle_size);
        interaction.set_tool(settings.tool());
        Self {
            doc: Document::new(),
            interaction,
            view: View::default(),
            settings,
            settings_path: settings::settings_path(),
            document_path: None,
            status: None,
            edit: None,
            background_pick: [0x0e, 0x63, 0x9c],
            text_pick: [0xff, 0xff, 0xff],
        }
    }

    fn replace_document(&mut self, doc: Document) {
        self.doc = doc;
        self.interaction.reset();
        self.edit = None;
    }

    fn load_from(&mut self, path: PathBuf) {
        let result = std::fs::File::open(&path)
            .map_err(taskboard::DiagramError::from)
            .and_then(|file| doc_format::read_document(std::io::BufReader::new(file)));
        match result {
            Ok(doc) => {
                self.replace_document(doc);
                self.status = Some(format!("Loaded {}", path.display()));
                self.remember_path(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "load failed");
                self.status = Some(format!("Load failed: {e}"));
            }
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        let result = std::fs::File::create(&path)
            .map_err(taskboard::DiagramError::from)
            .and_then(|file| doc_format::write_document(std::io::BufWriter::new(file), &self.doc));
        match result {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
                self.remember_path(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "save failed");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    fn remember_path(&mut self, path: PathBuf) {
        self.settings.file_path = path.display().to_string();
        self.document_path = Some(path);
        self.persist_settings();
    }

    fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.load_from(path);
        }
    }

    fn save(&mut self) {
        match self.document_path.clone() {
            Some(path) => self.save_to(path),
            None => self.save_as_dialog(),
        }
    }

    fn save_as_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.file_path)
            .add_filter("JSON", &["json"])
            .save_file()
        {
            self.save_to(path);
        }
    }

    fn clear(&mut self) {
        self.doc.clear();
        self.interaction.reset();
        self.edit = None;
        self.status = Some("Cleared".to_string());
    }

    fn persist_settings(&mut self) {
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings) {
            self.status = Some(format!("Settings save failed: {e}"));
        }
    }

    fn selected_ids(&self) -> Vec<ShapeId> {
        self.interaction.selection().iter().copied().collect()
    }

    fn set_selection_color(&mut self, kind: ColorKind, color: Option<Color>) {
        for id in self.selected_ids() {
            if let Err(e) = self.doc.set_color(id, kind, color) {
                tracing::warn!(error = %e, "colour change skipped");
            }
        }
    }

    fn reset_selection_colors(&mut self) {
        self.set_selection_color(ColorKind::Background, None);
        self.set_selection_color(ColorKind::Text, None);
    }

    /// Adds `delta` to the border width of every selected frame.
    fn adjust_border_width(&mut self, delta: i32) {
        for id in self.selected_ids() {
            let Some(current) = self.doc.shape(id).and_then(|s| s.border_width()) else {
                continue;
            };
            let width = current.saturating_add_signed(delta);
            if let Err(e) = self.doc.set_border_width(id, width) {
                tracing::warn!(error = %e, "border change skipped");
            }
        }
    }

    fn open_editor(&mut self, id: ShapeId) {
        self.edit = EditDialog::for_shape(&self.doc, id);
    }

    fn commit_edit(&mut self, dialog: EditDialog) {
        let result = self
            .doc
            .apply_metadata(dialog.shape, dialog.meta())
            .and_then(|()| match dialog.border_width {
                Some(width) => self.doc.set_border_width(dialog.shape, width).map(|_| ()),
                None => Ok(()),
            });
        if let Err(e) = result {
            self.status = Some(format!("Edit failed: {e}"));
        }
    }
}
