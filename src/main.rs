mod app;

fn main() -> eframe::Result<()> {
    let (settings, skipped) = taskboard::settings::load_or_default();
    taskboard::init_logging(&settings.log_filter);
    for err in &skipped {
        tracing::warn!(%err, "ignoring settings file");
    }
    tracing::info!(version = taskboard::VERSION, "starting taskboard");

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Taskboard",
        native_options,
        Box::new(|cc| Ok(Box::new(app::TaskboardApp::new(cc, settings)))),
    )
}
