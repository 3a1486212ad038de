use eframe::egui;

// --- Sizing ---
pub const TAB_MAX_WIDTH: f32 = 180.0;
pub const STATUS_BAR_HEIGHT: f32 = 22.0;
/// Line height of tab content relative to the font size
pub const LINE_HEIGHT_RATIO: f32 = 1.3;

// --- Modals ---
pub const MODAL_MIN_WIDTH: f32 = 300.0;
pub const MODAL_WIDTH_RATIO: f32 = 0.8;
pub const MODAL_HEIGHT_RATIO: f32 = 0.8;

// --- Colors ---
pub const MATCH_BG: egui::Color32 = egui::Color32::from_rgb(90, 80, 20);
pub const CURRENT_MATCH_BG: egui::Color32 = egui::Color32::from_rgb(200, 140, 20);
pub const INPUT_FG: egui::Color32 = egui::Color32::from_rgb(120, 200, 255);

// --- Helper functions ---

/// Popup width: the preferred width, shrunk to fit small windows.
pub fn modal_width(ctx: &egui::Context, preferred: f32) -> f32 {
    let width = ctx.input(|i| {
        i.viewport()
            .inner_rect
            .map(|r| r.width())
            .unwrap_or(800.0)
    });
    preferred.min(width * MODAL_WIDTH_RATIO).max(MODAL_MIN_WIDTH)
}

pub fn modal_max_height(ctx: &egui::Context, preferred: f32) -> f32 {
    let height = ctx.input(|i| {
        i.viewport()
            .inner_rect
            .map(|r| r.height())
            .unwrap_or(600.0)
    });
    preferred.min(height * MODAL_HEIGHT_RATIO)
}

pub fn truncated_label(
    ui: &mut egui::Ui,
    text: impl Into<egui::WidgetText>,
) -> egui::Response {
    ui.add(egui::Label::new(text).truncate())
}
