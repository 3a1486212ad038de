// Popup rendering (Open File, Warning, Find)

use crate::app::Browser;
use crate::popup::{FindPopup, LabelPopup, OpenFilePopup, Popup};
use crate::state::FindDirection;
use crate::style;
use eframe::egui;
use std::time::Instant;

impl Browser {
    pub(crate) fn render_popups(&mut self, ctx: &egui::Context) {
        let policy = self.popups.size_policy();
        let Some(popup) = self.popups.visible_mut() else {
            return;
        };

        egui::Window::new(popup.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(style::modal_width(ctx, policy.width))
            .show(ctx, |ui| {
                ui.set_max_height(style::modal_max_height(ctx, policy.max_height));
                match popup {
                    Popup::OpenFile(p) => render_open_file(ui, p),
                    Popup::Warning(p) => render_warning(ui, p),
                    Popup::Find(p) => render_find(ui, p),
                }
            });
    }
}

fn enter_pressed(ui: &egui::Ui, response: &egui::Response) -> bool {
    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
}

fn render_open_file(ui: &mut egui::Ui, popup: &mut OpenFilePopup) {
    ui.label("Path of the file to open:");
    ui.add_space(5.0);

    let response = ui.add(
        egui::TextEdit::singleline(&mut popup.path)
            .desired_width(f32::INFINITY)
            .font(egui::TextStyle::Monospace),
    );
    if popup.focus {
        response.request_focus();
        popup.focus = false;
    }
    if enter_pressed(ui, &response) {
        popup.submit();
        return;
    }

    let completions = popup.completions().to_vec();
    if !completions.is_empty() {
        ui.add_space(5.0);
        egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
            for name in &completions {
                if ui.selectable_label(false, name).clicked() {
                    popup.apply_completion(name);
                }
            }
        });
    }

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if ui.button("Open").clicked() {
            popup.submit();
        }
        if ui.button("Cancel").clicked() {
            popup.cancel();
        }
    });
}

fn render_warning(ui: &mut egui::Ui, popup: &mut LabelPopup) {
    ui.colored_label(egui::Color32::YELLOW, &popup.text);
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if ui.button("OK").clicked() {
            popup.dismiss();
        }
        if let Some(remaining) = popup.remaining(Instant::now()) {
            ui.weak(format!("closing in {}s", remaining.as_secs() + 1));
        }
    });
}

fn render_find(ui: &mut egui::Ui, popup: &mut FindPopup) {
    ui.label("Find in page:");
    ui.add_space(5.0);

    let response = ui.add(
        egui::TextEdit::singleline(&mut popup.settings.text).desired_width(f32::INFINITY),
    );
    if popup.focus {
        response.request_focus();
        popup.focus = false;
    }
    if enter_pressed(ui, &response) {
        popup.submit();
        return;
    }

    ui.add_space(10.0);
    ui.label("Options:");
    ui.checkbox(&mut popup.settings.case_sensitive, "Case sensitive");
    ui.checkbox(&mut popup.settings.match_full_word, "Match whole word");
    ui.horizontal(|ui| {
        ui.radio_value(&mut popup.settings.direction, FindDirection::Down, "Down");
        ui.radio_value(&mut popup.settings.direction, FindDirection::Up, "Up");
    });

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if ui.button("Find").clicked() {
            popup.submit();
        }
        if ui.button("Cancel").clicked() {
            popup.cancel();
        }
    });
}
