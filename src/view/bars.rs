// Menu bar, tab bar and status bar

use crate::app::Browser;
use crate::state::{Mode, PostprocessPolicy};
use crate::style;
use eframe::egui;

impl Browser {
    pub(crate) fn render_menu_bar(&mut self, ctx: &egui::Context) {
        if !self.ui.show_menu_bar {
            return;
        }

        // Menu entries go through the controller like their shortcuts do
        let mut requested: Option<Mode> = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open File…").clicked() {
                        requested = Some(Mode::OpenFile);
                    }
                    if ui.button("New Tab").clicked() {
                        requested = Some(Mode::OpenTab);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        requested = Some(Mode::Quit);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui.button("Find…").clicked() {
                        requested = Some(Mode::Find);
                    }
                    if ui.button("Find Next").clicked() {
                        requested = Some(Mode::FindDown);
                    }
                    if ui.button("Find Previous").clicked() {
                        requested = Some(Mode::FindUp);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Hide Menu Bar").clicked() {
                        requested = Some(Mode::ToggleMenuBar);
                    }
                    if ui.button("Refresh").clicked() {
                        requested = Some(Mode::RefreshTab);
                    }
                });
                ui.menu_button("History", |ui| {
                    if ui.button("Back").clicked() {
                        requested = Some(Mode::HistoryPrev);
                    }
                    if ui.button("Forward").clicked() {
                        requested = Some(Mode::HistoryNext);
                    }
                });
            });
        });

        if let Some(mode) = requested {
            self.controller
                .request_transition(mode, PostprocessPolicy::Postprocess, None);
        }
    }

    pub(crate) fn render_tab_bar(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (index, tab) in self.tabs.tabs.iter().enumerate() {
                    let selected = index == self.tabs.active_tab;
                    let title = if tab.load.is_loading() {
                        format!("{} ⟳", index + 1)
                    } else {
                        format!("{} {}", index + 1, tab.title)
                    };
                    ui.scope(|ui| {
                        ui.set_max_width(style::TAB_MAX_WIDTH);
                        if ui
                            .selectable_label(selected, title)
                            .on_hover_text(tab.location())
                            .clicked()
                        {
                            clicked = Some(index);
                        }
                    });
                }
            });
        });
        if let Some(index) = clicked {
            self.tabs.switch_to_tab(index);
        }
    }

    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(style::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(&self.ui.input_text)
                            .monospace()
                            .color(style::INPUT_FG),
                    );
                    if let Some((err, _)) = &self.ui.error_message {
                        ui.colored_label(egui::Color32::RED, err);
                    } else if let Some((info, _)) = &self.ui.info_message {
                        ui.label(info);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(self.tabs.info());
                        if let Some(tab) = self.tabs.get_active() {
                            let load = tab.load.status_text();
                            if !load.is_empty() {
                                ui.separator();
                                ui.label(load);
                            }
                            if let Some(find) = &tab.find {
                                ui.separator();
                                ui.label(find.summary());
                            }
                            ui.separator();
                            style::truncated_label(ui, tab.location());
                        }
                    });
                });
            });
    }
}
