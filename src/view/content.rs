// Tab content rendering

use crate::app::Browser;
use crate::state::{FindState, LoadState, TabKind};
use crate::style;
use eframe::egui;
use egui::text::LayoutJob;

impl Browser {
    pub(crate) fn render_content(&mut self, ctx: &egui::Context) {
        let font_size = self.config.ui.font_size;
        let jump = std::mem::take(&mut self.scroll_dirty);

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(tab) = self.tabs.get_active_mut() else {
                ui.centered_and_justified(|ui| {
                    ui.label("No tabs. Type :open followed by an address.");
                });
                return;
            };

            match &tab.kind {
                TabKind::Web { url } => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading(&tab.title);
                        if let Some(url) = url {
                            ui.label(url.as_str());
                            if ui.button("Open in system browser").clicked() {
                                if let Err(e) = open::that(url.as_str()) {
                                    tracing::warn!(%url, error = %e, "failed to open url");
                                }
                            }
                        }
                        ui.add_space(10.0);
                        match &tab.load {
                            LoadState::Error(reason) => {
                                ui.colored_label(egui::Color32::RED, reason);
                            }
                            LoadState::Loading { progress } => {
                                ui.add(
                                    egui::ProgressBar::new(f32::from(*progress) / 100.0)
                                        .desired_width(240.0),
                                );
                            }
                            LoadState::Idle | LoadState::Finished => {}
                        }
                    });
                }
                TabKind::Text { content, .. } => {
                    let job = highlighted(content, tab.find.as_ref(), font_size);
                    let mut area = egui::ScrollArea::both()
                        .id_salt(("tab_content", tab.id.0))
                        .auto_shrink([false, false]);
                    if jump {
                        area = area.vertical_scroll_offset(tab.scroll);
                    }
                    let output = area.show(ui, |ui| {
                        ui.add(egui::Label::new(job).selectable(true));
                    });
                    tab.scroll = output.state.offset.y;
                }
            }
        });
    }
}

/// Content as monospace text with search matches painted behind.
fn highlighted(content: &str, find: Option<&FindState>, font_size: f32) -> LayoutJob {
    let font = egui::FontId::monospace(font_size);
    let plain = egui::TextFormat {
        font_id: font,
        color: egui::Color32::LIGHT_GRAY,
        ..Default::default()
    };

    let mut job = LayoutJob::default();
    let Some(find) = find.filter(|f| !f.matches.is_empty()) else {
        job.append(content, 0.0, plain);
        return job;
    };

    let mut cursor = 0;
    for (index, range) in find.matches.iter().enumerate() {
        if range.start < cursor {
            continue;
        }
        let (Some(before), Some(matched)) = (
            content.get(cursor..range.start),
            content.get(range.clone()),
        ) else {
            continue;
        };
        if !before.is_empty() {
            job.append(before, 0.0, plain.clone());
        }
        let background = if find.current == Some(index) {
            style::CURRENT_MATCH_BG
        } else {
            style::MATCH_BG
        };
        job.append(
            matched,
            0.0,
            egui::TextFormat {
                background,
                color: egui::Color32::WHITE,
                ..plain.clone()
            },
        );
        cursor = range.end;
    }
    if let Some(rest) = content.get(cursor..).filter(|rest| !rest.is_empty()) {
        job.append(rest, 0.0, plain);
    }
    job
}
