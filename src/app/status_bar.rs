use eframe::egui;

use lumberjack_range::QueryStore;

use crate::app::App;

pub fn draw_status_bar(app: &App, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                use egui::Align;

                let (status, is_error) = compute_status(app);

                if is_error {
                    ui.colored_label(egui::Color32::RED, status);
                } else {
                    ui.label(status);
                }

                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    let link = format!("?{}", app.store.read().to_query_string());
                    if ui.small_button("Copy link").clicked() {
                        ui.ctx().copy_text(link.clone());
                    }
                    ui.monospace(link);
                });
            });
        });
}

fn compute_status(app: &App) -> (String, bool) {
    if app.is_fetching {
        ("Fetching logs…".to_string(), false)
    } else if app.is_loading_groups {
        ("Loading log groups…".to_string(), false)
    } else if let Some(err) = &app.last_error {
        let msg = if err.chars().count() > 120 {
            let head: String = err.chars().take(117).collect();
            format!("Error: {head}…")
        } else {
            format!("Error: {err}")
        };
        (msg, true)
    } else if app.logs_view.log_group.trim().is_empty() {
        ("Select a log group".to_string(), false)
    } else if let Some(info) = &app.last_info {
        (info.clone(), false)
    } else {
        ("Ready".to_string(), false)
    }
}
