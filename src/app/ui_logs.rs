use eframe::egui;

use lumberjack_range::toolbar::datetime::format_timestamp_millis;

use crate::app::App;
use crate::app::state::{Theme, try_pretty_json};

pub fn draw_logs_view(app: &mut App, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label("Filter (CloudWatch pattern):");
        let filter_response =
            ui.add(egui::TextEdit::singleline(&mut app.logs_view.filter_text).desired_width(250.0));

        if filter_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            app.refresh();
        }

        ui.separator();

        ui.checkbox(&mut app.logs_view.show_local_time, "Local time");
    });

    ui.separator();

    let retro = app.theme == Theme::RetroGreen;
    let show_local_time = app.logs_view.show_local_time;

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for entry in &app.logs_view.entries {
                let ts_formatted = format_timestamp_millis(entry.timestamp_millis, show_local_time);
                let level_color = level_color(&entry.message, retro);

                let header = match &entry.log_stream_name {
                    Some(stream) => format!("[{}] ({})", ts_formatted, stream),
                    None => format!("[{}]", ts_formatted),
                };

                ui.colored_label(egui::Color32::LIGHT_BLUE, header);

                if let Some(mut pretty_json) = try_pretty_json(&entry.message) {
                    ui.add(
                        egui::TextEdit::multiline(&mut pretty_json)
                            .font(egui::TextStyle::Monospace)
                            .text_color(level_color)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                } else {
                    ui.label(egui::RichText::new(&entry.message).color(level_color));
                }

                ui.separator();
            }
        });
}

fn level_color(message: &str, retro: bool) -> egui::Color32 {
    if retro {
        if message.contains("ERROR") {
            egui::Color32::from_rgb(0xff, 0x40, 0x40)
        } else if message.contains("WARN") {
            egui::Color32::from_rgb(0xff, 0xff, 0x80)
        } else {
            egui::Color32::from_rgb(0x00, 0xff, 0x66)
        }
    } else if message.contains("ERROR") {
        egui::Color32::RED
    } else if message.contains("WARN") {
        egui::Color32::YELLOW
    } else if message.contains("INFO") {
        egui::Color32::LIGHT_GREEN
    } else {
        egui::Color32::WHITE
    }
}
