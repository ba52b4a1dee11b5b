//! egui rendering of the time-range toolbar.

use chrono::{Datelike, NaiveDate, Utc};
use eframe::egui;

use lumberjack_range::toolbar::custom_range::{Bound, DateTimeField};
use lumberjack_range::toolbar::datetime::TimeOfDay;
use lumberjack_range::{LogToolbar, QueryStore, RangeSelection};

use crate::app::App;

pub fn draw_toolbar(app: &mut App, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let all_past_loaded = app.logs_view.all_past_logs_loaded;
        let older = ui.add_enabled(
            LogToolbar::load_older_enabled(all_past_loaded),
            egui::Button::new(LogToolbar::load_older_label(all_past_loaded)),
        );
        if older.clicked() {
            LogToolbar::press_load_older(all_past_loaded, || app.load_past_log_interval());
        }

        let query = app.store.read();
        let newer = ui.add_enabled(
            LogToolbar::load_newer_enabled(&query),
            egui::Button::new(lumberjack_range::toolbar::LOAD_NEWER_LABEL),
        );
        if newer.clicked() {
            LogToolbar::press_load_newer(&query, || app.load_newer_log_interval());
        }

        ui.separator();

        let mut picked = None;
        egui::ComboBox::from_id_salt("time_range_combo")
            .selected_text(app.selected_range.label())
            .show_ui(ui, |ui| {
                for option in RangeSelection::options() {
                    let selected = app.selected_range == option;
                    if ui.selectable_label(selected, option.label()).clicked() {
                        picked = Some(option);
                    }
                }
            });
        if let Some(range) = picked {
            app.select_range(range);
        }

        if app.selected_range.is_custom() {
            draw_field(app, ui, Bound::Start, "Start");
            ui.label("to");
            draw_field(app, ui, Bound::End, "End");

            if ui.button("Search").clicked() {
                app.search_custom_range();
            }
        }
    });
}

fn draw_field(app: &mut App, ui: &mut egui::Ui, bound: Bound, placeholder: &str) {
    let display = app.toolbar.field_display(bound);
    let text = if display.is_empty() {
        egui::RichText::new(placeholder).weak()
    } else {
        egui::RichText::new(display)
    };
    let field_response = ui.add(egui::Button::new(text).min_size(egui::vec2(140.0, 0.0)));
    if field_response.clicked() {
        app.toolbar.open_calendar(bound);
    }

    if !app.toolbar.popover.is_open(bound) {
        return;
    }

    let area = egui::Area::new(egui::Id::new(("calendar_popover", placeholder)))
        .order(egui::Order::Foreground)
        .fixed_pos(field_response.rect.left_bottom())
        .show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                calendar(ui, app.toolbar.custom.field_mut(bound));
            });
        });

    if area.response.clicked_elsewhere() && !field_response.clicked() {
        app.toolbar.close_calendar();
    }
}

/// Minimal date and time picker: year/month/day and hour/minute spinners.
fn calendar(ui: &mut egui::Ui, field: &mut DateTimeField) {
    let today = Utc::now().date_naive();
    let shown = field.date.unwrap_or(today);
    let (mut year, mut month, mut day) = (shown.year(), shown.month(), shown.day());
    let mut hour = field.time.hour();
    let mut minute = field.time.minute();
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Date:");
        changed |= ui.add(egui::DragValue::new(&mut year).range(1970..=9999)).changed();
        changed |= ui
            .add(egui::DragValue::new(&mut month).range(1..=12).custom_formatter(pad))
            .changed();
        changed |= ui
            .add(egui::DragValue::new(&mut day).range(1..=31).custom_formatter(pad))
            .changed();
        if ui.button("Today").clicked() {
            (year, month, day) = (today.year(), today.month(), today.day());
            changed = true;
        }
    });

    ui.horizontal(|ui| {
        ui.label("Time (UTC):");
        changed |= ui
            .add(egui::DragValue::new(&mut hour).range(0..=23).custom_formatter(pad))
            .changed();
        ui.label(":");
        changed |= ui
            .add(egui::DragValue::new(&mut minute).range(0..=59).custom_formatter(pad))
            .changed();
    });

    if changed {
        field.date = clamped_date(year, month, day).or(field.date);
        if let Some(time) = TimeOfDay::new(hour, minute) {
            field.time = time;
        }
    }
}

fn pad(value: f64, _range: std::ops::RangeInclusive<usize>) -> String {
    format!("{:02}", value as u32)
}

/// `day` is pulled back to the last day of the month (Feb 31 -> Feb 28/29).
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day.min(31))
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_month_end() {
        assert_eq!(clamped_date(2023, 2, 31), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(clamped_date(2024, 2, 30), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(clamped_date(2024, 4, 15), NaiveDate::from_ymd_opt(2024, 4, 15));
        assert_eq!(clamped_date(2024, 13, 1), None);
    }
}
