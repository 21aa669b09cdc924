use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::color::indicator_color;
use crate::data::model::Indicator;
use crate::forecast::Horizon;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Ok(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };
    let bounds = session.bounds;

    // ---- Indicator selector ----
    ui.strong("Indicator to analyse");
    let mut indicator = state.indicator;
    egui::ComboBox::from_id_salt("indicator")
        .selected_text(indicator.label())
        .show_ui(ui, |ui: &mut Ui| {
            for ind in Indicator::ALL {
                ui.selectable_value(&mut indicator, ind, ind.label());
            }
        });
    state.set_indicator(indicator);
    ui.separator();

    // ---- Period ----
    ui.strong("Period");
    if let Some(interval) = state.interval {
        let mut start = interval.start;
        let mut end = interval.end;

        ui.horizontal(|ui: &mut Ui| {
            ui.label("From");
            if ui
                .add(DatePickerButton::new(&mut start).id_salt("period_start"))
                .changed()
            {
                state.set_start(start);
            }
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.label("To");
            if ui
                .add(DatePickerButton::new(&mut end).id_salt("period_end"))
                .changed()
            {
                state.set_end(end);
            }
        });
        ui.label(
            RichText::new(format!("Data available {} to {}", bounds.start, bounds.end))
                .small()
                .weak(),
        );
        if ui.small_button("Full period").clicked() {
            state.reset_interval();
        }
    }
    ui.separator();

    // ---- Comparison ----
    ui.strong("Compare indicators");
    for ind in Indicator::ALL {
        let mut checked = state.comparison.contains(&ind);
        let text = RichText::new(ind.label()).color(indicator_color(ind));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_comparison(ind);
        }
    }
    ui.separator();

    // ---- Forecast horizon ----
    ui.strong("Forecast");
    let mut days = state.horizon.days();
    if ui
        .add(egui::Slider::new(&mut days, Horizon::MIN..=Horizon::MAX).text("days ahead"))
        .changed()
    {
        state.set_horizon(days);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and dataset status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Urban Sustainability Monitor");
        ui.separator();

        match &state.session {
            Ok(session) => {
                let visible = match &state.view {
                    Some(Ok(view)) => view.filtered.len(),
                    _ => 0,
                };
                ui.label(format!(
                    "{}: {} days loaded, {} in period",
                    state.loader().path().display(),
                    session.dataset.len(),
                    visible
                ));
                if session.dropped_rows > 0 {
                    ui.separator();
                    ui.label(
                        RichText::new(format!(
                            "{} rows skipped (invalid date)",
                            session.dropped_rows
                        ))
                        .color(Color32::from_rgb(200, 140, 0)),
                    );
                }
            }
            Err(e) => {
                ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            }
        }
    });
    ui.label(
        RichText::new("Interactive view of urban indicators: pollution, traffic and green areas.")
            .weak(),
    );
}
