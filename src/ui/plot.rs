use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotUi, Points};

use crate::color::{correlation_color, correlation_text_color, indicator_color};
use crate::data::model::{Dataset, Indicator};
use crate::data::series::IndicatorSeries;
use crate::forecast::ForecastPoint;
use crate::pipeline::{PipelineError, ViewModel};
use crate::state::AppState;
use crate::stats::{CorrelationMatrix, StatsError, Summary};

const CHART_HEIGHT: f32 = 260.0;
const TABLE_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Date axis
// ---------------------------------------------------------------------------

/// Plot x coordinate of a date (days since the common era).
fn date_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Points sorted by date so the line reads left to right.
fn date_points(points: &[(NaiveDate, f64)]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = points.iter().map(|&(d, v)| [date_x(d), v]).collect();
    out.sort_by(|a, b| a[0].total_cmp(&b[0]));
    out
}

/// A chart with a date x axis and date-aware hover labels.
fn show_date_plot(ui: &mut Ui, id: &str, y_label: &str, add: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(y_label.to_string())
        .x_axis_formatter(|mark, _range| x_label(mark.value))
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{}\n{:.2}", x_label(value.x), value.y)
            } else {
                format!("{name}\n{}\n{:.2}", x_label(value.x), value.y)
            }
        })
        .allow_scroll(false)
        .show(ui, add);
}

/// `1234567.8` → `1,234,568`.
fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the whole dashboard body.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Err(e) = &state.session {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(
                RichText::new(format!("Data not found or CSV empty!\n{e}")).color(Color32::RED),
            );
        });
        return;
    }

    match &state.view {
        None => {}
        Some(Err(PipelineError::EmptyRange(_))) => {
            ui.label(
                RichText::new("No data found in the selected period.")
                    .color(Color32::from_rgb(200, 140, 0))
                    .strong(),
            );
        }
        Some(Ok(view)) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| view_body(ui, view));
        }
    }
}

fn view_body(ui: &mut Ui, view: &ViewModel) {
    let label = view.indicator.label();
    ui.label(RichText::new(format!("Period: {}", view.interval)).weak());

    ui.heading(format!("{label} over time"));
    if view.series.is_empty() {
        ui.label(RichText::new(format!("No {label} values in this period.")).italics());
    } else {
        indicator_chart(ui, &view.series);
    }
    summary_metrics(ui, &view.summary);
    ui.separator();

    ui.heading("Indicator comparison");
    if view.comparison.is_empty() {
        ui.label("Select indicators in the side panel to compare them.");
    } else {
        comparison_chart(ui, &view.comparison);
    }
    ui.separator();

    ui.heading("Correlation matrix");
    correlation_heatmap(ui, &view.correlation);
    ui.separator();

    ui.heading(format!("Forecast for {label} ({} days)", view.horizon.days()));
    match &view.forecast {
        Ok(points) => {
            forecast_chart(ui, view.indicator, points, &view.series);
            ui.strong("Predicted values");
            forecast_table(ui, points);
        }
        Err(e) => {
            ui.label(RichText::new(format!("Forecast unavailable: {e}")).italics());
        }
    }
    ui.separator();

    ui.heading("Data used");
    data_table(ui, &view.filtered);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn indicator_chart(ui: &mut Ui, series: &IndicatorSeries) {
    let color = indicator_color(series.indicator);
    let points = date_points(&series.points);
    show_date_plot(ui, "indicator_chart", series.indicator.label(), |plot_ui| {
        plot_ui.line(
            Line::new(points.clone())
                .color(color)
                .width(2.0)
                .name(series.indicator.label()),
        );
        plot_ui.points(Points::new(points).radius(3.0).color(color));
    });
}

fn summary_metrics(ui: &mut Ui, summary: &Result<Summary, StatsError>) {
    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            ui.label(RichText::new(format!("Metrics unavailable: {e}")).italics());
            return;
        }
    };
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Maximum", format_thousands(summary.max));
        metric(&mut cols[1], "Minimum", format_thousands(summary.min));
        metric(&mut cols[2], "Mean", format!("{:.2}", summary.mean));
    });
    ui.label(RichText::new(format!("over {} values", summary.count)).small().weak());
}

fn metric(ui: &mut Ui, title: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

fn comparison_chart(ui: &mut Ui, comparison: &[IndicatorSeries]) {
    show_date_plot(ui, "comparison_chart", "Value", |plot_ui| {
        for series in comparison {
            let color = indicator_color(series.indicator);
            let points = date_points(&series.points);
            plot_ui.line(
                Line::new(points.clone())
                    .color(color)
                    .width(1.5)
                    .name(series.indicator.label()),
            );
            plot_ui.points(Points::new(points).radius(2.5).color(color));
        }
    });
}

fn forecast_chart(
    ui: &mut Ui,
    indicator: Indicator,
    forecast: &[ForecastPoint],
    actual: &IndicatorSeries,
) {
    let color = indicator_color(indicator);
    let line = |f: fn(&ForecastPoint) -> f64| -> Vec<[f64; 2]> {
        forecast.iter().map(|p| [date_x(p.date), f(p)]).collect()
    };

    show_date_plot(ui, "forecast_chart", "Forecast", |plot_ui| {
        plot_ui.line(Line::new(line(|p| p.predicted)).color(color).width(2.0).name("Forecast"));
        plot_ui.line(
            Line::new(line(|p| p.upper))
                .color(color.gamma_multiply(0.5))
                .style(LineStyle::dashed_loose())
                .name("Upper bound"),
        );
        plot_ui.line(
            Line::new(line(|p| p.lower))
                .color(color.gamma_multiply(0.5))
                .style(LineStyle::dashed_loose())
                .name("Lower bound"),
        );
        plot_ui.points(
            Points::new(date_points(&actual.points))
                .radius(3.0)
                .color(Color32::BLACK)
                .name("Actual values"),
        );
    });
}

fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation_heatmap")
        .spacing([4.0, 4.0])
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for ind in Indicator::ALL {
                ui.strong(ind.label());
            }
            ui.end_row();

            for row in Indicator::ALL {
                ui.strong(row.label());
                for col in Indicator::ALL {
                    let r = matrix.get(row, col);
                    let text = if r.is_nan() { "NaN".to_string() } else { format!("{r:+.2}") };
                    ui.label(
                        RichText::new(format!("  {text}  "))
                            .monospace()
                            .color(correlation_text_color(r))
                            .background_color(correlation_color(r)),
                    );
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn forecast_table(ui: &mut Ui, forecast: &[ForecastPoint]) {
    ScrollArea::vertical()
        .id_salt("forecast_table")
        .max_height(TABLE_HEIGHT)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("forecast_grid")
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui: &mut Ui| {
                    for header in ["Date", "Predicted", "Lower", "Upper"] {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for p in forecast {
                        ui.label(p.date.to_string());
                        ui.label(format!("{:.2}", p.predicted));
                        ui.label(format!("{:.2}", p.lower));
                        ui.label(format!("{:.2}", p.upper));
                        ui.end_row();
                    }
                });
        });
}

fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let cell = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into());

    ScrollArea::vertical()
        .id_salt("data_table")
        .max_height(TABLE_HEIGHT)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("data_grid")
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("dia");
                    for ind in Indicator::ALL {
                        ui.strong(ind.column());
                    }
                    ui.end_row();
                    for obs in &dataset.observations {
                        ui.label(obs.date.to_string());
                        for ind in Indicator::ALL {
                            ui.label(cell(obs.value(ind)));
                        }
                        ui.end_row();
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-45210.0), "-45,210");
        assert_eq!(format_thousands(-0.2), "0");
    }

    #[test]
    fn date_axis_round_trips() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(x_label(date_x(d)), "2024-02-29");
        assert_eq!(x_label(date_x(d) + 0.4), "2024-02-29");
    }

    #[test]
    fn points_are_sorted_by_date() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let pts = date_points(&[(d(3), 3.0), (d(1), 1.0), (d(2), 2.0)]);
        let ys: Vec<f64> = pts.iter().map(|p| p[1]).collect();
        assert_eq!(ys, [1.0, 2.0, 3.0]);
    }
}
