//! egui front end: filter panel, status bar, charts and tables.

pub mod panels;
pub mod plot;
