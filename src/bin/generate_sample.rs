//! Writes a synthetic `data/dados.csv` with six months of daily indicators.

use std::f64::consts::TAU;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

const OUTPUT_PATH: &str = "data/dados.csv";
const DAYS: i64 = 180;

#[derive(Serialize)]
struct Row {
    dia: String,
    poluicao: f64,
    transito: f64,
    areas_verdes: f64,
}

/// Small deterministic noise source (64-bit LCG), enough for sample data.
struct Noise(u64);

impl Noise {
    fn unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(2862933555777941757)
            .wrapping_add(3037000493);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Roughly normal, zero mean, unit spread (sum of uniforms).
    fn gauss(&mut self) -> f64 {
        (0..12).map(|_| self.unit()).sum::<f64>() - 6.0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;
    let mut noise = Noise(7);

    if let Some(dir) = Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer =
        csv::Writer::from_path(OUTPUT_PATH).with_context(|| format!("creating {OUTPUT_PATH}"))?;

    for i in 0..DAYS {
        let t = i as f64;
        let weekly = (TAU * t / 7.0).sin();

        // Weekday rush drives traffic; pollution follows traffic; green cover grows slowly.
        let transito = 1200.0 + 350.0 * weekly + 1.5 * t + 60.0 * noise.gauss();
        let poluicao = 20.0 + 0.045 * transito - 0.02 * t + 4.0 * noise.gauss();
        let areas_verdes = 18.0 + 0.02 * t + 0.3 * noise.gauss();

        writer
            .serialize(Row {
                dia: (start + Duration::days(i)).format("%Y-%m-%d").to_string(),
                poluicao: round2(poluicao),
                transito: transito.round(),
                areas_verdes: round2(areas_verdes),
            })
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {DAYS} days of indicators to {OUTPUT_PATH}");
    Ok(())
}
