//! This module renders the analytics charts from the measurement log.

use anyhow::Result;
use biofloc_core::analysis;
use biofloc_schemas::measurement::MeasurementRecord;
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::{fs, path::Path};
use tracing::{info, warn};

/// One named line of a chart, x = days since the first entry.
struct Series {
    label: &'static str,
    color: RGBColor,
    points: Vec<(i64, f64)>,
}

/// Date-ordered measurements with their day offset from the first entry.
struct Timeline {
    first_date: NaiveDate,
    rows: Vec<(i64, MeasurementRecord)>,
}

impl Timeline {
    fn new(measurements: &[MeasurementRecord]) -> Option<Self> {
        let sorted = analysis::sorted_by_date(measurements);
        let first_date = sorted.first()?.date;
        let rows = sorted
            .into_iter()
            .map(|m| ((m.date - first_date).num_days(), m))
            .collect();
        Some(Self { first_date, rows })
    }

    fn series(
        &self,
        label: &'static str,
        color: RGBColor,
        value: impl Fn(&MeasurementRecord) -> f64,
    ) -> Series {
        Series {
            label,
            color,
            points: self.rows.iter().map(|(day, m)| (*day, value(m))).collect(),
        }
    }

    fn last_day(&self) -> i64 {
        self.rows.last().map_or(0, |(day, _)| *day)
    }
}

/// Generates the growth, nitrogen and floc charts into `output_dir`.
/// Returns the paths written; nothing is written for an empty log.
pub fn generate_all_plots(output_dir: &Path, measurements: &[MeasurementRecord]) -> Result<Vec<String>> {
    let Some(timeline) = Timeline::new(measurements) else {
        warn!("no measurements to plot");
        println!("[Plotting] No data entries to visualize.");
        return Ok(Vec::new());
    };
    fs::create_dir_all(output_dir)?;

    let growth = [
        timeline.series("Weight (g)", RED, |m| m.avg_fish_weight),
        timeline.series("Biomass (kg)", BLUE, |m| m.biomass_kg),
    ];
    let nitrogen = [
        timeline.series("TAN", RED, |m| m.total_ammonia_nitrogen),
        timeline.series("NO2", MAGENTA, |m| m.nitrite),
        timeline.series("NO3", BLUE, |m| m.nitrate),
        timeline.series("Total N", BLACK, |m| m.total_nitrogen),
    ];
    let floc = [
        timeline.series("Floc (ml/L)", GREEN, |m| m.floc_volume),
        timeline.series("Alkalinity (mg/L)", CYAN, |m| m.alkalinity),
    ];

    let charts: [(&str, &str, &str, &[Series]); 3] = [
        ("1_growth.png", "Biological Performance (Weight & Biomass)", "Value", &growth),
        ("2_nitrogen_cycle.png", "Nitrogen Cycle Dynamics", "mg/L", &nitrogen),
        ("3_floc_alkalinity.png", "Floc Volume vs Alkalinity", "Value", &floc),
    ];

    let mut written = Vec::new();
    for (file_name, caption, y_desc, series) in charts {
        let path = output_dir.join(file_name).display().to_string();
        plot_lines(&path, caption, y_desc, &timeline, series)?;
        written.push(path);
    }

    info!(count = written.len(), dir = %output_dir.display(), "charts written");
    Ok(written)
}

/// Lower and upper y bounds covering every point, padded by 10%.
fn y_range(series: &[Series]) -> (f64, f64) {
    let values = series.iter().flat_map(|s| s.points.iter().map(|(_, v)| *v));
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.1 } else { 1.0 };
    (min - pad, max + pad)
}

fn plot_lines(
    path: &str,
    caption: &str,
    y_desc: &str,
    timeline: &Timeline,
    series: &[Series],
) -> Result<()> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let (y_min, y_max) = y_range(series);
    let x_max = timeline.last_day().max(1);
    let first_date = timeline.first_date;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0i64..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_desc)
        .x_label_formatter(&|day: &i64| (first_date + Duration::days(*day)).format("%Y-%m-%d").to_string())
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
            .label(s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
        // Single-entry logs have no line to draw, so mark every point.
        chart.draw_series(s.points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, weight: f64) -> MeasurementRecord {
        MeasurementRecord {
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            tank_id: "Exp-01".to_string(),
            temperature: 28.0,
            dissolved_oxygen: 5.5,
            ph: 7.5,
            alkalinity: 120.0,
            total_ammonia_nitrogen: 0.1,
            nitrite: 0.01,
            nitrate: 10.0,
            total_nitrogen: 10.11,
            floc_volume: 25.0,
            avg_fish_weight: weight,
            biomass_kg: 74.25,
            feed_kg: 1.49,
            molasses_kg: 2.67,
        }
    }

    #[test]
    fn timeline_orders_by_date_and_offsets_days() {
        let timeline = Timeline::new(&[entry(5, 55.0), entry(1, 50.0), entry(3, 52.0)]).unwrap();
        let weights = timeline.series("Weight (g)", RED, |m| m.avg_fish_weight);
        assert_eq!(weights.points, vec![(0, 50.0), (2, 52.0), (4, 55.0)]);
        assert_eq!(timeline.last_day(), 4);
    }

    #[test]
    fn empty_log_writes_no_charts() {
        let dir = tempfile::TempDir::new().unwrap();
        let out_dir = dir.path().join("plots");
        let written = generate_all_plots(&out_dir, &[]).unwrap();
        assert!(written.is_empty());
        assert!(!out_dir.exists());
    }

    #[test]
    fn empty_log_has_no_timeline() {
        assert!(Timeline::new(&[]).is_none());
    }

    #[test]
    fn y_range_pads_flat_and_spread_series() {
        let flat = Series {
            label: "flat",
            color: RED,
            points: vec![(0, 5.0), (1, 5.0)],
        };
        assert_eq!(y_range(&[flat]), (4.0, 6.0));

        let spread = Series {
            label: "spread",
            color: BLUE,
            points: vec![(0, 0.0), (1, 10.0)],
        };
        assert_eq!(y_range(&[spread]), (-1.0, 11.0));
    }
}
