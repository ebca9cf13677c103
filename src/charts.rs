//! Dashboard charts rendered to SVG with Plotters.

use crate::analyzers::types::{HourlyTotal, MonthlyTotal, RfmRecord, SeasonalTotal};
use crate::analyzers::utility::histogram;
use crate::dashboard::Dashboard;
use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BAR_COLOR: RGBColor = RGBColor(66, 133, 244);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Histogram bins per RFM column.
const RFM_BINS: usize = 20;

/// Draws a vertical bar chart with one labelled bar per entry.
fn draw_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, u64)],
) -> Result<()> {
    let max = bars.iter().map(|(_, v)| *v).max().unwrap_or(0).max(1) as f64;
    let n = bars.len().max(1);

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max * 1.1))?;

    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        bars.get(idx as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value as f64)], BAR_COLOR.filled())
    }))?;

    root.present()?;
    debug!(path = %path.display(), bars = bars.len(), "Bar chart written");
    Ok(())
}

/// Bar chart of total rentals per hour of day.
pub fn create_hourly_chart(hourly: &[HourlyTotal], path: &Path) -> Result<()> {
    let bars: Vec<(String, u64)> = hourly
        .iter()
        .map(|h| (h.hour.to_string(), h.count))
        .collect();
    draw_bar_chart(path, "Peak Bike Rentals By Hour", "Hour", "Rental Amount", &bars)
}

/// Bar chart of combined rentals per season, in table order.
pub fn create_season_chart(totals: &[SeasonalTotal], path: &Path) -> Result<()> {
    let bars: Vec<(String, u64)> = totals
        .iter()
        .map(|t| (t.season.to_string(), t.combined_total))
        .collect();
    draw_bar_chart(
        path,
        "Bicycle Rental Comparison Between Seasons",
        "Season",
        "Total Rental",
        &bars,
    )
}

/// Three side-by-side histograms of recency, frequency and monetary.
pub fn create_rfm_chart(records: &[RfmRecord], path: &Path) -> Result<()> {
    let columns: [(&str, Vec<f64>); 3] = [
        ("Recency", records.iter().map(|r| r.recency as f64).collect()),
        ("Frequency", records.iter().map(|r| r.frequency as f64).collect()),
        ("Monetary", records.iter().map(|r| r.monetary as f64).collect()),
    ];

    let root = SVGBackend::new(path, (1800, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    for (panel, (name, values)) in panels.iter().zip(columns.iter()) {
        let (bins, width) = histogram(values, RFM_BINS);
        let lo = bins.first().map_or(0.0, |(edge, _)| *edge);
        let hi = bins.last().map_or(1.0, |(edge, _)| edge + width);
        let max = bins.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("Distribution of {name}"), ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(lo..hi, 0f64..(max * 1.1))?;

        chart
            .configure_mesh()
            .x_desc(*name)
            .y_desc("Days")
            .axis_desc_style(("sans-serif", 15))
            .draw()?;

        chart.draw_series(bins.iter().map(|(edge, count)| {
            Rectangle::new([(*edge, 0.0), (edge + width, *count as f64)], SKY_BLUE.filled())
        }))?;
    }

    root.present()?;
    debug!(path = %path.display(), days = records.len(), "RFM chart written");
    Ok(())
}

/// Line chart of rentals per calendar month.
pub fn create_monthly_chart(monthly: &[MonthlyTotal], path: &Path) -> Result<()> {
    let max = monthly.iter().map(|m| m.count).max().unwrap_or(0).max(1) as f64;
    let last = monthly.len().saturating_sub(1).max(1) as f64;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Bike Rental Trends", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(last + 0.5), 0f64..(max * 1.1))?;

    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        monthly
            .get(idx as usize)
            .map(|m| m.month_end.format("%Y-%m").to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(monthly.len().max(1))
        .x_label_formatter(&label_for)
        .x_desc("Month")
        .y_desc("Rental Amount")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    let points: Vec<(f64, f64)> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, m.count as f64))
        .collect();

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))?
        .label("Total Bike Rental")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    debug!(path = %path.display(), months = monthly.len(), "Monthly chart written");
    Ok(())
}

/// Renders every dashboard chart into `dir`, returning the files written.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn render_dashboard(dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("hourly_rentals.svg");
    create_hourly_chart(&dashboard.hourly, &path)?;
    written.push(path);

    let path = dir.join("season_rentals.svg");
    create_season_chart(&dashboard.seasons.totals, &path)?;
    written.push(path);

    if let Some(rfm) = &dashboard.rfm {
        let path = dir.join("rfm_distribution.svg");
        create_rfm_chart(rfm, &path)?;
        written.push(path);
    }

    let path = dir.join("monthly_trend.svg");
    create_monthly_chart(&dashboard.monthly, &path)?;
    written.push(path);

    info!(charts = written.len(), "Charts rendered");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Season;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn rfm_records() -> Vec<RfmRecord> {
        let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        (0..30)
            .map(|i| RfmRecord {
                date: start + chrono::Days::new(i),
                recency: 29 - i as i64,
                frequency: 1,
                monetary: 100 + i * 7,
                recency_quartile: 0,
                frequency_quartile: 1,
                monetary_quartile: 0,
                rfm_score: "010".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_create_hourly_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hours.svg");
        let hourly: Vec<HourlyTotal> = (0..24)
            .map(|hour| HourlyTotal {
                hour,
                count: hour as u64 * 10,
            })
            .collect();

        create_hourly_chart(&hourly, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_create_season_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seasons.svg");
        let totals = vec![SeasonalTotal {
            season: Season::Fall,
            daily_sum: 10,
            hourly_sum: 10,
            combined_total: 20,
        }];

        create_season_chart(&totals, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_create_rfm_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rfm.svg");

        create_rfm_chart(&rfm_records(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_create_monthly_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monthly.svg");
        let monthly = vec![
            MonthlyTotal {
                month_end: NaiveDate::from_ymd_opt(2011, 1, 31).unwrap(),
                count: 38189,
            },
            MonthlyTotal {
                month_end: NaiveDate::from_ymd_opt(2011, 2, 28).unwrap(),
                count: 48215,
            },
        ];

        create_monthly_chart(&monthly, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_tables_still_render() {
        let dir = tempdir().unwrap();
        create_hourly_chart(&[], &dir.path().join("h.svg")).unwrap();
        create_monthly_chart(&[], &dir.path().join("m.svg")).unwrap();
    }
}
