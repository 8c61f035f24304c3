//! Presentation shapes derived from aggregated market data.

use std::fmt::Write;

use serde::Serialize;

use crate::models::{PriceSeriesPoint, PriceStat};

/// One dashboard card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsCard {
    pub market: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub weekly: Option<f64>,
}

impl From<&PriceStat> for StatsCard {
    fn from(stat: &PriceStat) -> Self {
        Self {
            market: stat.market.to_string(),
            min: stat.min,
            max: stat.max,
            avg: stat.avg,
            weekly: stat.latest,
        }
    }
}

/// Column-oriented series for the dashboard price chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub min: Vec<Option<f64>>,
    pub avg: Vec<Option<f64>>,
    pub max: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn from_stats(stats: &[PriceStat]) -> Self {
        let mut series = ChartSeries::default();
        for stat in stats {
            series.labels.push(stat.market.to_string());
            series.min.push(stat.min);
            series.avg.push(stat.avg);
            series.max.push(stat.max);
        }
        series
    }
}

/// One row of the market comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub market: String,
    pub period_min: Option<f64>,
    pub period_max: Option<f64>,
    pub period_avg: Option<f64>,
    pub weekly_price: Option<f64>,
}

impl From<&PriceSeriesPoint> for ComparisonRow {
    fn from(point: &PriceSeriesPoint) -> Self {
        Self {
            market: point.market.to_string(),
            period_min: point.period_min,
            period_max: point.period_max,
            period_avg: point.period_avg,
            weekly_price: point.weekly_price,
        }
    }
}

pub fn fmt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn render_table(header: [&str; 5], rows: impl Iterator<Item = [String; 5]>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>10} {:>12}",
        header[0], header[1], header[2], header[3], header[4]
    );
    for r in rows {
        let _ = writeln!(out, "{:<16} {:>10} {:>10} {:>10} {:>12}", r[0], r[1], r[2], r[3], r[4]);
    }
    out
}

pub fn render_cards(cards: &[StatsCard]) -> String {
    render_table(
        ["Market", "Min", "Max", "Avg", "Weekly"],
        cards.iter().map(|c| {
            [
                c.market.clone(),
                fmt_price(c.min),
                fmt_price(c.max),
                fmt_price(c.avg),
                fmt_price(c.weekly),
            ]
        }),
    )
}

pub fn render_comparison(rows: &[ComparisonRow]) -> String {
    render_table(
        ["Market", "Min", "Max", "Average", "Weekly Trend"],
        rows.iter().map(|r| {
            [
                r.market.clone(),
                fmt_price(r.period_min),
                fmt_price(r.period_max),
                fmt_price(r.period_avg),
                fmt_price(r.weekly_price),
            ]
        }),
    )
}
