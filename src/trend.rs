//! Month-over-month trend computed locally from `/prices-filtered` rows.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::debug;
use serde::Serialize;

use crate::models::PriceRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthAverage {
    /// `YYYY-MM`
    pub month: String,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MomChange {
    pub current: Option<MonthAverage>,
    pub previous: Option<MonthAverage>,
    /// Percentage change from `previous` to `current`.
    pub pct_change: Option<f64>,
}

/// `YYYY-MM` of a backend date string (RFC 3339, naive datetime or plain date).
pub fn month_key(date: &str) -> Option<String> {
    let date = date.trim();
    let (year, month) = if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        (dt.year(), dt.month())
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        (dt.year(), dt.month())
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S%.f") {
        (dt.year(), dt.month())
    } else if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        (d.year(), d.month())
    } else {
        return None;
    };
    Some(format!("{:04}-{:02}", year, month))
}

/// Average price per month, oldest month first.
///
/// Rows whose date cannot be read are skipped.
pub fn month_averages(records: &[PriceRecord]) -> Vec<MonthAverage> {
    let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in records {
        match month_key(&rec.date) {
            Some(key) => {
                let entry = months.entry(key).or_insert((0.0, 0));
                entry.0 += rec.price;
                entry.1 += 1;
            }
            None => debug!("Skipping price row with unreadable date {:?}", rec.date),
        }
    }
    months
        .into_iter()
        .map(|(month, (sum, n))| MonthAverage {
            month,
            avg: sum / n as f64,
        })
        .collect()
}

/// Change between the last two months of `averages` (which must be sorted).
pub fn mom_change(averages: &[MonthAverage]) -> MomChange {
    match averages {
        [] => MomChange::default(),
        [only] => MomChange {
            current: Some(only.clone()),
            ..MomChange::default()
        },
        [.., prev, curr] => {
            let pct_change = if prev.avg == 0.0 {
                None
            } else {
                Some((curr.avg - prev.avg) / prev.avg * 100.0)
            };
            MomChange {
                current: Some(curr.clone()),
                previous: Some(prev.clone()),
                pct_change,
            }
        }
    }
}
