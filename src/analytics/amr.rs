use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

/// One antimicrobial susceptibility test row, as imported from a
/// spreadsheet export. Dates stay raw until bucketing; source files are
/// messy and rows with unparseable dates are skipped there.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmrRow {
    pub date: String,
    pub organism: String,
    pub antibiotic: String,
    pub result: String,
}

/// Resistance summary for one antibiotic.
#[derive(Debug, Clone, PartialEq)]
pub struct AntibioticStat {
    pub antibiotic: String,
    pub total: u64,
    pub resistant: u64,
    pub percent: f64,
}

/// One day's results for a single antibiotic.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyResistance {
    pub date: NaiveDate,
    pub total: u64,
    pub resistant: u64,
    pub percent: f64,
}

/// Parse spreadsheet rows (an array of JSON objects) into [`AmrRow`]s.
///
/// Column names are matched case-insensitively; the date column may also
/// be called `sample_date`. Cells are stringified as-is.
pub fn parse_rows(value: &Value) -> Vec<AmrRow> {
    let Some(rows) = value.as_array() else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| row.as_object())
        .map(|row| {
            let lookup = |names: &[&str]| -> String {
                for (key, cell) in row {
                    let key = key.to_lowercase();
                    if names.contains(&key.as_str()) {
                        return match cell {
                            Value::String(s) => s.trim().to_string(),
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                    }
                }
                String::new()
            };

            AmrRow {
                date: lookup(&["date", "sample_date"]),
                organism: lookup(&["organism"]),
                antibiotic: lookup(&["antibiotic"]),
                result: lookup(&["result"]),
            }
        })
        .collect()
}

fn is_resistant(result: &str) -> bool {
    result.to_lowercase().contains("resist")
}

fn percent(resistant: u64, total: u64) -> f64 {
    if total > 0 {
        resistant as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Per-antibiotic totals and resistance share, optionally restricted to
/// one organism, sorted by resistance percentage descending.
pub fn aggregate_by_antibiotic(rows: &[AmrRow], organism: Option<&str>) -> Vec<AntibioticStat> {
    let mut stats: BTreeMap<&str, (u64, u64)> = BTreeMap::new();

    for row in rows {
        if row.antibiotic.is_empty() {
            continue;
        }
        if let Some(filter) = organism {
            if filter != row.organism {
                continue;
            }
        }

        let entry = stats.entry(row.antibiotic.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if is_resistant(&row.result) {
            entry.1 += 1;
        }
    }

    let mut out: Vec<AntibioticStat> = stats
        .into_iter()
        .map(|(antibiotic, (total, resistant))| AntibioticStat {
            antibiotic: antibiotic.to_string(),
            total,
            resistant,
            percent: percent(resistant, total),
        })
        .collect();
    out.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    out
}

/// Lenient date parsing for spreadsheet exports.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.date_naive())
                .ok()
        })
}

/// Daily totals and resistance share for one antibiotic, sorted by date
/// ascending. Rows with unparseable dates are skipped.
pub fn resistance_timeseries(rows: &[AmrRow], antibiotic: &str) -> Vec<DailyResistance> {
    let mut buckets: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for row in rows {
        if row.antibiotic != antibiotic {
            continue;
        }
        let Some(date) = parse_date(&row.date) else {
            continue;
        };

        let entry = buckets.entry(date).or_insert((0, 0));
        entry.0 += 1;
        if is_resistant(&row.result) {
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (total, resistant))| DailyResistance {
            date,
            total,
            resistant,
            percent: percent(resistant, total),
        })
        .collect()
}

/// Distinct organisms present in the rows, sorted.
pub fn organisms(rows: &[AmrRow]) -> Vec<String> {
    let mut set: Vec<String> = rows
        .iter()
        .filter(|r| !r.organism.is_empty())
        .map(|r| r.organism.clone())
        .collect();
    set.sort();
    set.dedup();
    set
}
