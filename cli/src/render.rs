//! Plain-text rendering of engine results.

use std::fmt::Write;

use fxrates_common::{iso_date, CurrencyPair};
use fxrates_fx::{Conversion, Currencies, RatePeriod};

/// One `USD - US Dollar` line per currency.
pub fn currencies(currencies: &Currencies) -> String {
    let mut out = String::new();
    for (code, name) in currencies.iter() {
        let _ = writeln!(out, "{} - {}", code, name);
    }
    out
}

pub fn rate(pair: &CurrencyPair, rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("1 {} = {:.6} {}\n", pair.from, rate, pair.to),
        None => format!("{}: not offered by the provider\n", pair),
    }
}

pub fn conversion(conversion: &Conversion) -> String {
    format!(
        "{} = {} (rate {:.6})\n",
        conversion.input, conversion.output, conversion.rate
    )
}

/// Date/rate table, newest first, `N/A` for dates that failed.
pub fn period(period: &RatePeriod) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12}Rate ({} -> {})", "Date", period.pair.from, period.pair.to);

    for record in &period.records {
        let rate = match record.rate {
            Some(rate) => format!("{:.6}", rate),
            None => "N/A".to_string(),
        };
        let _ = writeln!(out, "{:<12}{}", iso_date(record.date), rate);
    }

    if period.has_errors() {
        let _ = writeln!(
            out,
            "\nSome dates could not be loaded ({} of {}):",
            period.failed().count(),
            period.len()
        );
        for record in period.failed() {
            let _ = writeln!(
                out,
                "  {}: {}",
                iso_date(record.date),
                record.error.as_deref().unwrap_or_default()
            );
        }
    }

    out
}
