use chrono::{Datelike, Duration, Months, NaiveDate};
use thiserror::Error;

use shared::utils::validation::{parse_date_param, DATE_PARAM_FORMAT};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DateRangeError {
    #[error("Format tanggal harus yyyy-MM-dd: {0}")]
    InvalidFormat(String),

    #[error("Tanggal awal {from} lebih besar dari tanggal akhir {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },
}

/// Rentang tanggal inklusif untuk filter `movement_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DateRangeError> {
        if from > to {
            return Err(DateRangeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Default: tanggal 1 sampai tanggal terakhir bulan berjalan
    pub fn current_month(today: NaiveDate) -> Self {
        let first = today - Duration::days(i64::from(today.day0()));
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(first);
        Self { from: first, to: last }
    }

    /// Parse dari opsi CLI. Yang kosong diisi default bulan berjalan.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DateRangeError> {
        let default = Self::current_month(today);
        let from = match from {
            Some(raw) => parse_date_param(raw.trim())
                .ok_or_else(|| DateRangeError::InvalidFormat(raw.to_string()))?,
            None => default.from,
        };
        let to = match to {
            Some(raw) => parse_date_param(raw.trim())
                .ok_or_else(|| DateRangeError::InvalidFormat(raw.to_string()))?,
            None => default.to,
        };
        Self::new(from, to)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Query param `dateFrom` / `dateTo`
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dateFrom", self.from.format(DATE_PARAM_FORMAT).to_string()),
            ("dateTo", self.to.format(DATE_PARAM_FORMAT).to_string()),
        ]
    }
}
