//! Value-kind classification and per-column profiling.
//!
//! Classification happens in two passes. The first pass only tallies cell tags,
//! so a stray string among numbers can never reach an ordering comparison. The
//! second pass computes min/max, text length, and decimal shape, and runs only
//! once the column is known to hold a single orderable kind.

use std::fmt;

use itertools::{Itertools, MinMaxResult};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::data::{Cell, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Timestamp,
    Duration,
    Boolean,
    Mixed,
    Unknown,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Duration => "duration",
            ValueKind::Boolean => "boolean",
            ValueKind::Mixed => "mixed",
            ValueKind::Unknown => "unknown",
        }
    }

    /// Kinds whose min/max are meaningful and reported.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Float | ValueKind::Timestamp | ValueKind::Duration
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest integer-digit count and fractional-digit count seen in a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalShape {
    pub integer_digits: u32,
    pub scale: u32,
}

impl DecimalShape {
    pub fn precision(&self) -> u32 {
        self.integer_digits + self.scale
    }

    fn widen(self, other: DecimalShape) -> DecimalShape {
        DecimalShape {
            integer_digits: self.integer_digits.max(other.integer_digits),
            scale: self.scale.max(other.scale),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub kind: ValueKind,
    pub non_missing: usize,
    pub homogeneous: bool,
    pub min: Option<Cell>,
    pub max: Option<Cell>,
    /// Longest value in characters, for text columns.
    pub max_length: Option<usize>,
    /// Only for float columns; `None` when some value has no exact decimal form.
    pub decimal: Option<DecimalShape>,
}

#[derive(Debug, Default, Clone, Copy)]
struct TagTally {
    non_missing: usize,
    text: usize,
    integer: usize,
    float: usize,
    timestamp: usize,
    duration: usize,
    boolean: usize,
    opaque: usize,
}

impl TagTally {
    fn record(&mut self, cell: &Cell) {
        if cell.is_missing() {
            return;
        }
        self.non_missing += 1;
        match cell {
            Cell::Text(_) => self.text += 1,
            Cell::Integer(_) => self.integer += 1,
            Cell::Float(_) => self.float += 1,
            Cell::Timestamp(_) => self.timestamp += 1,
            Cell::Duration(_) => self.duration += 1,
            Cell::Boolean(_) => self.boolean += 1,
            Cell::Opaque(_) => self.opaque += 1,
            Cell::Missing => {}
        }
    }

    fn decide(&self) -> ValueKind {
        let all = |count: usize| count == self.non_missing;
        if self.non_missing == 0 {
            ValueKind::Unknown
        } else if self.opaque > 0 {
            if all(self.opaque) {
                ValueKind::Unknown
            } else {
                ValueKind::Mixed
            }
        } else if all(self.text) {
            ValueKind::Text
        } else if all(self.integer) {
            ValueKind::Integer
        } else if all(self.integer + self.float) {
            ValueKind::Float
        } else if all(self.timestamp) {
            ValueKind::Timestamp
        } else if all(self.duration) {
            ValueKind::Duration
        } else if all(self.boolean) {
            ValueKind::Boolean
        } else {
            ValueKind::Mixed
        }
    }
}

pub fn classify(column: &Column) -> ValueKind {
    tally(column).decide()
}

fn tally(column: &Column) -> TagTally {
    let mut tally = TagTally::default();
    for cell in &column.cells {
        tally.record(cell);
    }
    tally
}

pub fn profile(column: &Column) -> ColumnProfile {
    let tally = tally(column);
    let kind = tally.decide();
    if kind == ValueKind::Mixed {
        debug!(
            "Column '{}' is heterogeneous: {} text, {} integer, {} float, {} timestamp, {} duration, {} boolean, {} opaque",
            column.name,
            tally.text,
            tally.integer,
            tally.float,
            tally.timestamp,
            tally.duration,
            tally.boolean,
            tally.opaque
        );
    }

    let mut profile = ColumnProfile {
        kind,
        non_missing: tally.non_missing,
        homogeneous: !matches!(kind, ValueKind::Mixed | ValueKind::Unknown),
        min: None,
        max: None,
        max_length: None,
        decimal: None,
    };

    match kind {
        ValueKind::Integer => {
            let range = column.present().filter_map(|cell| match cell {
                Cell::Integer(i) => Some(*i),
                _ => None,
            });
            (profile.min, profile.max) = bounds(range.minmax(), Cell::Integer);
        }
        ValueKind::Float => {
            let extremes = column
                .present()
                .filter_map(|cell| numeric_value(cell).map(|value| (value, cell)))
                .minmax_by(|left, right| left.0.total_cmp(&right.0));
            (profile.min, profile.max) = bounds(extremes, |(_, cell)| cell.clone());
            profile.decimal = decimal_shape(column);
        }
        ValueKind::Timestamp => {
            let range = column.present().filter_map(|cell| match cell {
                Cell::Timestamp(ts) => Some(*ts),
                _ => None,
            });
            (profile.min, profile.max) = bounds(range.minmax(), Cell::Timestamp);
        }
        ValueKind::Duration => {
            let range = column.present().filter_map(|cell| match cell {
                Cell::Duration(delta) => Some(*delta),
                _ => None,
            });
            (profile.min, profile.max) = bounds(range.minmax(), Cell::Duration);
        }
        ValueKind::Text => {
            profile.max_length = Some(
                column
                    .present()
                    .map(|cell| match cell {
                        Cell::Text(s) => s.chars().count(),
                        _ => 0,
                    })
                    .max()
                    .unwrap_or(0),
            );
        }
        ValueKind::Boolean | ValueKind::Mixed | ValueKind::Unknown => {}
    }

    profile
}

fn bounds<T, F>(result: MinMaxResult<T>, to_cell: F) -> (Option<Cell>, Option<Cell>)
where
    T: Clone,
    F: Fn(T) -> Cell,
{
    match result {
        MinMaxResult::NoElements => (None, None),
        MinMaxResult::OneElement(only) => (Some(to_cell(only.clone())), Some(to_cell(only))),
        MinMaxResult::MinMax(min, max) => (Some(to_cell(min)), Some(to_cell(max))),
    }
}

fn numeric_value(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Integer(i) => Some(*i as f64),
        Cell::Float(f) => Some(*f),
        _ => None,
    }
}

fn decimal_shape(column: &Column) -> Option<DecimalShape> {
    column
        .present()
        .map(cell_decimal_shape)
        .try_fold(None, |acc: Option<DecimalShape>, shape| {
            let shape = shape?;
            Some(Some(acc.map_or(shape, |current| current.widen(shape))))
        })
        .flatten()
}

fn cell_decimal_shape(cell: &Cell) -> Option<DecimalShape> {
    match cell {
        Cell::Integer(i) => Some(DecimalShape {
            integer_digits: digit_count(i.unsigned_abs()),
            scale: 0,
        }),
        Cell::Float(f) if f.is_finite() => {
            let parsed: Decimal = f.to_string().parse().ok()?;
            let integer_part = parsed.abs().trunc().to_string();
            Some(DecimalShape {
                integer_digits: integer_part.len() as u32,
                scale: parsed.scale(),
            })
        }
        _ => None,
    }
}

fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn column(cells: Vec<Cell>) -> Column {
        Column::new("c", cells)
    }

    #[test]
    fn classify_follows_kind_precedence() {
        assert_eq!(classify(&column(vec!["a".into(), "b".into()])), ValueKind::Text);
        assert_eq!(classify(&column(vec![1i64.into(), Cell::Missing])), ValueKind::Integer);
        assert_eq!(classify(&column(vec![1i64.into(), 2.5.into()])), ValueKind::Float);
        assert_eq!(classify(&column(vec![true.into(), false.into()])), ValueKind::Boolean);
        assert_eq!(
            classify(&column(vec![TimeDelta::seconds(5).into()])),
            ValueKind::Duration
        );
    }

    #[test]
    fn integral_floats_still_classify_as_float() {
        assert_eq!(classify(&column(vec![1.0.into(), 2.0.into()])), ValueKind::Float);
    }

    #[test]
    fn single_kind_columns_are_homogeneous() {
        let widened = profile(&column(vec![1i64.into(), Cell::Missing, 2.5.into()]));
        assert_eq!(widened.kind, ValueKind::Float);
        assert!(widened.homogeneous);
        assert_eq!(widened.non_missing, 2);

        let text = profile(&column(vec!["a".into(), "bb".into()]));
        assert_eq!(text.kind, ValueKind::Text);
        assert!(text.homogeneous);

        let flags = profile(&column(vec![true.into(), Cell::Missing, false.into()]));
        assert_eq!(flags.kind, ValueKind::Boolean);
        assert!(flags.homogeneous);
    }

    #[test]
    fn stray_string_among_numbers_is_mixed() {
        let col = column(vec![1i64.into(), 2.5.into(), "oops".into()]);
        let profile = profile(&col);
        assert_eq!(profile.kind, ValueKind::Mixed);
        assert!(!profile.homogeneous);
        assert_eq!(profile.min, None);
        assert_eq!(profile.max, None);
    }

    #[test]
    fn opaque_cells_degrade_to_unknown_or_mixed() {
        let opaque = Cell::Opaque(vec![0xff, 0xfe]);
        assert_eq!(classify(&column(vec![opaque.clone()])), ValueKind::Unknown);
        assert_eq!(
            classify(&column(vec![opaque, 3i64.into()])),
            ValueKind::Mixed
        );
    }

    #[test]
    fn all_missing_is_unknown() {
        let profile = profile(&column(vec![Cell::Missing, Cell::Float(f64::NAN)]));
        assert_eq!(profile.kind, ValueKind::Unknown);
        assert_eq!(profile.non_missing, 0);
        assert!(!profile.homogeneous);
    }

    #[test]
    fn float_profile_keeps_original_extreme_cells() {
        let profile = profile(&column(vec![
            Cell::Float(3.5),
            Cell::Integer(-2),
            Cell::Missing,
            Cell::Float(10.25),
        ]));
        assert_eq!(profile.kind, ValueKind::Float);
        assert_eq!(profile.min, Some(Cell::Integer(-2)));
        assert_eq!(profile.max, Some(Cell::Float(10.25)));
        assert_eq!(
            profile.decimal,
            Some(DecimalShape {
                integer_digits: 2,
                scale: 2
            })
        );
    }

    #[test]
    fn text_length_counts_characters_and_skips_missing() {
        let profile = profile(&column(vec!["héllo".into(), Cell::Missing, "ab".into()]));
        assert_eq!(profile.max_length, Some(5));
    }

    #[test]
    fn single_timestamp_is_both_min_and_max() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let profile = profile(&column(vec![ts.into()]));
        assert_eq!(profile.min, Some(Cell::Timestamp(ts)));
        assert_eq!(profile.max, Some(Cell::Timestamp(ts)));
    }

    #[test]
    fn non_finite_float_has_no_decimal_shape() {
        let profile = profile(&column(vec![1.5.into(), f64::INFINITY.into()]));
        assert_eq!(profile.decimal, None);
    }

    #[test]
    fn digit_count_handles_zero_and_extremes() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(i64::MIN.unsigned_abs()), 19);
    }
}
