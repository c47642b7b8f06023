//! Columnar dataset model handed to the recommendation engine.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s, and every column is an
//! ordered list of tagged [`Cell`]s. Cells never coerce between kinds; the
//! classifier in [`crate::kind`] decides what a column holds before anything is
//! compared.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    Duration(TimeDelta),
    /// Raw bytes the ingestion layer could not decode.
    Opaque(Vec<u8>),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for `Missing` and for NaN floats, which carry no usable value.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Boolean(b) => b.to_string(),
            Cell::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Duration(delta) => format_duration(delta),
            Cell::Opaque(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Missing => serializer.serialize_none(),
            Cell::Integer(i) => serializer.serialize_i64(*i),
            Cell::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Cell::Boolean(b) => serializer.serialize_bool(*b),
            other => serializer.serialize_str(&other.as_display()),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Timestamp(value)
    }
}

impl From<TimeDelta> for Cell {
    fn from(value: TimeDelta) -> Self {
        Cell::Duration(value)
    }
}

impl<T> From<Option<T>> for Cell
where
    T: Into<Cell>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

/// Renders a duration as `[-]HH:MM:SS[.fraction]`, the literal form SQL `TIME` accepts.
pub fn format_duration(delta: &TimeDelta) -> String {
    let sign = if *delta < TimeDelta::zero() { "-" } else { "" };
    let magnitude = delta.abs();
    let total_seconds = magnitude.num_seconds();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let nanos = magnitude.subsec_nanos();
    if nanos == 0 {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        let fraction = format!("{nanos:09}");
        let fraction = fraction.trim_end_matches('0');
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{fraction}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells that carry a value, in column order.
    pub fn present(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| !cell.is_missing())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column. A column whose name is already present replaces the
    /// earlier one in place, so the last definition wins and order is kept.
    pub fn push(&mut self, column: Column) {
        match self.column_index(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }
}

impl FromIterator<Column> for Dataset {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for column in iter {
            dataset.push(column);
        }
        dataset
    }
}
