//! Relational type vocabulary and the rules that map a column profile onto it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::{
    data::Cell,
    kind::{ColumnProfile, DecimalShape, ValueKind},
};

pub const VARCHAR_MAX_LENGTH: usize = 255;
pub const DECIMAL_MAX_PRECISION: u32 = 65;
pub const DECIMAL_MAX_SCALE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntegerWidth {
    Tiny,
    Small,
    Medium,
    Regular,
    Big,
}

impl IntegerWidth {
    fn keyword(&self) -> &'static str {
        match self {
            IntegerWidth::Tiny => "TINYINT",
            IntegerWidth::Small => "SMALLINT",
            IntegerWidth::Medium => "MEDIUMINT",
            IntegerWidth::Regular => "INT",
            IntegerWidth::Big => "BIGINT",
        }
    }
}

/// Inclusive upper bounds for non-negative ranges, narrowest first.
const UNSIGNED_BUCKETS: &[(i64, IntegerWidth)] = &[
    (255, IntegerWidth::Tiny),
    (65_535, IntegerWidth::Small),
    (16_777_215, IntegerWidth::Medium),
    (4_294_967_295, IntegerWidth::Regular),
];

/// Inclusive bounds for ranges that dip below zero, narrowest first.
const SIGNED_BUCKETS: &[(i64, i64, IntegerWidth)] = &[
    (-128, 127, IntegerWidth::Tiny),
    (-32_768, 32_767, IntegerWidth::Small),
    (-8_388_608, 8_388_607, IntegerWidth::Medium),
    (-2_147_483_648, 2_147_483_647, IntegerWidth::Regular),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer { width: IntegerWidth, unsigned: bool },
    Double,
    Decimal { precision: u32, scale: u32 },
    Varchar(usize),
    Text,
    Boolean,
    DateTime,
    Time,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer { width, unsigned } => {
                f.write_str(width.keyword())?;
                if *unsigned {
                    f.write_str(" UNSIGNED")?;
                }
                Ok(())
            }
            SqlType::Double => f.write_str("DOUBLE"),
            SqlType::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            SqlType::Varchar(length) => write!(f, "VARCHAR({length})"),
            SqlType::Text => f.write_str("TEXT"),
            SqlType::Boolean => f.write_str("BOOLEAN"),
            SqlType::DateTime => f.write_str("DATETIME"),
            SqlType::Time => f.write_str("TIME"),
        }
    }
}

impl Serialize for SqlType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// How columns of fractional numbers are declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FloatStrategy {
    #[default]
    Double,
    /// Exact `DECIMAL(p,s)` when every value fits, `DOUBLE` otherwise.
    Decimal,
}

/// Smallest integer type that holds every value in `[min, max]`.
pub fn integer_type(min: i64, max: i64) -> SqlType {
    if min >= 0 {
        let width = UNSIGNED_BUCKETS
            .iter()
            .find(|(upper, _)| max <= *upper)
            .map_or(IntegerWidth::Big, |(_, width)| *width);
        SqlType::Integer {
            width,
            unsigned: true,
        }
    } else {
        let width = SIGNED_BUCKETS
            .iter()
            .find(|(lower, upper, _)| min >= *lower && max <= *upper)
            .map_or(IntegerWidth::Big, |(_, _, width)| *width);
        SqlType::Integer {
            width,
            unsigned: false,
        }
    }
}

/// `VARCHAR(n)` up to the length limit; `TEXT` beyond it or when nothing was measured.
pub fn text_type(max_length: usize) -> SqlType {
    if max_length == 0 || max_length > VARCHAR_MAX_LENGTH {
        SqlType::Text
    } else {
        SqlType::Varchar(max_length)
    }
}

pub fn float_type(shape: Option<DecimalShape>, strategy: FloatStrategy) -> SqlType {
    match (strategy, shape) {
        (FloatStrategy::Decimal, Some(shape))
            if shape.precision() <= DECIMAL_MAX_PRECISION && shape.scale <= DECIMAL_MAX_SCALE =>
        {
            SqlType::Decimal {
                precision: shape.precision(),
                scale: shape.scale,
            }
        }
        _ => SqlType::Double,
    }
}

pub fn recommend_type(profile: &ColumnProfile, strategy: FloatStrategy) -> SqlType {
    match profile.kind {
        ValueKind::Integer => match (&profile.min, &profile.max) {
            (Some(Cell::Integer(min)), Some(Cell::Integer(max))) => {
                integer_type(*min, *max)
            }
            _ => SqlType::Text,
        },
        ValueKind::Float => float_type(profile.decimal, strategy),
        ValueKind::Text => text_type(profile.max_length.unwrap_or(0)),
        ValueKind::Boolean => SqlType::Boolean,
        ValueKind::Timestamp => SqlType::DateTime,
        ValueKind::Duration => SqlType::Time,
        ValueKind::Mixed | ValueKind::Unknown => SqlType::Text,
    }
}
