//! Per-column orchestration: classify, profile, map, and assemble a [`Recommendation`].
//!
//! The engine is a pure function of the dataset. It never fails: every column
//! yields exactly one recommendation, in input order, and columns that cannot
//! be typed fall back to `TEXT`.

use log::debug;
use serde::Serialize;

use crate::{
    data::{Cell, Column, Dataset},
    kind::{self, ValueKind},
    mapping::{self, FloatStrategy, SqlType},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendOptions {
    pub float_strategy: FloatStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "column")]
    pub column_name: String,
    pub min: Option<Cell>,
    pub max: Option<Cell>,
    pub observed_kind: ValueKind,
    pub recommended_type: SqlType,
}

pub fn analyze(dataset: &Dataset) -> Vec<Recommendation> {
    analyze_with(dataset, &RecommendOptions::default())
}

pub fn analyze_with(dataset: &Dataset, options: &RecommendOptions) -> Vec<Recommendation> {
    dataset
        .columns()
        .iter()
        .map(|column| analyze_column(column, options))
        .collect()
}

pub fn analyze_column(column: &Column, options: &RecommendOptions) -> Recommendation {
    let profile = kind::profile(column);
    let recommended_type = mapping::recommend_type(&profile, options.float_strategy);
    debug!(
        "Column '{}': {} of {} cell(s) present, kind {}, recommending {}",
        column.name,
        profile.non_missing,
        column.len(),
        profile.kind,
        recommended_type
    );
    let (min, max) = if profile.kind.is_orderable() {
        (profile.min, profile.max)
    } else {
        (None, None)
    };
    Recommendation {
        column_name: column.name.clone(),
        min,
        max,
        observed_kind: profile.kind,
        recommended_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_preserves_column_order() {
        let dataset: Dataset = [
            Column::from_values("z", [1i64]),
            Column::from_values("a", ["x"]),
            Column::from_values("m", [true]),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = analyze(&dataset)
            .into_iter()
            .map(|rec| rec.column_name)
            .collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn boolean_column_reports_no_bounds() {
        let rec = analyze_column(
            &Column::from_values("flag", [true, false, true]),
            &RecommendOptions::default(),
        );
        assert_eq!(rec.recommended_type, SqlType::Boolean);
        assert_eq!(rec.min, None);
        assert_eq!(rec.max, None);
    }

    #[test]
    fn decimal_strategy_applies_to_float_columns_only() {
        let options = RecommendOptions {
            float_strategy: FloatStrategy::Decimal,
        };
        let price = analyze_column(&Column::from_values("price", [19.99, 5.5]), &options);
        assert_eq!(
            price.recommended_type,
            SqlType::Decimal {
                precision: 4,
                scale: 2
            }
        );
        let qty = analyze_column(&Column::from_values("qty", [3i64, 4]), &options);
        assert_eq!(qty.recommended_type.to_string(), "TINYINT UNSIGNED");
    }

    #[test]
    fn empty_dataset_yields_no_recommendations() {
        assert!(analyze(&Dataset::new()).is_empty());
    }

    #[test]
    fn serializes_with_report_field_names() {
        let rec = analyze_column(
            &Column::from_values("id", [1i64, 300]),
            &RecommendOptions::default(),
        );
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["column"], "id");
        assert_eq!(json["min"], 1);
        assert_eq!(json["max"], 300);
        assert_eq!(json["observed_kind"], "integer");
        assert_eq!(json["recommended_type"], "SMALLINT UNSIGNED");
    }
}
