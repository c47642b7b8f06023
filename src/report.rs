//! Rendering and export of recommendations: aligned table, CSV, and JSON.

use std::io::Write;

use anyhow::{Context, Result};

use crate::{
    recommend::Recommendation,
    table::{self, Align},
};

pub const REPORT_HEADERS: [&str; 5] = ["Column", "Min", "Max", "Observed Kind", "Recommended SQL Type"];

const REPORT_ALIGNMENT: [Align; 5] = [
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Left,
    Align::Left,
];

/// One display row per recommendation; absent bounds render as empty strings.
pub fn report_rows(recommendations: &[Recommendation]) -> Vec<Vec<String>> {
    recommendations
        .iter()
        .map(|rec| {
            vec![
                rec.column_name.clone(),
                rec.min.as_ref().map(ToString::to_string).unwrap_or_default(),
                rec.max.as_ref().map(ToString::to_string).unwrap_or_default(),
                rec.observed_kind.to_string(),
                rec.recommended_type.to_string(),
            ]
        })
        .collect()
}

pub fn render_table(recommendations: &[Recommendation]) -> String {
    table::render_table(&REPORT_HEADERS, &report_rows(recommendations), &REPORT_ALIGNMENT)
}

pub fn print_table(recommendations: &[Recommendation]) {
    table::print_table(&REPORT_HEADERS, &report_rows(recommendations), &REPORT_ALIGNMENT);
}

pub fn write_csv<W: Write>(writer: W, recommendations: &[Recommendation]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(REPORT_HEADERS)
        .context("Writing report header")?;
    for row in report_rows(recommendations) {
        csv_writer
            .write_record(&row)
            .with_context(|| format!("Writing report row for column '{}'", row[0]))?;
    }
    csv_writer.flush().context("Flushing report CSV")?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, recommendations: &[Recommendation]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, recommendations).context("Writing report JSON")?;
    writeln!(writer).context("Writing report JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Column, Dataset};
    use crate::recommend::analyze;

    fn sample() -> Vec<Recommendation> {
        let dataset: Dataset = [
            Column::from_values("id", [1i64, 200]),
            Column::new("note", vec![Cell::text("hi, there"), Cell::Missing]),
        ]
        .into_iter()
        .collect();
        analyze(&dataset)
    }

    #[test]
    fn write_csv_quotes_fields_and_leaves_absent_bounds_empty() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Column,Min,Max,Observed Kind,Recommended SQL Type\n\
             id,1,200,integer,TINYINT UNSIGNED\n\
             note,,,text,VARCHAR(9)\n"
        );
    }

    #[test]
    fn write_json_emits_null_bounds() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed[1]["column"], "note");
        assert!(parsed[1]["min"].is_null());
        assert_eq!(parsed[0]["recommended_type"], "TINYINT UNSIGNED");
    }

    #[test]
    fn render_table_right_aligns_bounds() {
        let rendered = render_table(&sample());
        let row = rendered.lines().nth(2).unwrap();
        assert!(row.starts_with("id"));
        assert!(row.contains("  1  200  integer"));
    }
}
