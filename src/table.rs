use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Renders rows as space-separated, width-aligned text with a dashed rule under the header.
///
/// `align` holds one entry per column; missing entries default to left alignment.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], align: &[Align]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let header_cells: Vec<Cow<'_, str>> = headers.iter().map(|h| Cow::Borrowed(*h)).collect();
    push_line(&mut output, &header_cells, &widths, &[]);
    let rule: Vec<Cow<'_, str>> = widths
        .iter()
        .map(|w| Cow::Owned("-".repeat((*w).max(3))))
        .collect();
    let rule_widths: Vec<usize> = widths.iter().map(|w| (*w).max(3)).collect();
    push_line(&mut output, &rule, &rule_widths, &[]);
    for row in rows {
        let cells: Vec<Cow<'_, str>> = row.iter().map(|cell| flatten_whitespace(cell)).collect();
        push_line(&mut output, &cells, &widths, align);
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>], align: &[Align]) {
    print!("{}", render_table(headers, rows, align));
}

fn push_line(output: &mut String, cells: &[Cow<'_, str>], widths: &[usize], align: &[Align]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let padding = width.saturating_sub(display_width(cell));
        match align.get(idx).copied().unwrap_or_default() {
            Align::Left => {
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', padding));
            }
            Align::Right => {
                line.extend(std::iter::repeat_n(' ', padding));
                line.push_str(cell);
            }
        }
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn flatten_whitespace(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
