//! Column-aligned table rendering for help and status output.

use core_text::str_width;

/// Render `rows` as left-justified aligned columns. `csize` supplies
/// minimum column widths (all zero when `None`); `cmargin` is the gap
/// enforced between a cell and the next column. Widths are measured in
/// display columns, so wide glyphs stay aligned.
///
/// Panics when rows are ragged or `csize` does not match the column
/// count; the tables rendered here are static program data.
pub fn table_string(rows: &[Vec<String>], csize: Option<&[usize]>, cmargin: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let ncols = rows[0].len();
    let mut widths = match csize {
        Some(sizes) => {
            assert_eq!(sizes.len(), ncols, "csize length != column count");
            sizes.to_vec()
        }
        None => vec![0; ncols],
    };
    for row in rows {
        assert_eq!(row.len(), ncols, "ragged table row");
        for (col, cell) in row.iter().enumerate() {
            let need = str_width(cell) + cmargin;
            if need >= widths[col] {
                widths[col] = need;
            }
        }
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let pad = widths[col].saturating_sub(str_width(cell));
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
