//! Line-level helpers shared by the readers.

use std::io::BufRead;

use super::FormatError;

/// One parsed body line
#[derive(Debug, Clone)]
pub(super) struct NumericRow {
    /// 1-based line number in the input file
    pub line: usize,
    /// Parsed cells, in column order
    pub values: Vec<f64>,
}

/// Read the first line of the input, without its line terminator.
pub(super) fn read_header_line<R: BufRead>(reader: &mut R) -> Result<String, FormatError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(FormatError::MalformedHeader("file is empty".to_string()));
    }
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Split a tab-separated header line into column names.
///
/// Names are case-sensitive; surrounding quotes are removed, so thunderSTORM
/// style `"intensity [photon]"` headers resolve to the bare name. Each cell
/// is trimmed of surrounding spaces, so a `" x"` cell names `x`.
pub(super) fn split_tab_header(line: &str) -> Result<Vec<String>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(line.trim().as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(FormatError::MalformedHeader("header line is blank".to_string()));
    }
    Ok(columns)
}

/// Parse a whitespace-delimited numeric body.
///
/// Blank lines and `#` comments are skipped. Every remaining line must hold
/// exactly `width` numbers. `first_line` is the 1-based line number of the
/// first body line, used in diagnostics.
pub(super) fn read_numeric_body<R: BufRead>(
    reader: R,
    width: usize,
    first_line: usize,
) -> Result<Vec<NumericRow>, FormatError> {
    let mut rows = Vec::new();

    for (offset, line) in reader.lines().enumerate() {
        let line_no = first_line + offset;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let values = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    FormatError::conversion(line_no, format!("'{}' is not a number", token))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != width {
            return Err(FormatError::conversion(
                line_no,
                format!("expected {} values, found {}", width, values.len()),
            ));
        }

        rows.push(NumericRow {
            line: line_no,
            values,
        });
    }

    Ok(rows)
}

/// Interpret a numeric cell as a frame number.
pub(super) fn frame_number(value: f64, line: usize) -> Result<u32, FormatError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(FormatError::conversion(
            line,
            format!("frame value {} is not a non-negative integer", value),
        ));
    }
    Ok(value as u32)
}
