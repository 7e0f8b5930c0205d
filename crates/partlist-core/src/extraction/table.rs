use std::collections::HashSet;

use crate::extraction::{RawRow, RawTable};
use crate::parsing::header::normalize_header;

/// Reconstruct tables from pdftotext -layout output.
///
/// pdftotext -layout preserves column alignment using spaces. A table
/// starts at a header line and the header's column starts become the cell
/// boundaries for every following line.
///
/// A single blank line inside a table is a loose row gap: the table goes on
/// if the next line has at least two columns. Two blank lines in a row, a
/// `---` rule or a page footer end the table.
pub fn detect_tables(lines: &[&str], header_keywords: &[String]) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut current: Option<(Vec<usize>, RawTable)> = None;
    let mut blank_run = 0;

    for line in lines {
        let starts_table = match current {
            None => is_table_header(line, header_keywords),
            // inside a table, only a line of nothing but known headings
            Some(_) => is_table_header(line, header_keywords) && is_all_headings(line),
        };
        if starts_table {
            if let Some((_, table)) = current.take() {
                tables.push(table);
            }
            let starts = column_starts(line);
            let header = slice_columns(line, &starts);
            current = Some((starts, vec![header]));
            blank_run = 0;
            continue;
        }

        if current.is_none() {
            continue;
        }

        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run >= 2 {
                if let Some((_, table)) = current.take() {
                    tables.push(table);
                }
            }
            continue;
        }

        let resumes_after_gap = blank_run == 0 || column_starts(line).len() >= 2;
        blank_run = 0;
        if is_table_end(line) || !resumes_after_gap {
            if let Some((_, table)) = current.take() {
                tables.push(table);
            }
            continue;
        }
        if let Some((starts, table)) = current.as_mut() {
            table.push(slice_columns(line, starts));
        }
    }

    if let Some((_, table)) = current {
        tables.push(table);
    }

    tables
}

/// Detect if a line looks like a table header row: it mentions a header
/// keyword and at least two of its columns name distinct canonical columns.
pub fn is_table_header(line: &str, header_keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    if !header_keywords.iter().any(|kw| lower.contains(kw.as_str())) {
        return false;
    }
    let starts = column_starts(line);
    if starts.len() < 2 {
        return false;
    }
    let resolved: HashSet<_> = slice_columns(line, &starts)
        .iter()
        .filter_map(|cell| normalize_header(cell.as_deref()))
        .collect();
    resolved.len() >= 2
}

fn is_all_headings(line: &str) -> bool {
    slice_columns(line, &column_starts(line))
        .iter()
        .flatten()
        .all(|cell| normalize_header(Some(cell)).is_some())
}

fn is_table_end(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.starts_with("---") {
        return true;
    }
    // Page footers: "Page 3", "Page 3 of 40"
    let lower = trimmed.to_lowercase();
    lower.starts_with("page ")
        && lower[5..]
            .split_whitespace()
            .next()
            .is_some_and(|w| w.chars().all(|c| c.is_ascii_digit()))
}

/// Character offsets where each segment of a line starts, segments being
/// separated by gaps of 2+ whitespace characters.
pub fn column_starts(line: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_segment = false;
    let mut space_count = 0;

    for (i, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                in_segment = false;
            }
        } else {
            if !in_segment {
                starts.push(i);
                in_segment = true;
            }
            space_count = 0;
        }
    }

    starts
}

/// Cut a line into cells at the given column starts.
///
/// A boundary that falls inside a word is moved left to the start of that
/// word, so right-aligned values that overhang their header stay whole.
fn slice_columns(line: &str, starts: &[usize]) -> RawRow {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();

    let mut bounds = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let floor = bounds.last().copied().unwrap_or(0);
        let mut b = if i == 0 { 0 } else { start.min(len) };
        while b > floor && b < len && !chars[b].is_whitespace() && !chars[b - 1].is_whitespace() {
            b -= 1;
        }
        bounds.push(b.max(floor));
    }

    bounds
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let to = bounds.get(i + 1).copied().unwrap_or(len);
            let cell: String = chars[from..to].iter().collect();
            let cell = cell.trim();
            if cell.is_empty() {
                None
            } else {
                Some(cell.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        crate::config::ExtractionConfig::default().header_keywords
    }

    fn cells(row: &RawRow) -> Vec<&str> {
        row.iter().map(|c| c.as_deref().unwrap_or("")).collect()
    }

    #[test]
    fn test_is_table_header() {
        assert!(is_table_header(
            "  Part No.     Origin     Brand     Cost",
            &keywords()
        ));
        assert!(!is_table_header("  A100     USA     Acme", &keywords()));
        // keyword but a single column: key/value text, not a table
        assert!(!is_table_header("Origin: USA", &keywords()));
    }

    #[test]
    fn test_column_starts() {
        assert_eq!(column_starts("Part No.   Origin  Brand"), vec![0, 11, 19]);
        assert_eq!(column_starts("  A 1"), vec![2]);
    }

    #[test]
    fn test_slice_columns_right_aligned_overhang() {
        let header = "Part No.    Origin    Cost";
        let starts = column_starts(header);
        let row = slice_columns("A100        USA     1,250.00", &starts);
        assert_eq!(cells(&row), vec!["A100", "USA", "1,250.00"]);
    }

    #[test]
    fn test_slice_columns_missing_cell() {
        let header = "Part No.    Origin    Brand";
        let starts = column_starts(header);
        let row = slice_columns("A100                  Acme", &starts);
        assert_eq!(row, vec![Some("A100".into()), None, Some("Acme".into())]);
    }

    #[test]
    fn test_detect_tables() {
        let lines = vec![
            "CTC ITEM LIST",
            "  Part No.     Origin     Brand     Cost",
            "  A100         USA        Acme      12.50",
            "  B200         JAPAN      Denso     8.00",
            "",
            "Page 1 of 3",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
        assert_eq!(cells(&tables[0][0]), vec!["Part No.", "Origin", "Brand", "Cost"]);
        assert_eq!(cells(&tables[0][2]), vec!["B200", "JAPAN", "Denso", "8.00"]);
    }

    #[test]
    fn test_repeated_header_starts_new_table() {
        let lines = vec![
            "Part No.    Brand",
            "A100        Acme",
            "Part No.    Brand",
            "B200        Denso",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_footer_ends_table() {
        let lines = vec!["Part No.    Brand", "A100        Acme", "Page 2", "B200   X"];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
    }

    #[test]
    fn test_keyword_in_data_row_does_not_split_table() {
        let lines = vec![
            "Part No.    Decc                Origin",
            "A100        Oil filter          USA",
            "A200        Low cost seal       Japan",
            "A300        Brand new gasket    Korea",
            "A400        Price tag holder    USA",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 5);
        assert_eq!(cells(&tables[0][2]), vec!["A200", "Low cost seal", "Japan"]);
    }

    #[test]
    fn test_single_keyword_line_is_not_header() {
        assert!(!is_table_header("Prices valid    until March", &keywords()));
        assert!(!is_table_header("A200   Low cost seal   Japan", &keywords()));
    }

    #[test]
    fn test_single_blank_line_inside_table() {
        let lines = vec![
            "Part No.    Origin    Brand",
            "A100        USA       Acme",
            "",
            "A200        Japan     Denso",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(cells(&tables[0][2]), vec!["A200", "Japan", "Denso"]);
    }

    #[test]
    fn test_two_blank_lines_end_table() {
        let lines = vec![
            "Part No.    Origin    Brand",
            "A100        USA       Acme",
            "",
            "",
            "A200        Japan     Denso",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
    }

    #[test]
    fn test_single_column_text_after_gap_ends_table() {
        let lines = vec![
            "Part No.    Origin    Brand",
            "A100        USA       Acme",
            "",
            "Prices subject to change without notice",
            "B200        Japan     Denso",
        ];
        let tables = detect_tables(&lines, &keywords());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 2);
    }

    #[test]
    fn test_no_header_no_tables() {
        let lines = vec!["A100    USA    Acme", "B200    JAPAN  Denso"];
        assert!(detect_tables(&lines, &keywords()).is_empty());
    }
}
