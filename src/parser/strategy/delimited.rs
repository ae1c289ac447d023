use crate::normalize::{contains_any, has_digit, DIRECTION_WORDS, HEADER_TERMS, TABLE_TERMS};
use crate::table::Table;

/// Delimited-table scan: pipe- or tab-separated lines carrying domain
/// keywords. The first keyword-bearing header line names the columns; the
/// remaining collected lines become rows if they carry a direction word or a
/// digit and split into at least 3 cells.
pub fn parse(text: &str) -> Option<Table> {
    let table_lines: Vec<&str> = text
        .lines()
        .filter(|l| (l.contains('|') || l.contains('\t')) && contains_any(l, TABLE_TERMS))
        .collect();
    if table_lines.is_empty() {
        return None;
    }

    let sep = if table_lines[0].contains('|') { '|' } else { '\t' };

    let header_line = table_lines
        .iter()
        .copied()
        .find(|l| contains_any(l, HEADER_TERMS))?;
    let headers = split_cells(header_line, sep);

    let rows: Vec<Vec<String>> = table_lines
        .iter()
        .filter(|l| **l != header_line)
        .filter(|l| contains_any(l, DIRECTION_WORDS) || has_digit(l))
        .map(|l| split_cells(l, sep))
        .filter(|cells| cells.len() >= 3)
        .collect();

    if headers.is_empty() || rows.is_empty() {
        return None;
    }
    Some(Table::new(headers, rows))
}

fn split_cells(line: &str, sep: char) -> Vec<String> {
    line.split(sep)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_table_with_header_and_row() {
        let text = "时间 | 方向 | 开仓 | 止盈 | 止损\n20250411220 | 多 | 81000 | 83259 | 80000\n";
        let table = parse(text).unwrap();
        assert_eq!(table.headers, vec!["时间", "方向", "开仓", "止盈", "止损"]);
        assert_eq!(table.rows, vec![vec!["20250411220", "多", "81000", "83259", "80000"]]);
    }

    #[test]
    fn short_rows_are_dropped() {
        let text = "方向 | 开仓 | 止盈 | 止损\n多 | 81000\n空 | 80000 | 82000 | 79000\n";
        let table = parse(text).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "空");
    }

    #[test]
    fn no_delimiter_means_no_table() {
        assert!(parse("方向: 多, 开仓价: 81000").is_none());
    }

    #[test]
    fn delimiter_without_keywords_means_no_table() {
        assert!(parse("a | b | c\n1 | 2 | 3\n").is_none());
    }
}
