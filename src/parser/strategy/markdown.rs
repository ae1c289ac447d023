use std::sync::LazyLock;

use regex::Regex;

use crate::table::Table;

static MD_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\|(.+)\|\r?\n\|[-:| ]+\|\r?\n((?:\|.*\|\r?\n?)+)").unwrap()
});

/// Markdown-table scan: header row, dash/colon separator row, one or more
/// pipe-delimited data rows. Matched rows are returned verbatim.
pub fn parse(text: &str) -> Option<Table> {
    let caps = MD_TABLE_RE.captures(text)?;

    let headers = split_row(&caps[1]);
    let rows: Vec<Vec<String>> = caps[2]
        .lines()
        .map(split_row)
        .filter(|cells| !cells.is_empty())
        .collect();

    if headers.is_empty() || rows.is_empty() {
        return None;
    }
    Some(Table::new(headers, rows))
}

fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_table_rows_verbatim() {
        let text = "\
| 方向 | 开仓价 | 止盈价 | 止损价 |
|------|--------|--------|--------|
| 空 | 80,500-81,300 | 78,000 | 83,500 |
| 多 | 81000 | 83259 | 80000 |
";
        let table = parse(text).unwrap();
        assert_eq!(table.headers, vec!["方向", "开仓价", "止盈价", "止损价"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["空", "80,500-81,300", "78,000", "83,500"]);
        assert_eq!(table.rows[1], vec!["多", "81000", "83259", "80000"]);
    }

    #[test]
    fn table_embedded_in_prose() {
        let text = "今日策略如下：\n| direction | entry | target | stop |\n| --- | --- | --- | --- |\n| short | 81000 | 78000 | 83500 |\n祝顺利。";
        let table = parse(text).unwrap();
        assert_eq!(table.rows, vec![vec!["short", "81000", "78000", "83500"]]);
    }

    #[test]
    fn missing_separator_row_is_not_markdown() {
        let text = "| 方向 | 开仓 | 止盈 |\n| 多 | 81000 | 83259 |\n";
        assert!(parse(text).is_none());
    }
}
