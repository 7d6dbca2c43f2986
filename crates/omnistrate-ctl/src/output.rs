use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
    Yaml,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(value)?;
    print!("{}", yaml);
    Ok(())
}

/// JSON or YAML dump of `value`; any other format falls back to JSON.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Yaml => print_yaml(value),
        _ => print_json(value),
    }
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    // Print header
    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    // Print separator
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    // Print rows
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Print serializable rows as a table. Columns come from the serde field
/// names of the first row, in declaration order.
pub fn print_rows<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let (headers, table) = rows_to_table(rows)?;
    if headers.is_empty() {
        println!("No rows.");
        return Ok(());
    }
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    print_table(&header_refs, table);
    Ok(())
}

fn rows_to_table<T: Serialize>(rows: &[T]) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
    let values: Vec<Value> = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let keys: Vec<String> = match values.first() {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(_) => anyhow::bail!("table rows must serialize to objects"),
        None => return Ok((Vec::new(), Vec::new())),
    };

    let table = values
        .iter()
        .map(|v| {
            keys.iter()
                .map(|k| v.get(k).map(display_value).unwrap_or_else(|| "-".into()))
                .collect()
        })
        .collect();
    let headers = keys.iter().map(|k| column_header(k)).collect();
    Ok((headers, table))
}

/// `deploymentCellId` → `DEPLOYMENT CELL ID`.
pub fn column_header(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_uppercase());
    }
    out
}

/// Compact single-line rendering of a JSON value for tables and reports.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.is_empty() => "\"\"".into(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        deployment_cell_id: String,
        drift_items: usize,
        note: Option<String>,
    }

    #[test]
    fn headers_follow_field_tags() {
        let rows = vec![Row {
            deployment_cell_id: "hc-1".into(),
            drift_items: 2,
            note: None,
        }];
        let (headers, table) = rows_to_table(&rows).unwrap();
        assert_eq!(headers, ["DEPLOYMENT CELL ID", "DRIFT ITEMS", "NOTE"]);
        assert_eq!(table, vec![vec!["hc-1".to_string(), "2".into(), "-".into()]]);
    }

    #[test]
    fn empty_rows_have_no_headers() {
        let rows: Vec<Row> = Vec::new();
        let (headers, table) = rows_to_table(&rows).unwrap();
        assert!(headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn non_object_rows_are_rejected() {
        assert!(rows_to_table(&[1, 2]).is_err());
    }

    #[test]
    fn value_rendering() {
        assert_eq!(display_value(&json!(null)), "-");
        assert_eq!(display_value(&json!("1.2")), "1.2");
        assert_eq!(display_value(&json!("")), "\"\"");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!({"a": 1})), "{\"a\":1}");
    }

    #[test]
    fn snake_and_camel_headers() {
        assert_eq!(column_header("last_check"), "LAST CHECK");
        assert_eq!(column_header("hasPendingChanges"), "HAS PENDING CHANGES");
        assert_eq!(column_header("id"), "ID");
    }
}
