use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell_text, row_set};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let result = value.get("result");

    if let Some(grid) = result.and_then(grid_table) {
        println!("{grid}");
    } else if let Some(rows) = row_set(value) {
        println!("{}", rows_table(rows));
    } else if let Some(Value::Object(res)) = result {
        print_result(res);
    } else if let Value::Object(map) = value {
        print_result(map);
    } else {
        println!("{value}");
    }

    if let Value::Object(envelope) = value {
        print_footer(envelope);
    }
}

fn print_result(res: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested = Vec::new();
    for (key, val) in res {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => nested.push((key, items)),
            _ => builder.push_record([key.clone(), cell_text(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in nested {
        println!("\n{key}:");
        println!("{}", rows_table(items));
    }
}

/// WACC rows by terminal-growth columns, base case starred.
fn grid_table(result: &Value) -> Option<Table> {
    let waccs = result.get("wacc_values")?.as_array()?;
    let growths = result.get("terminal_growth_values")?.as_array()?;
    let cells = result.get("cells")?.as_array()?;

    let mut builder = Builder::default();
    let mut header = vec!["WACC \\ TG".to_string()];
    header.extend(growths.iter().map(|g| format!("{}%", cell_text(g))));
    builder.push_record(header);

    for (wacc, row) in waccs.iter().zip(cells) {
        let mut record = vec![format!("{}%", cell_text(wacc))];
        for cell in row.as_array()? {
            let text = cell_text(cell.get("intrinsic_value").unwrap_or(&Value::Null));
            let base = cell.get("is_base_case").and_then(Value::as_bool) == Some(true);
            record.push(if base { format!("*{text}") } else { text });
        }
        builder.push_record(record);
    }
    Some(Table::from(builder))
}

fn rows_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();
    match rows.first() {
        Some(Value::Object(first)) => {
            let headers: Vec<String> = first.keys().cloned().collect();
            builder.push_record(headers.clone());
            for item in rows {
                if let Value::Object(map) = item {
                    builder.push_record(
                        headers
                            .iter()
                            .map(|h| map.get(h.as_str()).map(cell_text).unwrap_or_default()),
                    );
                }
            }
        }
        Some(_) => {
            for item in rows {
                builder.push_record([cell_text(item)]);
            }
        }
        None => builder.push_record(["(empty)"]),
    }
    Table::from(builder)
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grid_table_marks_base_case() {
        let result = json!({
            "wacc_values": ["9.0", "10.0"],
            "terminal_growth_values": ["2.0", "3.0"],
            "cells": [
                [{"intrinsic_value": "12.5", "is_base_case": false},
                 {"intrinsic_value": null, "is_base_case": false}],
                [{"intrinsic_value": "10.1", "is_base_case": true},
                 {"intrinsic_value": "11.0", "is_base_case": false}]
            ]
        });
        let rendered = grid_table(&result).unwrap().to_string();
        assert!(rendered.contains("*10.1"));
        assert!(rendered.contains("N/A"));
        assert!(rendered.contains("3.0%"));
    }

    #[test]
    fn test_grid_table_absent_for_plain_result() {
        assert!(grid_table(&json!({"emi": "4182.20"})).is_none());
    }
}
