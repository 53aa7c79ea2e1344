use serde_json::{Map, Value};
use std::io;

use super::{cell_text, row_set};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Row sets (sensitivity cells, search hits) become one record per row.
/// Otherwise the `result` object is written as `field,value` pairs, with
/// nested lists such as projections or alerts appended as their own blocks.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    if let Some(rows) = row_set(value) {
        write_rows(&mut wtr, rows);
    } else if let Some(Value::Object(result)) = value.get("result") {
        write_fields(&mut wtr, result);
    } else if let Value::Object(map) = value {
        write_fields(&mut wtr, map);
    } else {
        let _ = wtr.write_record([cell_text(value)]);
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    let mut nested = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                nested.push((key, items));
            }
            _ => {
                let _ = wtr.write_record([key.as_str(), &cell_text(val)]);
            }
        }
    }
    for (key, items) in nested {
        let _ = wtr.write_record([""]);
        let _ = wtr.write_record([key.as_str()]);
        write_rows(wtr, items);
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([cell_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
