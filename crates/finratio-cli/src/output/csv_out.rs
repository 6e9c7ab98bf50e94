use serde_json::{Map, Value};
use std::io;

use super::tabular::{cell, tabulate};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(t) = tabulate(body) {
        let _ = wtr.write_record(&t.headers);
        for row in &t.rows {
            let _ = wtr.write_record(row);
        }
    } else if let Value::Object(map) = body {
        write_fields(&mut wtr, map);
    } else {
        let _ = wtr.write_record([cell(Some(body))]);
    }

    let _ = wtr.flush();
}

/// Two-column CSV: field, value
fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &cell(Some(val))]);
    }
}
