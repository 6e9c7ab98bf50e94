use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::tabular::{cell, tabulate, Tabular};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_field_table(map);
            }
        }
        other => match tabulate(other) {
            Some(t) => print_tabular(&t),
            None => println!("{}", cell(Some(other))),
        },
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match (tabulate(result), result) {
        (Some(t), _) => print_tabular(&t),
        (None, Value::Object(res_map)) => print_field_table(res_map),
        (None, other) => println!("{}", cell(Some(other))),
    }

    if let Value::Object(res_map) = result {
        let counts: Vec<String> = ["complete_records", "ratio_errors"]
            .iter()
            .filter_map(|k| res_map.get(*k).map(|v| format!("{}: {}", k, cell(Some(v)))))
            .collect();
        if !counts.is_empty() {
            println!("\n{}", counts.join("  "));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), cell(Some(val))]);
    }
    println!("{}", Table::from(builder));
}

fn print_tabular(t: &Tabular) {
    if t.rows.is_empty() {
        println!("(empty)");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(t.headers.clone());
    for row in &t.rows {
        builder.push_record(row.clone());
    }
    println!("{}", Table::from(builder));
}
