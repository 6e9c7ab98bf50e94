use serde_json::{Map, Value};

const GROUPS: [&str; 4] = ["liquidity", "profitability", "efficiency", "solvency"];

/// Rectangular view of a command result, shared by table and CSV output.
#[derive(Debug, Default, PartialEq)]
pub struct Tabular {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flatten a result into rows.
///
/// Ratio records become one row per (entity, year, ratio), comparisons one
/// row per ratio with a column per entity, and trend periods one row per
/// ratio change. Other arrays of objects use the first object's keys.
pub fn tabulate(result: &Value) -> Option<Tabular> {
    match result {
        Value::Object(map) => {
            if let Some(Value::Array(records)) = map.get("records") {
                Some(ratio_records(records))
            } else if let (Some(Value::Array(entities)), Some(Value::Array(rows))) =
                (map.get("entities"), map.get("rows"))
            {
                Some(comparison(entities, rows))
            } else {
                None
            }
        }
        Value::Array(items) if items.iter().any(|i| i.get("changes").is_some()) => {
            Some(trend_periods(items))
        }
        Value::Array(items) => object_rows(items),
        _ => None,
    }
}

fn ratio_records(records: &[Value]) -> Tabular {
    let mut out = Tabular {
        headers: header(&["entity_id", "fiscal_year", "group", "ratio", "value", "error"]),
        rows: Vec::new(),
    };
    for record in records {
        let entity = cell(record.get("entity_id"));
        let year = cell(record.get("fiscal_year"));
        for group in GROUPS {
            let Some(Value::Object(ratios)) = record.get(group) else {
                continue;
            };
            for (ratio, value) in ratios {
                out.rows.push(vec![
                    entity.clone(),
                    year.clone(),
                    group.to_string(),
                    ratio.clone(),
                    cell(Some(value)),
                    error_kind(record, ratio).unwrap_or_default(),
                ]);
            }
        }
    }
    out
}

/// The error kind recorded against `ratio`, if any.
fn error_kind(record: &Value, ratio: &str) -> Option<String> {
    let errors = record.get("errors")?.as_array()?;
    errors
        .iter()
        .find(|e| e.pointer("/detail/ratio").and_then(Value::as_str) == Some(ratio))
        .and_then(|e| e.get("kind"))
        .map(|k| cell(Some(k)))
}

fn comparison(entities: &[Value], rows: &[Value]) -> Tabular {
    let names: Vec<String> = entities.iter().map(|e| cell(Some(e))).collect();
    let mut headers = vec!["ratio".to_string()];
    headers.extend(names.iter().cloned());
    headers.push("leader".into());
    headers.push("spread".into());

    let mut out = Tabular {
        headers,
        rows: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        let values: Map<String, Value> = row
            .get("values")
            .and_then(Value::as_array)
            .map(|vs| {
                vs.iter()
                    .filter_map(|v| {
                        let id = v.get("entity_id")?.as_str()?.to_string();
                        Some((id, v.get("value").cloned().unwrap_or(Value::Null)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut line = vec![cell(row.get("label").or_else(|| row.get("ratio")))];
        line.extend(names.iter().map(|n| cell(values.get(n))));
        line.push(cell(row.get("leader")));
        line.push(cell(row.get("spread")));
        out.rows.push(line);
    }
    out
}

fn trend_periods(periods: &[Value]) -> Tabular {
    let mut out = Tabular {
        headers: header(&["entity_id", "from_year", "to_year", "ratio", "from", "to", "change", "direction"]),
        rows: Vec::new(),
    };
    for period in periods {
        let prefix = [
            cell(period.get("entity_id")),
            cell(period.get("from_year")),
            cell(period.get("to_year")),
        ];
        let Some(Value::Array(changes)) = period.get("changes") else {
            continue;
        };
        for change in changes {
            let mut line = prefix.to_vec();
            for field in ["ratio", "from", "to", "change", "direction"] {
                line.push(cell(change.get(field)));
            }
            out.rows.push(line);
        }
    }
    out
}

fn object_rows(items: &[Value]) -> Option<Tabular> {
    let Value::Object(first) = items.first()? else {
        return None;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|h| cell(map.get(h.as_str())))
                .collect::<Vec<String>>()
        })
        .collect();
    Some(Tabular { headers, rows })
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Render one JSON value as a table cell; absent and null are blank.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(arr)) => arr
            .iter()
            .map(|v| cell(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(obj @ Value::Object(_)) => serde_json::to_string(obj).unwrap_or_default(),
    }
}
