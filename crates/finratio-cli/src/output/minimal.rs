use serde_json::Value;

use super::tabular::cell;

/// Print just the headline figure of each result item.
///
/// Ratio derivation prints completeness counts, comparisons the leader per
/// ratio, and per-record analyses one `entity / year: value` line each.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for line in minimal_lines(result) {
        println!("{}", line);
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    // Headline field per analysis, in priority order.
    let priority_keys = ["ccc", "roe_product", "changes"];

    match result {
        Value::Object(map) if map.contains_key("records") => {
            let total = map
                .get("records")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            vec![format!(
                "{}/{} complete, {} ratio errors",
                cell(map.get("complete_records")),
                total,
                cell(map.get("ratio_errors"))
            )]
        }
        Value::Object(map) if map.contains_key("rows") => map
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|r| format!("{}: {}", cell(r.get("ratio")), cell(r.get("leader"))))
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let key = format!(
                    "{} / {}",
                    cell(item.get("entity_id")),
                    cell(item.get("fiscal_year").or_else(|| item.get("to_year")))
                );
                let headline = priority_keys
                    .iter()
                    .find_map(|k| item.get(*k).filter(|v| !v.is_null()))
                    .map(|v| match v {
                        Value::Array(changes) => format!("{} changes", changes.len()),
                        other => cell(Some(other)),
                    })
                    .unwrap_or_else(|| "n/a".into());
                format!("{}: {}", key, headline)
            })
            .collect(),
        other => vec![cell(Some(other))],
    }
}
