use serde_json::Value;
use std::io::{self, Read};

/// Read a piped statement document from stdin.
///
/// JSON is tried first, then YAML. Returns None when stdin is a TTY or the
/// pipe is empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map(Some)
            .map_err(|_| format!("stdin is neither JSON nor YAML: {}", json_err).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_and_yaml_documents() {
        let json = parse_document(r#"[{"entity_id": "IPG", "fiscal_year": 2023}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(json[0]["entity_id"], "IPG");

        let yaml = parse_document("- entity_id: IPG\n  fiscal_year: 2023\n")
            .unwrap()
            .unwrap();
        assert_eq!(yaml[0]["fiscal_year"], 2023);
    }

    #[test]
    fn test_blank_pipe_is_none() {
        assert!(parse_document("  \n").unwrap().is_none());
    }
}
