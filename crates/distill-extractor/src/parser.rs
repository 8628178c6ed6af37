//! Parse provider output into a candidate record

use crate::error::ExtractorError;
use serde_json::Value;

/// Parse the provider's reply into a JSON value
///
/// Models sometimes wrap JSON in markdown code blocks despite instructions;
/// strip the fences before parsing.
pub fn parse_record(response: &str) -> Result<Value, ExtractorError> {
    let json_str = strip_code_fences(response)?;

    serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidRecord(format!("JSON parse error: {}", e)))
}

/// Extract JSON from a response, handling markdown code blocks
fn strip_code_fences(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidRecord("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}
