//! Model response validation.
//!
//! The answer must be a JSON object with string `action` and `observation`
//! fields; extra fields are ignored. Text that is not JSON at all (even
//! after unwrapping a markdown code block) is a parse error, JSON of the
//! wrong shape is a validation error. The two map to different sentinels.

use castaway_types::DecisionResult;

use crate::error::RunnerError;

/// Validate raw model output into a decision.
///
/// # Errors
///
/// Returns [`RunnerError::Parse`] if no JSON can be recovered from `raw`,
/// or [`RunnerError::Validation`] if the JSON does not have the decision
/// shape.
pub fn validate_completion(raw: &str) -> Result<DecisionResult, RunnerError> {
    let value = extract_json(raw)?;
    serde_json::from_value::<DecisionResult>(value)
        .map_err(|e| RunnerError::Validation(e.to_string()))
}

fn extract_json(raw: &str) -> Result<serde_json::Value, RunnerError> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(inner) = extract_json_from_codeblock(trimmed)
        && let Ok(value) = serde_json::from_str(inner)
    {
        return Ok(value);
    }

    Err(RunnerError::Parse(format!("response is not JSON: {trimmed}")))
}

/// Extract the body of a markdown code block (```json or bare ```).
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    let fence = text
        .find("```json")
        .map(|i| (i, "```json".len()))
        .or_else(|| text.find("```").map(|i| (i, "```".len())))?;

    let after_tag = fence.0.checked_add(fence.1)?;
    let start = text
        .get(after_tag..)
        .and_then(|s| s.find('\n'))
        .and_then(|nl| after_tag.checked_add(nl))
        .and_then(|pos| pos.checked_add(1))
        .unwrap_or(after_tag);

    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_decision() {
        let result = validate_completion(r#"{"action": "eat", "observation": "I am hungry"}"#);
        assert_eq!(result.ok(), Some(DecisionResult::new("eat", "I am hungry")));
    }

    #[test]
    fn extra_fields_ignored() {
        let result = validate_completion(
            r#"{"action": "drink", "observation": "thirsty", "confidence": "high"}"#,
        );
        assert_eq!(result.ok(), Some(DecisionResult::new("drink", "thirsty")));
    }

    #[test]
    fn missing_observation_is_validation_error() {
        let result = validate_completion(r#"{"action": "eat"}"#);
        assert!(matches!(result, Err(RunnerError::Validation(_))));
    }

    #[test]
    fn wrong_field_type_is_validation_error() {
        let result = validate_completion(r#"{"action": 3, "observation": "x"}"#);
        assert!(matches!(result, Err(RunnerError::Validation(_))));
        let result = validate_completion(r#"["eat", "hungry"]"#);
        assert!(matches!(result, Err(RunnerError::Validation(_))));
    }

    #[test]
    fn prose_is_parse_error() {
        let result = validate_completion("I think you should eat something.");
        assert!(matches!(result, Err(RunnerError::Parse(_))));
        let result = validate_completion("");
        assert!(matches!(result, Err(RunnerError::Parse(_))));
    }

    #[test]
    fn codeblock_unwrapped() {
        let raw = "Sure:\n```json\n{\"action\": \"rest\", \"observation\": \"tired\"}\n```";
        let result = validate_completion(raw);
        assert_eq!(result.ok(), Some(DecisionResult::new("rest", "tired")));
    }

    #[test]
    fn bare_codeblock_unwrapped() {
        let text = "```\n{\"action\": \"eat\"}\n```";
        assert_eq!(extract_json_from_codeblock(text), Some("{\"action\": \"eat\"}"));
    }
}
