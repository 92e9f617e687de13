// Cross-cutting prompt fragments. Each module that calls the LLM keeps its
// own prompts.rs alongside it and builds on these.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Builds a JSON-only system prompt from a persona line.
pub fn json_system(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_SYSTEM}")
}

/// Pretty-prints a value for embedding in a prompt.
pub fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_appends_constraint() {
        let system = json_system("You are an assessment evaluator.");
        assert!(system.starts_with("You are an assessment evaluator."));
        assert!(system.ends_with(JSON_ONLY_SYSTEM));
    }

    #[test]
    fn test_pretty_json_renders_arrays() {
        let rendered = pretty_json(&vec!["a", "b"]);
        assert!(rendered.contains("\"a\""));
        assert!(rendered.starts_with('['));
    }
}
