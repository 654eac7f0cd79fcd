//! Output schemas requested from the model, one per operation.

use serde_json::Value;

use super::types::{
    ChatOutput, ContradictionsOutput, ExtractOutput, FairnessOutput, GlossaryEntry,
    SummarizeOutput,
};
use crate::llm::schema::{describe, output_schema};

pub fn summarize() -> Value {
    output_schema::<SummarizeOutput>()
}

pub fn glossary() -> Value {
    let mut schema = output_schema::<Vec<GlossaryEntry>>();
    describe(&mut schema, "", "An array of glossary entries.");
    schema
}

/// The flag reason is judged against the configured jurisdiction.
pub fn fairness(jurisdiction: &str) -> Value {
    let mut schema = output_schema::<FairnessOutput>();
    describe(
        &mut schema,
        "/properties/benchmarks/items/properties/reason",
        format!(
            "The reason why this clause is considered stricter or unusual compared to common legal practices in {}.",
            jurisdiction
        ),
    );
    schema
}

pub fn contradictions() -> Value {
    output_schema::<ContradictionsOutput>()
}

pub fn chat() -> Value {
    output_schema::<ChatOutput>()
}

pub fn extract_text() -> Value {
    output_schema::<ExtractOutput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fairness_reason_names_jurisdiction() {
        let schema = fairness("Quebec");
        let item = &schema["properties"]["benchmarks"]["items"];
        let reason = item["properties"]["reason"]["description"].as_str().unwrap();
        assert!(reason.ends_with("common legal practices in Quebec."));
        assert_eq!(
            item["properties"]["severity"]["enum"],
            json!(["High", "Medium", "Low"])
        );
    }

    #[test]
    fn test_contradictions_are_pairs() {
        let schema = contradictions();
        let clauses =
            &schema["properties"]["contradictions"]["items"]["properties"]["contradictoryClauses"];
        assert_eq!(clauses["minItems"], 2);
        assert_eq!(clauses["maxItems"], 2);
    }

    #[test]
    fn test_glossary_root_is_array() {
        let schema = glossary();
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["description"], "An array of glossary entries.");
        assert_eq!(
            schema["items"]["properties"]["term"]["description"],
            "The legal term."
        );
    }

    #[test]
    fn test_summary_uses_wire_names() {
        let schema = summarize();
        assert!(schema["properties"]["clauseSummaries"]["items"]["properties"]["clause"].is_object());
        assert_eq!(chat()["required"], json!(["answer"]));
        assert_eq!(extract_text()["required"], json!(["text"]));
    }
}
