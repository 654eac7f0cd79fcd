//! Prompt templates for document analysis.
//!
//! Placeholders are `{content}`, `{question}`, `{clause}` and
//! `{jurisdiction}`; see [`render`].

/// Clause-by-clause plain-English summary.
pub const SUMMARIZE_PROMPT: &str = r#"You are an expert legal summarizer. Your task is to first identify the distinct legal clauses in the provided document, and then provide a plain English summary for each identified clause.

A clause is a complete section or paragraph that deals with a specific point, often preceded by a number or letter (e.g., "1.", "a.", "Clause IV."). Do not treat every new line or simple sentence as a new clause. Ignore headings or titles that are not part of a substantive clause.

Document Text: {content}

Instructions:
1. Carefully parse the document to identify distinct, substantive legal clauses.
2. For each clause, create an object containing the full, original clause text and its summary in plain English.
3. Return an array of these objects in the specified output format.

Example Input Document Text:
**Section 1: Stock Options**
1.1 Grant of Options. The Company shall grant the Employee a stock option of 1,000 shares, vested over four years.
1.2 Vesting Schedule. The Employee must remain employed for a continuous period of one year to be eligible for the first vesting of 250 shares.

**Section 2: Confidentiality**
2.1 Non-Disclosure. The Employee agrees to not disclose any proprietary information of the Company during and after the term of employment. Unauthorized disclosure will result in immediate termination and legal action.

Example Output:
{
  "clauseSummaries": [
    {
      "clause": "1.1 Grant of Options. The Company shall grant the Employee a stock option of 1,000 shares, vested over four years.",
      "summary": "You will be given 1,000 stock options that become available to you over a four-year period."
    },
    {
      "clause": "1.2 Vesting Schedule. The Employee must remain employed for a continuous period of one year to be eligible for the first vesting of 250 shares.",
      "summary": "To get the first 250 options, you need to work for the company for at least one continuous year."
    },
    {
      "clause": "2.1 Non-Disclosure. The Employee agrees to not disclose any proprietary information of the Company during and after the term of employment. Unauthorized disclosure will result in immediate termination and legal action.",
      "summary": "You must keep the company's private information secret, both while you work here and after you leave. If you share it without permission, you could be fired and face legal consequences."
    }
  ]
}"#;

pub const GLOSSARY_PROMPT: &str = r#"You are an expert legal professional. Generate a glossary of legal terms from the following document. Each entry should have a term and definition.

Document Text: {content}

Glossary:"#;

/// Fairness benchmark against a jurisdiction's customary practice.
///
/// The deposit example is specific to India and only included for that
/// jurisdiction (see [`fairness_prompt`]).
pub const FAIRNESS_PROMPT: &str = r#"You are an expert in {jurisdiction} contract law and standard business practices. Analyze the following document and identify any clauses that are stricter, more unusual, or less favorable to one party than what is considered standard practice in {jurisdiction}.
{example}
For each flagged clause, provide the original clause text, a clear reason why it's being flagged, and a severity level (High, Medium, or Low).

Document Text:
{content}"#;

const INDIA_FAIRNESS_EXAMPLE: &str = r#"
For example, a typical rental agreement in India requires a 2-3 month security deposit. A clause asking for a 6-month deposit would be unusual and should be flagged as "High" severity.
"#;

pub const CONTRADICTIONS_PROMPT: &str = r#"You are an expert legal analyst. Your task is to carefully read the following document and identify any clauses that contradict each other.

For each pair of contradictory clauses you find, provide the full text of both clauses and a clear explanation of why they are contradictory.

If no contradictions are found, return an empty array.

Document Text:
{content}"#;

/// Per-segment yes/no relevance check for reverse Q&A.
pub const RELEVANCE_PROMPT: &str = "You are an expert legal document analyzer. Your job is to determine whether the following clause is relevant to the question asked.\n\nQuestion: {question}\n\nClause: {clause}\n\nIs this clause relevant to the question? Answer YES or NO.";

pub const CHAT_PROMPT: &str = r#"You are an AI legal assistant. Your task is to answer questions about the provided legal document. Base your answers strictly on the document's content. If the answer is not in the document, state that clearly.

Document Text:
{content}

Question:
{question}"#;

/// Text extraction from any supported document (image, PDF, DOCX).
pub const EXTRACT_TEXT_PROMPT: &str =
    "Extract the text from the following document. The document is attached.";

/// Text extraction from a photographed or scanned page.
pub const OCR_PROMPT: &str =
    "You are an OCR engine. Extract the text from the following document image. The image is attached.";

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted values are never re-scanned, so document text that happens
/// to contain `{question}` stays literal. Unknown placeholders are left as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the fairness prompt for a jurisdiction.
pub fn fairness_prompt(jurisdiction: &str, content: &str) -> String {
    let example = if jurisdiction.eq_ignore_ascii_case("india") {
        INDIA_FAIRNESS_EXAMPLE
    } else {
        "\n"
    };
    render(
        FAIRNESS_PROMPT,
        &[
            ("jurisdiction", jurisdiction),
            ("example", example),
            ("content", content),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_once() {
        let out = render(
            CHAT_PROMPT,
            &[("content", "Tenant pays {question}."), ("question", "Who pays?")],
        );
        assert!(out.contains("Tenant pays {question}."));
        assert!(out.ends_with("Question:\nWho pays?"));
    }

    #[test]
    fn test_render_leaves_unknown_braces() {
        let out = render("a {b} {c", &[("x", "y")]);
        assert_eq!(out, "a {b} {c");
    }

    #[test]
    fn test_chat_prompt_keeps_grounding_instruction() {
        let out = render(CHAT_PROMPT, &[("content", "doc"), ("question", "q")]);
        assert!(out.contains(
            "Base your answers strictly on the document's content. If the answer is not in the document, state that clearly."
        ));
    }

    #[test]
    fn test_relevance_prompt_exact() {
        let out = render(
            RELEVANCE_PROMPT,
            &[("question", "Pets?"), ("clause", "2. No pets allowed.")],
        );
        assert_eq!(
            out,
            "You are an expert legal document analyzer. Your job is to determine whether the following clause is relevant to the question asked.\n\nQuestion: Pets?\n\nClause: 2. No pets allowed.\n\nIs this clause relevant to the question? Answer YES or NO."
        );
    }

    #[test]
    fn test_fairness_prompt_jurisdiction() {
        let india = fairness_prompt("India", "doc");
        assert!(india.contains("expert in India contract law"));
        assert!(india.contains("6-month deposit"));

        let uk = fairness_prompt("England and Wales", "doc");
        assert!(uk.contains("standard practice in England and Wales"));
        assert!(!uk.contains("6-month deposit"));
    }
}
