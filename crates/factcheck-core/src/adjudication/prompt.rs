//! Instruction prompt for the fact-checking adjudicator.

use super::AdjudicationRequest;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a meticulous, unbiased fact-checker. Your task is to \
analyze a user's claim against a set of retrieved, verified facts.\n\
Your response MUST be a valid JSON object matching the provided format. Do not include any other \
text, greetings, or explanations outside of the JSON structure.";

const INSTRUCTIONS: &str = "\
1. Compare the USER_CLAIM to the VERIFIED_EVIDENCE.
2. Determine if the evidence supports, contradicts, or is irrelevant to the claim.
3. If the evidence directly supports the claim, classify as 'True'.
4. If the evidence directly contradicts the claim, classify as 'False'.
5. If the evidence is insufficient, unrelated, or the claim is too specific to be verified, classify as 'Unverifiable'.
6. Provide a confidence score for your verdict (0.0 for Unverifiable, >0.5 for True/False).
7. Write a concise, neutral reasoning.";

const FORMAT_INSTRUCTIONS: &str = r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

Here is the output schema:
```
{"properties": {"verdict": {"description": "The final verdict, must be one of: 'True', 'False', 'Unverifiable'", "type": "string", "enum": ["True", "False", "Unverifiable"]}, "confidence": {"description": "A confidence score from 0.0 to 1.0 for the verdict.", "type": "number", "minimum": 0.0, "maximum": 1.0}, "reasoning": {"description": "A concise explanation for the verdict based on the evidence.", "type": "string"}}, "required": ["verdict", "confidence", "reasoning"], "additionalProperties": false}
```"#;

/// Builder for adjudication prompts.
#[derive(Debug, Clone)]
pub struct AdjudicationPromptBuilder {
    system_prompt: String,

    /// Maximum characters of evidence text per item.
    max_evidence_length: usize,
}

impl Default for AdjudicationPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AdjudicationPromptBuilder {
    pub fn new() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_evidence_length: 2000,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_evidence_length(mut self, length: usize) -> Self {
        self.max_evidence_length = length;
        self
    }

    /// Build the full prompt: claim, bulleted evidence, instructions, schema.
    pub fn build(&self, request: &AdjudicationRequest<'_>) -> String {
        let evidence = request
            .evidence
            .iter()
            .map(|item| format!("- {}", self.truncate(item)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"SYSTEM: {}

USER_CLAIM: "{}"

VERIFIED_EVIDENCE:
{}

INSTRUCTIONS:
{}

{}

AI_RESPONSE (JSON only):
"#,
            self.system_prompt, request.claim, evidence, INSTRUCTIONS, FORMAT_INSTRUCTIONS
        )
    }

    fn truncate<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_evidence_length) {
            Some((cut, _)) => &text[..cut],
            None => text,
        }
    }
}
