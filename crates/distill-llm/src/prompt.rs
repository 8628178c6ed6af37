//! Prompt engineering for structured record extraction

use distill_domain::ModelSpec;

/// Builds prompts asking the model for one JSON object per document
pub struct PromptBuilder {
    content: String,
    spec: ModelSpec,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(content: impl Into<String>, spec: ModelSpec) -> Self {
        Self {
            content: content.into(),
            spec,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instruction and format specification
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Target schema
        prompt.push_str(&format!("Target class: {}\n", self.spec.name));
        if !self.spec.required_fields.is_empty() {
            prompt.push_str("Required fields (every one must be present and non-null):\n");
            for field in &self.spec.required_fields {
                prompt.push_str(&format!("- {}\n", field));
            }
        }
        prompt.push('\n');

        // 3. The document to analyze
        prompt.push_str("Document:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.content);
        prompt.push_str("\n---\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract a single structured record from the following document.
The record is a JSON object matching the target class below. Populate every
required field from the document text; use additional fields freely when the
document supports them. Do not invent values that the document does not state."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format: ONE valid JSON object, no markdown code blocks, no explanations."#;
