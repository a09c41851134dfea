//! Prompt template with `{context}` and `{question}` slots.

use crate::core::error::{Result, StrataError};

const CONTEXT_SLOT: &str = "{context}";
const QUESTION_SLOT: &str = "{question}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// # Errors
    ///
    /// Returns `Config` if either slot is missing
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [CONTEXT_SLOT, QUESTION_SLOT] {
            if !template.contains(slot) {
                return Err(StrataError::Config(format!(
                    "Prompt template is missing the {slot} slot"
                )));
            }
        }
        Ok(Self { template })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Fill both slots
    ///
    /// The context is substituted first, so a question containing the
    /// literal text `{context}` is left untouched.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(pos) = rest.find('{') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if let Some(after) = tail.strip_prefix(CONTEXT_SLOT) {
                out.push_str(context);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(QUESTION_SLOT) {
                out.push_str(question);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        out
    }
}
