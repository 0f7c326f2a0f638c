//! Prompt templates
//!
//! Each layout is fixed and versioned. Changing the bytes a template produces
//! changes what the model sees, so a new layout gets a new variant rather than
//! an edit to an existing one.

use serde::{Deserialize, Serialize};

/// Versioned prompt layout used to ground a question on retrieved documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Plain context block followed by the question.
    #[default]
    Grounded,
    /// Numbered `[Context N]` blocks with citation instructions.
    Cited,
}

impl PromptTemplate {
    /// Stable version tag for logs and diagnostics.
    pub const fn version(self) -> &'static str {
        match self {
            Self::Grounded => "grounded-v1",
            Self::Cited => "cited-v1",
        }
    }

    /// Render the prompt for `query` grounded on `documents`.
    ///
    /// Rendering is single-pass: braces or placeholder-like text inside the
    /// documents or the query are copied verbatim.
    pub fn render<S: AsRef<str>>(self, documents: &[S], query: &str) -> String {
        match self {
            Self::Grounded => {
                let context = documents
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Based on the following context, please answer the user's question:\n\n\
                     Context:\n{context}\n\n\
                     Question: {query}\n\n\
                     Answer:"
                )
            }
            Self::Cited => {
                let context = documents
                    .iter()
                    .enumerate()
                    .map(|(i, doc)| format!("[Context {}]\n{}\n", i + 1, doc.as_ref()))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Use the following context to answer the question. If the context doesn't \
                     contain relevant information, say so instead of guessing.\n\n\
                     ## Context\n\n{context}\n\
                     ## Question\n\n{query}\n\n\
                     ## Instructions\n\n\
                     Answer based on the context provided above. Cite sources using the context \
                     numbers ([Context 1], [Context 2], etc.) when referencing specific information."
                )
            }
        }
    }
}

impl std::fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.version())
    }
}
