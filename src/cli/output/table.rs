//! Table output formatting for CLI commands using comfy-table.

use std::env;

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::domain::models::ScoredDocument;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format search results as rank / similarity / content rows
    pub fn format_documents(&self, documents: &[ScoredDocument]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Similarity").add_attribute(Attribute::Bold),
            Cell::new("Content").add_attribute(Attribute::Bold),
        ]);

        for (rank, doc) in documents.iter().enumerate() {
            let similarity = Cell::new(format!("{:.4}", doc.similarity))
                .set_alignment(CellAlignment::Right);
            let similarity = if self.use_colors {
                similarity.fg(similarity_color(doc.similarity))
            } else {
                similarity
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                similarity,
                Cell::new(truncate_text(&doc.content, 200)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn similarity_color(similarity: f32) -> Color {
    if similarity >= 0.75 {
        Color::Green
    } else if similarity >= 0.4 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}

/// Truncate on a character boundary, appending `...` when shortened.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let kept: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_documents() {
        let formatter = TableFormatter::with_config(false, Some(100));
        let output = formatter.format_documents(&[
            ScoredDocument::new("DeepSeek is a local LLM server.", 0.91),
            ScoredDocument::new("Strand Agents is an AI framework for RAG.", 0.12),
        ]);

        assert!(output.contains("Similarity"));
        assert!(output.contains("0.9100"));
        assert!(output.contains("DeepSeek is a local LLM server."));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a\nb", 10), "a b");
        assert_eq!(truncate_text("abcdefghijkl", 8), "abcde...");
        // Multi-byte characters are never split.
        assert_eq!(truncate_text("ééééééé", 5), "éé...");
    }
}
