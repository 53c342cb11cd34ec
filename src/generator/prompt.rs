//! Prompt construction for the content generator
//!
//! The system prompt is where the section-marker contract lives: the
//! parser can only find markers the prompt told the generator to emit, so
//! the prompt text here and the grammar in [`crate::artifact`] must agree.

use crate::artifact::{MarkerGrammar, ParseMode};

/// Shared requirements for every generation, regardless of mode
const STYLE_REQUIREMENTS: &str = "\
You are an expert web developer creating modern, responsive websites.
DO NOT use any markdown code blocks (```). Provide clean code without formatting markers.
Follow these requirements strictly:
1. Use modern CSS (Flexbox/Grid) for layouts
2. Ensure mobile responsiveness
3. Include hover states and smooth transitions
4. Use semantic HTML5 elements
5. Write clean, well-structured JavaScript
6. Include proper error handling
7. Add user feedback and status messages
8. Use a professional color scheme";

/// Build the system prompt for the configured mode and marker grammar
pub fn system_prompt(mode: ParseMode, grammar: MarkerGrammar) -> String {
    match mode {
        ParseMode::Fused => format!(
            "{STYLE_REQUIREMENTS}\n\
             Respond with ONE complete standalone HTML document, starting at <!DOCTYPE html>,\n\
             with all CSS in a <style> tag and all JavaScript in a <script> tag.\n\
             Output nothing before or after the document."
        ),
        ParseMode::Split => {
            let contract = match grammar {
                MarkerGrammar::Bracketed => {
                    "Provide code in these exact sections, without any markdown or code formatting:\n\
                     [HTML_START] (Clean HTML content) [HTML_END]\n\
                     [CSS_START] (Clean CSS content) [CSS_END]\n\
                     [JS_START] (Clean JavaScript content) [JS_END]"
                }
                MarkerGrammar::LinePrefix => {
                    "Provide code in three sections, each introduced by a label on its own line,\n\
                     without any markdown or code formatting:\n\
                     HTML:\n(Clean HTML content)\n\
                     CSS:\n(Clean CSS content)\n\
                     JS:\n(Clean JavaScript content)"
                }
            };
            format!("{STYLE_REQUIREMENTS}\n{contract}")
        }
    }
}

/// Wrap the captured instruction in the user prompt template
pub fn user_prompt(instruction: &str) -> String {
    format!(
        "Create a modern, responsive website with this description: {instruction}. \
         Provide clean code without any markdown formatting or code blocks."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bracketed_prompt_pins_marker_contract() {
        let prompt = system_prompt(ParseMode::Split, MarkerGrammar::Bracketed);
        for tag in ["[HTML_START]", "[HTML_END]", "[CSS_START]", "[CSS_END]", "[JS_START]", "[JS_END]"] {
            assert!(prompt.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn test_split_line_prefix_prompt_names_labels() {
        let prompt = system_prompt(ParseMode::Split, MarkerGrammar::LinePrefix);
        assert!(prompt.contains("HTML:"));
        assert!(prompt.contains("CSS:"));
        assert!(prompt.contains("JS:"));
        assert!(!prompt.contains("[HTML_START]"));
    }

    #[test]
    fn test_fused_prompt_asks_for_one_document() {
        let prompt = system_prompt(ParseMode::Fused, MarkerGrammar::Bracketed);
        assert!(prompt.contains("<!DOCTYPE html>"));
        assert!(!prompt.contains("[HTML_START]"));
    }

    #[test]
    fn test_user_prompt_embeds_instruction() {
        let prompt = user_prompt("a bakery landing page");
        assert!(prompt.contains("a bakery landing page"));
        assert!(prompt.contains("without any markdown"));
    }
}
