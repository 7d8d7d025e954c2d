//! Prompt templates for Vakt.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
}

/// Prompts for summary article generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are expert in summarizing text and providing highly readable and informative summary article for users.
Treat the audience of the article as person who is not familiar of the concepts and who wants to learn them.

# Goals
1) Write a summary in article form that is easily understandable for a first-time reader with no prior context. The summary must be written in clear
descriptive paragraphs, not just bullet points, where each topic is explained in full sentences and connected ideas.
2) Ensure the content is action-first and uses concrete examples throughout to illustrate key points. Where relevant, incorporate links to verified resources
or actionable search queries that the reader can use immediately.
3) Cover all main topics in the article, providing enough detail, context, and explanation for clarity. To make this happen, before creating the article,
extract all topics internally first, however do not list the extracted topics in the article but use them when creating the article by following style rules
and desired structure of the document as described below.

# Style rules
Use plain English; avoid jargon. If you must use a term, define it the first time. Use neutral / impersonal voice.
No unexplained abbreviations. If you include one, expand it once (for example: Total Addressable Market).
Format links as Title so they are clickable. Use this format for links
[Link title](http address)
Use bullet points only in Top actions and Key term definitions

# Structure of the document
Use Markdown format and format the structure to look readable for user, use specified font for titles and sections

1. Title (H1)

2. TL;DR (1-2 sentences) (H2)

3. Sections for article content: create separate sections (H2) for each major topic in the given text. Each section should be medium length and explanatory
(aim total article content of about 800-1,200 words).

- Name each section with a title that best describes the text as title.

- Provide information that goes in more detail: cover all topics in medium length (600-1,000 words) with a neutral tone, using clear, plain-English explanations
for the person who is not expert in the field.

- Ensure all topics are covered

4. Key term definitions section (H2): define all technical terms and expand abbreviations on first use.

5. Top actions (H2): summarize 3-5 immediate, actionable steps.

# Additional constraints
Maximum length: {{max_length}} words.
Style: {{style}}."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with an optional custom directory.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load summary prompts if file exists
            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_render_substitutes_variables() {
        let mut vars = HashMap::new();
        vars.insert("max_length".to_string(), "500".to_string());
        vars.insert("style".to_string(), "concise".to_string());

        let rendered = Prompts::render("Max {{max_length}} words, {{style}} style.", &vars);
        assert_eq!(rendered, "Max 500 words, concise style.");
    }

    #[test]
    fn test_default_summary_prompt_has_placeholders() {
        let prompts = Prompts::default();
        assert!(prompts.summary.system.contains("{{max_length}}"));
        assert!(prompts.summary.system.contains("{{style}}"));
    }
}
