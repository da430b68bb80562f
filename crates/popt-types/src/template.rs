use serde::{Deserialize, Serialize};

use crate::id::new_id;
use crate::temporal::Timestamp;

/// Ids of the built-in templates offered before any template is saved.
pub const DEFAULT_TEMPLATE_IDS: [&str; 4] = [
    "default-blog",
    "default-email",
    "default-code",
    "default-analysis",
];

/// Reusable seed text for composing new prompts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl Template {
    /// Create a template with a fresh id.
    pub fn new(name: impl Into<String>, content: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            content: content.into(),
            created_at: now,
        }
    }

    /// The built-in seed set, stamped with `now`.
    pub fn defaults(now: &Timestamp) -> Vec<Template> {
        let seed = |id: &str, name: &str, content: &str| Template {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            created_at: now.clone(),
        };
        vec![
            seed(
                DEFAULT_TEMPLATE_IDS[0],
                "Blog Post (1000 words)",
                "Write a comprehensive blog post of approximately 1000 words about [topic]. \
                 The post should be engaging, well-researched, and include practical examples. \
                 Structure it with an introduction, several subheadings, and a conclusion.",
            ),
            seed(
                DEFAULT_TEMPLATE_IDS[1],
                "Email Draft",
                "Compose a professional email to [recipient] about [subject]. \
                 The tone should be [friendly/formal/urgent] and include the following key points: [list points].",
            ),
            seed(
                DEFAULT_TEMPLATE_IDS[2],
                "Code Review",
                "Review the following code for best practices, potential bugs, and optimization opportunities. \
                 Provide specific suggestions for improvement:\n\n[code snippet]",
            ),
            seed(
                DEFAULT_TEMPLATE_IDS[3],
                "Data Analysis",
                "Analyze the following dataset and provide insights about [specific aspects]. \
                 Identify trends, outliers, and potential correlations. \
                 Present your findings in a clear, structured manner.",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_defaults_with_stable_ids() {
        let now = Timestamp::from("2024-01-01T00:00:00.000Z");
        let defaults = Template::defaults(&now);
        assert_eq!(defaults.len(), 4);
        let ids: Vec<&str> = defaults.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, DEFAULT_TEMPLATE_IDS);
        assert!(defaults.iter().all(|t| t.created_at == now));
    }

    #[test]
    fn code_review_template_keeps_placeholder_on_its_own_line() {
        let defaults = Template::defaults(&Timestamp::now());
        assert!(defaults[2].content.ends_with("improvement:\n\n[code snippet]"));
    }

    #[test]
    fn new_template_gets_fresh_id() {
        let a = Template::new("A", "x", Timestamp::now());
        let b = Template::new("A", "x", Timestamp::now());
        assert_ne!(a.id, b.id);
    }
}
