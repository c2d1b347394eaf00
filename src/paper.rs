//! Research paper metadata.

use serde::{Deserialize, Serialize};

/// Title, abstract and keywords of a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperData {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

impl PaperData {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            keywords: None,
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Keywords, empty when none were given.
    pub fn keywords(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or_default()
    }

    /// Keywords joined with `", "`, or `N/A` when there are none.
    pub fn keywords_line(&self) -> String {
        let joined = self.keywords().join(", ");
        if joined.is_empty() {
            "N/A".to_string()
        } else {
            joined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_line_joins_with_comma() {
        let paper = PaperData::new("T", "A").with_keywords(["haptics", "VR"]);
        assert_eq!(paper.keywords_line(), "haptics, VR");
    }

    #[test]
    fn test_keywords_line_defaults_to_na() {
        assert_eq!(PaperData::new("T", "A").keywords_line(), "N/A");
        let empty = PaperData::new("T", "A").with_keywords(Vec::<String>::new());
        assert_eq!(empty.keywords_line(), "N/A");
    }

    #[test]
    fn test_deserializes_abstract_field() {
        let paper: PaperData =
            serde_json::from_str(r#"{"title":"T","abstract":"About it"}"#).unwrap();
        assert_eq!(paper.abstract_text, "About it");
        assert!(paper.keywords.is_none());
    }
}
