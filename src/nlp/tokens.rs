//! Tokenization of free-form descriptions

use serde::Serialize;

/// Punctuation replaced by a space before splitting
pub const STRIP_CHARS: &[char] = &[
    '，', '。', '！', '？', '；', '：', '"', '\'', '（', '）', '【', '】', '[', ']', '{', '}',
];

/// Lowercase, de-duplicated tokens of one description, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    pub fn from_description(description: &str) -> Self {
        let normalized: String = description
            .to_lowercase()
            .chars()
            .map(|c| if STRIP_CHARS.contains(&c) { ' ' } else { c })
            .collect();

        let mut tokens: Vec<String> = Vec::new();
        for word in normalized.split_whitespace() {
            if word.chars().count() > 1 && !tokens.iter().any(|t| t == word) {
                tokens.push(word.to_string());
            }
        }

        Self { tokens }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        let tokens = TokenSet::from_description("Java  Maven\tproject");
        assert_eq!(tokens.into_vec(), vec!["java", "maven", "project"]);
    }

    #[test]
    fn test_strips_cjk_punctuation() {
        let tokens = TokenSet::from_description("构建【java】项目，部署到k8s。");
        assert_eq!(tokens.into_vec(), vec!["构建", "java", "项目", "部署到k8s"]);
    }

    #[test]
    fn test_ascii_comma_and_colon_are_kept() {
        let tokens = TokenSet::from_description("project, namespace: prod");
        assert!(tokens.contains("project,"));
        assert!(tokens.contains("namespace:"));
    }

    #[test]
    fn test_drops_single_char_tokens() {
        let tokens = TokenSet::from_description("a b go 云 c#");
        assert_eq!(tokens.into_vec(), vec!["go", "c#"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let tokens = TokenSet::from_description("🚀 云 部署 é");
        assert_eq!(tokens.into_vec(), vec!["部署"]);
    }

    #[test]
    fn test_deduplicates_keeping_first_occurrence() {
        let tokens = TokenSet::from_description("npm build NPM test npm");
        assert_eq!(tokens.into_vec(), vec!["npm", "build", "test"]);
    }

    #[test]
    fn test_empty_description() {
        assert!(TokenSet::from_description("").is_empty());
        assert!(TokenSet::from_description("  ，。 ").is_empty());
    }
}
