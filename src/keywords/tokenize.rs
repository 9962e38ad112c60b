use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// English stopwords (NLTK list).
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Anything that is not a folded ASCII letter separates tokens.
static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z]+").expect("token separator pattern is valid"));

/// Tokens of this many characters or fewer are dropped.
pub const MAX_DROPPED_LEN: usize = 2;

/// Turns raw text into lowercase alphabetic tokens with stopwords and short
/// words removed.
///
/// Text is compatibility-decomposed first so accented letters fold onto their
/// ASCII base letter; any other non `a-z` character separates tokens.
#[derive(Debug, Clone)]
pub struct TokenNormalizer {
    stop_words: HashSet<&'static str>,
}

impl Default for TokenNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenNormalizer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded: String = text
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();

        NON_ALPHA
            .split(&folded)
            .filter(|token| token.len() > MAX_DROPPED_LEN && !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let tokens = TokenNormalizer::new().normalize("Great PROCESS, truly great!!");
        assert_eq!(tokens, vec!["great", "process", "truly", "great"]);
    }

    #[test]
    fn drops_stopwords_and_short_words() {
        let tokens = TokenNormalizer::new().normalize("It is an ok plan for the city");
        assert_eq!(tokens, vec!["plan", "city"]);
    }

    #[test]
    fn digits_split_tokens() {
        let tokens = TokenNormalizer::new().normalize("draft2024version");
        assert_eq!(tokens, vec!["draft", "version"]);
    }

    #[test]
    fn folds_accented_letters() {
        let tokens = TokenNormalizer::new().normalize("Café résumé");
        assert_eq!(tokens, vec!["cafe", "resume"]);
    }

    #[test]
    fn non_latin_scripts_separate_tokens() {
        let tokens = TokenNormalizer::new().normalize("budget\u{4e88}\u{7b97}review ÆON");
        assert_eq!(tokens, vec!["budget", "review"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(TokenNormalizer::new().normalize("   \n\t").is_empty());
    }
}
