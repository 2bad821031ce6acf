use std::collections::HashSet;
use jieba_rs::Jieba;


/// Words excluded from the token stream whatever their tag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopWords(pub HashSet<String>);

/// The fixed set of target words; anything outside it is dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary(pub HashSet<String>);

impl StopWords {
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Vocabulary {
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StopWords(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Vocabulary(iter.into_iter().map(Into::into).collect())
    }
}


// defines the behavior needed for tokenizing a document
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}


pub struct WordFilter {
    stopwords: StopWords,
    vocabulary: Vocabulary,
    pos_prefix: String,
}

impl WordFilter {

    pub fn new(stopwords: StopWords, vocabulary: Vocabulary, pos_prefix: &str) -> WordFilter {
        Self { stopwords, vocabulary, pos_prefix: pos_prefix.to_owned() }
    }

    // the trimmed word if it survives the stopword and vocabulary checks
    fn keep_word<'a>(&self, word: &'a str) -> Option<&'a str> {
        let w = word.trim();
        if w.is_empty() || self.stopwords.contains(w) || !self.vocabulary.contains(w) {
            return None;
        }
        Some(w)
    }

    pub fn accept<'a>(&self, word: &'a str, tag: &str) -> Option<&'a str> {
        if !tag.starts_with(&self.pos_prefix) {
            return None;
        }
        self.keep_word(word)
    }

    pub fn accept_untagged<'a>(&self, word: &'a str) -> Option<&'a str> {
        self.keep_word(word)
    }
}


/// Segments Chinese text with jieba and keeps the nouns that are in the vocabulary.
pub struct NounTokenizer {
    jieba: Jieba,
    filter: WordFilter,
    use_hmm: bool,
}

impl NounTokenizer {
    pub fn new(filter: WordFilter, use_hmm: bool) -> NounTokenizer {
        Self { jieba: Jieba::new(), filter, use_hmm }
    }
}

impl Tokenizer for NounTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.jieba
            .tag(text, self.use_hmm)
            .into_iter()
            .filter_map(|tag| self.filter.accept(tag.word, tag.tag))
            .map(|w| w.to_string())
            .collect()
    }
}


/// For corpora that were segmented beforehand: split by whitespace, no tagging.
pub struct WhitespaceTokenizer {
    filter: WordFilter,
}

impl WhitespaceTokenizer {
    pub fn new(filter: WordFilter) -> WhitespaceTokenizer {
        Self { filter }
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|w| self.filter.accept_untagged(w))
            .map(|w| w.to_string())
            .collect()
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    fn filter(stopwords: &[&str], vocabulary: &[&str]) -> WordFilter {
        WordFilter::new(
            stopwords.iter().copied().collect(),
            vocabulary.iter().copied().collect(),
            "n",
        )
    }

    #[test]
    fn filter_keeps_vocabulary_nouns_only() {
        let f = filter(&["研究"], &["研究", "语言", "文化"]);

        assert_eq!(f.accept(" 语言 ", "n"), Some("语言"));
        assert_eq!(f.accept("文化", "nz"), Some("文化"));
        // wrong part of speech
        assert_eq!(f.accept("文化", "v"), None);
        // stopword beats vocabulary membership
        assert_eq!(f.accept("研究", "vn"), None);
        assert_eq!(f.accept("研究", "n"), None);
        // out of vocabulary
        assert_eq!(f.accept("历史", "n"), None);
        assert_eq!(f.accept("   ", "n"), None);
    }

    #[test]
    fn whitespace_tokenizer_preserves_order() {
        let tokenizer = WhitespaceTokenizer::new(filter(&["的"], &["语言", "文化", "的"]));
        let tokens = tokenizer.tokenize("语言 的 文化\n历史  语言");
        assert_eq!(tokens, vec!["语言", "文化", "语言"]);
    }

    #[test]
    fn noun_tokenizer_tags_with_jieba() {
        let tokenizer = NounTokenizer::new(filter(&[], &["北京", "天安门"]), true);
        let tokens = tokenizer.tokenize("我爱北京天安门");
        assert_eq!(tokens, vec!["北京", "天安门"]);

        let tokenizer = NounTokenizer::new(filter(&["天安门"], &["北京", "天安门"]), true);
        assert_eq!(tokenizer.tokenize("我爱北京天安门"), vec!["北京"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        let tokenizer = NounTokenizer::new(filter(&[], &["北京"]), false);
        assert!(tokenizer.tokenize("").is_empty());
    }
}
