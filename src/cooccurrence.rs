
// imports
use crate::config::{files_handling, Params};
use crate::error::Result;
use crate::tokenizer::{NounTokenizer, StopWords, Tokenizer, Vocabulary, WhitespaceTokenizer, WordFilter};

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};


pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// The documents of one corpus, in reading order.
pub struct Corpus {
    pub documents: Vec<Document>,
}

/// An undirected pair of distinct words, always stored with `word1 < word2`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoocEdge {
    pub word1: String,
    pub word2: String,
    pub count: u64,
}

// running count of a pair plus the order in which it was first seen
struct PairCount {
    count: u64,
    first_seen: usize,
}

fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

pub struct Counts {}

impl Counts {

    fn count<'a>(tokens: &'a [String], window_size: usize) -> HashMap<(&'a str, &'a str), PairCount> {

        // every start index opens a forward window tokens[i..i+window_size], and every pair of
        // positions inside it counts once. A close pair is therefore counted again by each window
        // that still contains both of its positions.
        let mut pair2count: HashMap<(&str, &str), PairCount> = HashMap::new();
        let n = tokens.len();

        for i in 0..n {
            let window = &tokens[i..n.min(i.saturating_add(window_size))];
            for j in 0..window.len() {
                for k in j + 1..window.len() {
                    let (w1, w2) = (window[j].as_str(), window[k].as_str());
                    if w1 == w2 {
                        continue;
                    }
                    let seen = pair2count.len();
                    let entry = pair2count
                        .entry(canonical_pair(w1, w2))
                        .or_insert(PairCount { count: 0, first_seen: seen });
                    entry.count += 1;
                }
            }
        }

        pair2count
    }

    /// Windowed co-occurrence counts of `tokens`, keeping pairs seen at least `min_count` times.
    /// Sorted by count, descending; equal counts keep the order in which the pairs first appeared.
    pub fn build(tokens: &[String], window_size: usize, min_count: u64) -> Vec<CoocEdge> {

        let pair2count = Counts::count(tokens, window_size);

        let mut kept: Vec<((&str, &str), PairCount)> = pair2count
            .into_iter()
            .filter(|(_, pc)| pc.count >= min_count)
            .collect();
        kept.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));

        kept.into_iter()
            .map(|((w1, w2), pc)| CoocEdge { word1: w1.to_string(), word2: w2.to_string(), count: pc.count })
            .collect()
    }

    /// Tokens of all documents, concatenated; document boundaries are not kept.
    pub fn tokenize_corpus(corpus: &Corpus, tokenizer: &dyn Tokenizer) -> Vec<String> {
        let mut tokens = Vec::new();
        for document in &corpus.documents {
            let document_tokens = tokenizer.tokenize(&document.text);
            debug!("{:?}: {} tokens", document.path, document_tokens.len());
            tokens.extend(document_tokens);
        }
        tokens
    }

    fn tokenizer(params: &Params, stopwords: StopWords, vocabulary: Vocabulary) -> Box<dyn Tokenizer> {
        let filter = WordFilter::new(stopwords, vocabulary, &params.pos_prefix);
        if params.pre_segmented {
            Box::new(WhitespaceTokenizer::new(filter))
        } else {
            Box::new(NounTokenizer::new(filter, params.use_hmm))
        }
    }

    pub fn run(params: &Params) -> Result<Vec<CoocEdge>> {

        // runs the builder stage: load the word lists and the corpus, tokenize, count
        // and save the edge list to `output_path`.

        info!("loading stopwords...");
        let stopwords: StopWords = files_handling::read_input(Path::new(&params.stopwords_path))?;

        info!("loading target vocabulary...");
        let vocabulary: Vocabulary = files_handling::read_input(Path::new(&params.vocab_path))?;
        if vocabulary.is_empty() {
            warn!("vocabulary {} is empty, no token will be kept", params.vocab_path);
        }
        info!("{} stopwords, {} target words", stopwords.len(), vocabulary.len());

        info!("tokenizing corpus...");
        let corpus: Corpus = files_handling::read_input(Path::new(&params.corpus_path))?;
        if corpus.documents.is_empty() {
            warn!("no .txt documents found in {}", params.corpus_path);
        }
        let tokenizer = Counts::tokenizer(params, stopwords, vocabulary);
        let tokens = Counts::tokenize_corpus(&corpus, tokenizer.as_ref());
        info!("{} documents, {} tokens", corpus.documents.len(), tokens.len());

        info!("building co-occurrence matrix...");
        let edges = Counts::build(&tokens, params.window_size, params.min_count as u64);
        info!("{} pairs with count >= {}", edges.len(), params.min_count);

        info!("saving results to {}", params.output_path);
        files_handling::save_output(Path::new(&params.output_path), &edges)?;

        Ok(edges)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn edge(w1: &str, w2: &str, count: u64) -> CoocEdge {
        CoocEdge { word1: w1.to_string(), word2: w2.to_string(), count }
    }

    #[test]
    fn adjacent_pairs_only_within_window() {
        let edges = Counts::build(&tokens(&["A", "B", "C"]), 2, 1);
        assert_eq!(edges, vec![edge("A", "B", 1), edge("B", "C", 1)]);
    }

    #[test]
    fn sliding_windows_recount_pairs() {
        // i=0 [A,B,A]: AB x2
        // i=1 [B,A,C]: AB, BC, AC
        // i=2 [A,C,B]: AC, AB, BC
        // i=3 [C,B]:   BC
        let edges = Counts::build(&tokens(&["A", "B", "A", "C", "B"]), 3, 1);
        assert_eq!(edges, vec![edge("A", "B", 4), edge("B", "C", 3), edge("A", "C", 2)]);
    }

    #[test]
    fn empty_and_short_inputs() {
        assert!(Counts::build(&[], 10, 1).is_empty());
        assert!(Counts::build(&tokens(&["A"]), 10, 1).is_empty());
        // a one token window holds no pair
        assert!(Counts::build(&tokens(&["A", "B", "C"]), 1, 1).is_empty());
    }

    #[test]
    fn window_wider_than_corpus_covers_the_rest() {
        let edges = Counts::build(&tokens(&["A", "B", "C"]), usize::MAX, 1);
        // i=0 [A,B,C]: AB, AC, BC
        // i=1 [B,C]:   BC
        assert_eq!(edges, vec![edge("B", "C", 2), edge("A", "B", 1), edge("A", "C", 1)]);
    }

    #[test]
    fn no_self_pairs() {
        let edges = Counts::build(&tokens(&["A", "A", "A", "B", "A"]), 10, 1);
        assert!(edges.iter().all(|e| e.word1 != e.word2));
        // the lone B pairs with every other position in each window that holds it
        assert_eq!(edges, vec![edge("A", "B", 4 + 3 + 2 + 1)]);
    }

    #[test]
    fn pairs_are_canonical() {
        let edges = Counts::build(&tokens(&["语言", "文化", "文化", "语言", "历史", "文化"]), 3, 1);
        let mut seen = HashSet::new();
        for e in &edges {
            assert!(e.word1 < e.word2);
            assert!(seen.insert((e.word1.clone(), e.word2.clone())));
        }
    }

    #[test]
    fn threshold_is_applied_after_counting() {
        let input = tokens(&["A", "B", "A", "C", "B"]);
        let all = Counts::build(&input, 3, 1);
        let kept = Counts::build(&input, 3, 3);

        assert_eq!(kept, vec![edge("A", "B", 4), edge("B", "C", 3)]);
        for e in &all {
            assert_eq!(kept.contains(e), e.count >= 3);
        }
    }

    #[test]
    fn ties_follow_first_encounter() {
        let input = tokens(&["D", "C", "B", "A"]);
        let edges = Counts::build(&input, 2, 1);
        assert_eq!(edges, vec![edge("C", "D", 1), edge("B", "C", 1), edge("A", "B", 1)]);
        assert_eq!(edges, Counts::build(&input, 2, 1));
    }

    #[test]
    fn corpus_tokens_are_concatenated() {
        let filter = WordFilter::new(StopWords::default(), ["语言", "文化"].into_iter().collect(), "n");
        let tokenizer = WhitespaceTokenizer::new(filter);
        let corpus = Corpus {
            documents: vec![
                Document { path: PathBuf::from("a.txt"), text: "语言 历史 文化".to_string() },
                Document { path: PathBuf::from("b.txt"), text: "文化 语言".to_string() },
            ],
        };

        let all = Counts::tokenize_corpus(&corpus, &tokenizer);
        assert_eq!(all, tokens(&["语言", "文化", "文化", "语言"]));

        // the window runs across the document boundary
        let edges = Counts::build(&all, 2, 1);
        assert_eq!(edges, vec![edge("文化", "语言", 2)]);
    }

    #[test]
    fn run_writes_edge_list() {
        let dir = tempdir().unwrap();
        let corpus_dir = dir.path().join("corpus");
        fs::create_dir(&corpus_dir).unwrap();
        fs::write(corpus_dir.join("01.txt"), "语言 文化 的 语言 文化").unwrap();
        fs::write(dir.path().join("stopwords.txt"), "的\n").unwrap();
        fs::write(dir.path().join("vocab.csv"), "word,count\n语言,2\n文化,2\n的,9\n").unwrap();

        let path = |name: &str| dir.path().join(name).display().to_string();
        let mut params = Params::new(&path("corpus"), &path("vocab.csv"), &path("stopwords.txt"), &path("out/cooc.csv"), &path("out/ppmi.csv"));
        params.pre_segmented = true;
        params.min_count = 2;

        let edges = Counts::run(&params).unwrap();
        // "的" is dropped as a stopword, leaving [语言,文化,语言,文化]
        assert_eq!(edges, vec![edge("文化", "语言", 4 + 2 + 1)]);
        assert_eq!(fs::read_to_string(dir.path().join("out/cooc.csv")).unwrap(), "word1,word2,count\n文化,语言,7\n");
    }
}
