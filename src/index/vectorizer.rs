//! TF-IDF vector space over word unigrams and bigrams.
//!
//! Documents are lowercased and tokenized on `\b\w\w+\b`; stop words are
//! removed before n-grams are formed, so a bigram may span a removed word.
//! Weights are raw term count × smoothed idf, and every vector is
//! L2-normalised, so a dot product between two vectors is their cosine
//! similarity.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::stopwords::is_stop_word;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizerParams {
    /// Drop terms present in more than this fraction of documents.
    pub max_df: f64,
    /// Drop terms present in fewer than this many documents.
    pub min_df: usize,
    /// Longest n-gram, in words.
    pub max_ngram: usize,
    pub stop_words: bool,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            max_df: 0.9,
            min_df: 1,
            max_ngram: 2,
            stop_words: true,
        }
    }
}

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_counts(counts: BTreeMap<usize, usize>, idf: &[f64]) -> Self {
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(term, tf)| (term, tf as f64 * idf[term]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Dot product by merging the two sorted entry lists.
    #[must_use]
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// A fitted vocabulary with idf weights.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    params: VectorizerParams,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(params: VectorizerParams) -> Self {
        Self {
            params,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Lowercase, tokenize, drop stop words and expand to n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !(self.params.stop_words && is_stop_word(t)))
            .collect();

        let max_n = self.params.max_ngram.max(1);
        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        for n in 2..=max_n {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Learns vocabulary and idf from `docs`, returning one vector per
    /// document. Never fails: if pruning leaves no terms, every vector is
    /// zero.
    pub fn fit_transform(&mut self, docs: &[&str]) -> Vec<SparseVector> {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| self.analyze(d)).collect();

        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = terms.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_default() += 1;
            }
        }

        let n_docs = docs.len();
        let max_doc_count = self.params.max_df * n_docs as f64;

        // BTreeMap iteration keeps term indices in sorted order
        self.vocabulary.clear();
        self.idf.clear();
        for (term, count) in df {
            if count < self.params.min_df || count as f64 > max_doc_count {
                continue;
            }
            self.vocabulary.insert(term.to_string(), self.idf.len());
            self.idf
                .push(((1 + n_docs) as f64 / (1 + count) as f64).ln() + 1.0);
        }

        analyzed.iter().map(|terms| self.project(terms)).collect()
    }

    /// Projects unseen text into the fitted space.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.project(&self.analyze(text))
    }

    fn project(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for term in terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                *counts.entry(idx).or_default() += 1;
            }
        }
        SparseVector::from_counts(counts, &self.idf)
    }

    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_analyze_stop_words_and_bigrams() {
        let v = TfidfVectorizer::new(VectorizerParams::default());
        let terms = v.analyze("The Memory of a safe-ish system, x");
        // "the", "of", "a", "system" are stop words; "x" is too short
        assert_eq!(terms, vec!["memory", "safe", "ish", "memory safe", "safe ish"]);
    }

    #[test]
    fn test_analyze_unigrams_only() {
        let v = TfidfVectorizer::new(VectorizerParams {
            max_ngram: 1,
            ..Default::default()
        });
        assert_eq!(v.analyze("rust memory"), vec!["rust", "memory"]);
    }

    #[test]
    fn test_idf_smoothing_and_max_df() {
        let mut v = TfidfVectorizer::new(VectorizerParams::default());
        v.fit_transform(&["apple banana", "apple cherry", "apple durian"]);
        // "apple" is in 3/3 docs > 0.9 * 3, so it is pruned
        assert_eq!(v.idf("apple"), None);
        let expected = (4.0f64 / 2.0).ln() + 1.0;
        assert!(approx(v.idf("banana").unwrap(), expected));
        assert!(v.idf("apple banana").is_some());
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let mut v = TfidfVectorizer::new(VectorizerParams::default());
        let rows = v.fit_transform(&["rust memory safety", "tomato garden soil"]);
        for row in &rows {
            let norm: f64 = row.entries().iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!(approx(norm, 1.0));
            assert!(approx(row.dot(row), 1.0));
        }
        assert!(approx(rows[0].dot(&rows[1]), 0.0));
    }

    #[test]
    fn test_single_document_prunes_everything() {
        let mut v = TfidfVectorizer::new(VectorizerParams::default());
        let rows = v.fit_transform(&["(empty corpus)"]);
        assert_eq!(v.vocabulary_len(), 0);
        assert!(rows[0].is_zero());
        assert!(v.transform("corpus").is_zero());
    }

    #[test]
    fn test_transform_out_of_vocabulary() {
        let mut v = TfidfVectorizer::new(VectorizerParams::default());
        v.fit_transform(&["rust memory", "tomato garden"]);
        assert!(v.transform("quantum chromodynamics").is_zero());

        let q = v.transform("memory");
        assert_eq!(q.entries().len(), 1);
        assert!(approx(q.entries()[0].1, 1.0));
    }
}
