//! Lexical vector space: stop words and the TF-IDF vectorizer.
pub mod stopwords;
pub mod vectorizer;

pub use vectorizer::{SparseVector, TfidfVectorizer, VectorizerParams};
