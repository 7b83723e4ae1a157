use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type TermId = u32;
pub type DocId = u32;

/// One input record. `text` may be absent, which indexes as an empty body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl Document {
    pub fn new(id: DocId, title: &str, text: Option<String>) -> Self {
        Self { id, title: normalize_title(title), text }
    }
}

/// Titles are the join key of the link graph: trimmed and lower-cased.
pub fn normalize_title(raw: &str) -> String { raw.trim().to_lowercase() }

pub type TitleTable = BTreeMap<DocId, String>;
pub type AuthorityTable = BTreeMap<DocId, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // tf-idf relevance
}

/// term -> document -> relevance, kept as a term dictionary plus one posting
/// list per term. Posting lists are sorted by doc_id; a missing posting means
/// zero relevance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceTable {
    pub dictionary: BTreeMap<String, TermId>,
    pub postings: Vec<Vec<Posting>>,
}

impl RelevanceTable {
    pub fn new() -> Self { Self::default() }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    pub fn is_empty(&self) -> bool { self.dictionary.is_empty() }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.dictionary
            .get(term)
            .and_then(|&tid| self.postings.get(tid as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn relevance(&self, term: &str, doc_id: DocId) -> Option<f64> {
        let postings = self.postings(term);
        postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|i| postings[i].weight)
    }

    pub(crate) fn push_term(&mut self, term: &str, mut postings: Vec<Posting>) {
        let tid = self.postings.len() as TermId;
        postings.sort_by_key(|p| p.doc_id);
        self.dictionary.insert(term.to_string(), tid);
        self.postings.push(postings);
    }
}

/// Raw per-term, per-document occurrence counts gathered during tokenization.
///
/// Term ids are handed out in first-seen order. Every stored count is at
/// least one. Documents must be recorded one after another: all terms of a
/// document before the next document starts.
#[derive(Debug, Clone, Default)]
pub struct TermCounts {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    postings: Vec<Vec<(DocId, u32)>>,
}

impl TermCounts {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, doc_id: DocId, term: &str) {
        let tid = match self.dictionary.get(term) {
            Some(&tid) => tid,
            None => {
                let tid = self.terms.len() as TermId;
                self.dictionary.insert(term.to_string(), tid);
                self.terms.push(term.to_string());
                self.postings.push(Vec::new());
                tid
            }
        };
        let list = &mut self.postings[tid as usize];
        match list.last_mut() {
            Some((last_doc, count)) if *last_doc == doc_id => *count += 1,
            _ => list.push((doc_id, 1)),
        }
    }

    pub fn num_terms(&self) -> usize { self.terms.len() }

    pub fn count(&self, term: &str, doc_id: DocId) -> u32 {
        self.dictionary
            .get(term)
            .and_then(|&tid| self.postings[tid as usize].iter().find(|(d, _)| *d == doc_id))
            .map(|&(_, c)| c)
            .unwrap_or(0)
    }

    /// Terms in id order with their (doc_id, count) lists.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(DocId, u32)])> {
        self.terms.iter().map(String::as_str).zip(self.postings.iter().map(Vec::as_slice))
    }
}
