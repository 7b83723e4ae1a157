use crate::pipeline::IndexSnapshot;
use crate::tokenizer::tokenize_query;
use crate::DocId;

pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub doc_id: DocId,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ranked(Vec<Hit>),
    NoRelevantDocuments,
    EmptyCorpus,
}

/// Read-only scorer over a loaded index.
#[derive(Debug, Clone, Default)]
pub struct Querier {
    index: IndexSnapshot,
}

impl Querier {
    pub fn new(index: IndexSnapshot) -> Self { Self { index } }

    pub fn index(&self) -> &IndexSnapshot { &self.index }

    /// Score every document, in ascending id order.
    ///
    /// With `use_pagerank` the running total is multiplied by the document's
    /// authority after each matching term, so earlier terms are scaled once
    /// per later match. Existing indexes are ranked this way; do not collapse
    /// it into a single multiplication.
    pub fn score_all(&self, query: &str, use_pagerank: bool) -> Vec<(DocId, f64)> {
        let terms = tokenize_query(query);
        self.index
            .titles
            .keys()
            .map(|&doc_id| {
                let authority = self.index.authority.get(&doc_id).copied().unwrap_or(0.0);
                let mut total = 0.0;
                for term in &terms {
                    if let Some(rel) = self.index.relevance.relevance(term, doc_id) {
                        total += rel;
                        if use_pagerank {
                            total *= authority;
                        }
                    }
                }
                (doc_id, total)
            })
            .collect()
    }

    pub fn search(&self, query: &str, use_pagerank: bool) -> SearchOutcome {
        self.search_top(query, use_pagerank, MAX_RESULTS)
    }

    /// Top `k` (at most ten) documents with a nonzero score. Ties go to the
    /// lower document id.
    pub fn search_top(&self, query: &str, use_pagerank: bool, k: usize) -> SearchOutcome {
        if self.index.titles.is_empty() {
            return SearchOutcome::EmptyCorpus;
        }
        let mut scored = self.score_all(query, use_pagerank);
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let hits: Vec<Hit> = scored
            .into_iter()
            .filter(|&(_, score)| score > 0.0)
            .take(k.clamp(1, MAX_RESULTS))
            .map(|(doc_id, score)| Hit {
                doc_id,
                title: self.index.titles.get(&doc_id).cloned().unwrap_or_default(),
                score,
            })
            .collect();
        if hits.is_empty() {
            SearchOutcome::NoRelevantDocuments
        } else {
            SearchOutcome::Ranked(hits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Posting, RelevanceTable};

    fn snapshot() -> IndexSnapshot {
        let mut relevance = RelevanceTable::new();
        relevance.push_term("cat", vec![Posting { doc_id: 1, weight: 2.0 }, Posting { doc_id: 2, weight: 1.0 }]);
        relevance.push_term("dog", vec![Posting { doc_id: 1, weight: 3.0 }]);
        IndexSnapshot {
            titles: [(1, "one".to_string()), (2, "two".to_string()), (3, "three".to_string())].into(),
            authority: [(1, 0.5), (2, 0.25), (3, 0.25)].into(),
            relevance,
        }
    }

    #[test]
    fn repeated_terms_accumulate() {
        let q = Querier::new(snapshot());
        assert_eq!(q.score_all("cat cat", false), vec![(1, 4.0), (2, 2.0), (3, 0.0)]);
    }

    #[test]
    fn authority_scales_the_running_total() {
        let q = Querier::new(snapshot());
        // ((2 * 0.5) + 3) * 0.5
        assert_eq!(q.score_all("cats dog", true)[0], (1, 2.0));
    }

    #[test]
    fn ranks_and_reports_misses() {
        let q = Querier::new(snapshot());
        match q.search("Cat", false) {
            SearchOutcome::Ranked(hits) => {
                let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
                assert_eq!(ids, vec![1, 2]);
                assert_eq!(hits[0].title, "one");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(q.search("zebra", false), SearchOutcome::NoRelevantDocuments);
        assert_eq!(q.search("the", true), SearchOutcome::NoRelevantDocuments);
        assert_eq!(Querier::default().search("cat", false), SearchOutcome::EmptyCorpus);
    }

    #[test]
    fn ties_break_on_lower_id() {
        let mut index = snapshot();
        index.relevance = RelevanceTable::new();
        index.relevance.push_term("cat", vec![Posting { doc_id: 3, weight: 1.0 }, Posting { doc_id: 2, weight: 1.0 }]);
        let q = Querier::new(index);
        match q.search_top("cat", false, 1) {
            SearchOutcome::Ranked(hits) => assert_eq!(hits[0].doc_id, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
