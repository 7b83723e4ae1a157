use crate::{DocId, Posting, RelevanceTable, TermCounts};
use std::collections::BTreeMap;

/// Turn raw counts into tf-idf relevance.
///
/// tf is the raw count over the count of the most frequent term in the same
/// document; idf is `ln(n / doc_freq)`.
pub fn compute_relevance(counts: &TermCounts, num_docs: usize) -> RelevanceTable {
    let mut max_count: BTreeMap<DocId, u32> = BTreeMap::new();
    for (_, postings) in counts.iter() {
        for &(doc_id, count) in postings {
            let max = max_count.entry(doc_id).or_insert(0);
            *max = (*max).max(count);
        }
    }

    let mut table = RelevanceTable::new();
    for (term, postings) in counts.iter() {
        let doc_freq = postings.len();
        if doc_freq == 0 {
            continue;
        }
        let n = num_docs.max(doc_freq) as f64;
        let idf = (n / doc_freq as f64).ln();
        let weighted = postings
            .iter()
            .map(|&(doc_id, count)| {
                let most = max_count.get(&doc_id).copied().unwrap_or(count).max(1);
                Posting { doc_id, weight: idf * (count as f64 / most as f64) }
            })
            .collect();
        table.push_term(term, weighted);
    }
    table
}
