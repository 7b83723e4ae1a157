use crate::error::{IndexError, Result};
use crate::graph::LinkGraph;
use crate::pagerank::{self, PageRankParams};
use crate::relevance::compute_relevance;
use crate::tokenizer::analyze;
use crate::{normalize_title, AuthorityTable, Document, RelevanceTable, TermCounts, TitleTable};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The three tables produced by one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub titles: TitleTable,
    pub authority: AuthorityTable,
    pub relevance: RelevanceTable,
}

impl IndexSnapshot {
    pub fn num_docs(&self) -> usize { self.titles.len() }
}

/// Index a whole corpus. Nothing is returned unless every stage succeeds.
pub fn build_index(docs: &[Document], params: &PageRankParams) -> Result<IndexSnapshot> {
    let mut titles = TitleTable::new();
    for doc in docs {
        if titles.insert(doc.id, normalize_title(&doc.title)).is_some() {
            return Err(IndexError::DuplicateId(doc.id));
        }
    }

    let mut counts = TermCounts::new();
    let mut raw_links = Vec::with_capacity(docs.len());
    for doc in docs {
        let tokens = analyze(&doc.title, doc.text.as_deref());
        for term in &tokens.terms {
            counts.record(doc.id, term);
        }
        raw_links.push(tokens.link_targets);
    }
    info!(num_docs = docs.len(), num_terms = counts.num_terms(), "tokenized documents");

    let graph = LinkGraph::build(docs.iter().map(|d| normalize_title(&d.title)).collect(), &raw_links);
    let ranked = pagerank::solve(&graph, params)?;
    info!(
        iterations = ranked.iterations,
        residual = ranked.residual,
        fallback_pages = graph.fallback_pages(),
        "computed pagerank"
    );
    let authority: AuthorityTable = docs.iter().map(|d| d.id).zip(ranked.ranks).collect();

    let relevance = compute_relevance(&counts, docs.len());

    Ok(IndexSnapshot { titles, authority, relevance })
}
