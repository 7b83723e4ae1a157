use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Resolved link graph over the corpus, node `i` being the `i`-th document.
///
/// Every outlink set is sorted, never contains its own node, and is nonempty
/// whenever the graph has more than one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGraph {
    titles: Vec<String>,
    outlinks: Vec<Vec<usize>>,
    fallback_pages: usize,
}

impl LinkGraph {
    /// Resolve raw link targets against the corpus titles.
    ///
    /// `raw_links[i]` holds the link targets found in document `i`, repeats
    /// allowed. A page whose only link is to itself, or that has no link into
    /// the corpus at all, links to every other page instead.
    pub fn build(titles: Vec<String>, raw_links: &[Vec<String>]) -> Self {
        let n = titles.len();
        let mut by_title: HashMap<&str, usize> = HashMap::with_capacity(n);
        for (i, title) in titles.iter().enumerate() {
            if by_title.contains_key(title.as_str()) {
                warn!(title = %title, "duplicate title, links resolve to the first page");
                continue;
            }
            by_title.insert(title.as_str(), i);
        }

        let mut outlinks = Vec::with_capacity(n);
        let mut fallback_pages = 0;
        for (k, own) in titles.iter().enumerate() {
            let unique: BTreeSet<&str> = raw_links
                .get(k)
                .map(|links| links.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let self_only = unique.len() == 1 && unique.contains(own.as_str());
            let valid: BTreeSet<usize> = unique
                .iter()
                .filter_map(|t| by_title.get(t).copied())
                .filter(|&j| j != k)
                .collect();

            let resolved: Vec<usize> = if self_only || valid.is_empty() {
                fallback_pages += 1;
                (0..n).filter(|&j| j != k).collect()
            } else {
                valid.into_iter().collect()
            };
            outlinks.push(resolved);
        }
        debug!(pages = n, fallback_pages, "resolved link graph");
        Self { titles, outlinks, fallback_pages }
    }

    pub fn len(&self) -> usize { self.titles.len() }

    pub fn is_empty(&self) -> bool { self.titles.is_empty() }

    pub fn title(&self, node: usize) -> &str { &self.titles[node] }

    pub fn outlinks(&self, node: usize) -> &[usize] { &self.outlinks[node] }

    pub fn links_to(&self, from: usize, to: usize) -> bool {
        self.outlinks[from].binary_search(&to).is_ok()
    }

    /// Pages that fell back to linking everywhere else.
    pub fn fallback_pages(&self) -> usize { self.fallback_pages }

    /// Resolved target titles of the page with the given title.
    pub fn targets(&self, title: &str) -> Option<BTreeSet<&str>> {
        let node = self.titles.iter().position(|t| t == title)?;
        Some(self.outlinks[node].iter().map(|&j| self.titles[j].as_str()).collect())
    }
}
