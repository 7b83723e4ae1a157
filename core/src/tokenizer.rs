use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN_RE: Regex =
        Regex::new(r"\[\[[^\[]+?\]\]|[a-zA-Z0-9]+'[a-zA-Z0-9]+|[a-zA-Z0-9]+").expect("valid regex");
    static ref WORD_RE: Regex = Regex::new(r"[a-zA-Z0-9]+'[a-zA-Z0-9]+|[a-zA-Z0-9]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","couldn","couldn't",
            "d","did","didn","didn't","do","does","doesn","doesn't","doing","don","don't","down","during",
            "each","few","for","from","further",
            "had","hadn","hadn't","has","hasn","hasn't","have","haven","haven't","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","isn","isn't","it","it's","its","itself",
            "just","ll","m","ma","me","mightn","mightn't","more","most","mustn","mustn't","my","myself",
            "needn","needn't","no","nor","not","now",
            "o","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
            "re","s","same","shan","shan't","she","she's","should","should've","shouldn","shouldn't","so","some","such",
            "t","than","that","that'll","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","ve","very",
            "was","wasn","wasn't","we","were","weren","weren't","what","when","where","which","while","who","whom","why","will","with","won","won't","wouldn","wouldn't",
            "y","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Index-side normalization: lower-case, stem, then drop the word if its
/// stem is a stopword.
pub fn index_term(word: &str) -> Option<String> {
    let lower = word.trim().to_lowercase();
    let stem = STEMMER.stem(&lower);
    if stem.is_empty() || is_stopword(&stem) {
        return None;
    }
    Some(stem.into_owned())
}

/// Query-side normalization: lower-case, drop stopwords, then stem.
pub fn query_term(word: &str) -> Option<String> {
    let lower = word.trim().to_lowercase();
    if lower.is_empty() || is_stopword(&lower) {
        return None;
    }
    let stem = STEMMER.stem(&lower);
    if stem.is_empty() {
        return None;
    }
    Some(stem.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    /// Content of a `[[...]]` span with the brackets stripped.
    Link(&'a str),
}

/// Split text into words and whole `[[...]]` link spans.
pub fn scan(text: &str) -> Vec<RawToken<'_>> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| {
            let s = m.as_str();
            match s.strip_prefix("[[").and_then(|rest| rest.strip_suffix("]]")) {
                Some(content) => RawToken::Link(content),
                None => RawToken::Word(s),
            }
        })
        .collect()
}

/// A parsed wiki link: the page it points at and the words it shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiLink {
    /// Lower-cased, trimmed title, not yet checked against the corpus.
    pub target: String,
    /// Unfiltered display words.
    pub display: Vec<String>,
}

impl WikiLink {
    /// Display words that survive stopword filtering and stemming.
    pub fn terms(&self) -> impl Iterator<Item = String> + '_ {
        self.display.iter().filter_map(|w| index_term(w))
    }
}

/// Parse link content (brackets already removed).
///
/// `[[target|shown text]]` links to `target` and displays `shown text`; with
/// several pipes only the text after the last one is shown.
/// `[[ns:page name]]` displays every colon segment. A plain `[[page]]` links
/// without displaying anything.
pub fn parse_link(content: &str) -> WikiLink {
    let (target, piped) = match content.split_once('|') {
        Some((before, after)) => (before, Some(after)),
        None => (content, None),
    };

    let display: Vec<String> = match piped {
        Some(after) => words(after.rsplit('|').next().unwrap_or(after)).collect(),
        None if content.contains(':') => content
            .split(':')
            .filter(|seg| !seg.trim().is_empty())
            .flat_map(words)
            .collect(),
        None => Vec::new(),
    };

    WikiLink { target: target.trim().to_lowercase(), display }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string())
}

/// What one document contributes to the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTokens {
    /// Normalized terms in order of appearance, repeats included.
    pub terms: Vec<String>,
    /// Raw link targets in order of appearance, repeats included.
    pub link_targets: Vec<String>,
}

/// Tokenize a document's title and body.
pub fn analyze(title: &str, body: Option<&str>) -> DocumentTokens {
    let mut out = DocumentTokens::default();
    for text in [Some(title), body].into_iter().flatten() {
        let normalized = text.nfkc().collect::<String>();
        for token in scan(&normalized) {
            match token {
                RawToken::Word(w) => out.terms.extend(index_term(w)),
                RawToken::Link(content) => {
                    let link = parse_link(content);
                    out.terms.extend(link.terms());
                    out.link_targets.push(link.target);
                }
            }
        }
    }
    out
}

/// Query terms in order; repeats are kept.
pub fn tokenize_query(query: &str) -> Vec<String> {
    query.split_whitespace().filter_map(query_term).collect()
}
