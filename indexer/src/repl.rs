use anyhow::Result;
use std::io::{self, BufRead, Write};
use wikirank_core::{Querier, SearchOutcome};

const PROMPT: &str = "search> ";
const QUIT: &str = ":quit";

/// Prompt, score, print, until `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(querier: &Querier, use_pagerank: bool, mut input: R, out: &mut W) -> Result<()> {
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(['\n', '\r']);
        if query.trim() == QUIT {
            break;
        }
        render(out, query, &querier.search(query, use_pagerank))?;
    }
    Ok(())
}

pub fn render<W: Write>(out: &mut W, query: &str, outcome: &SearchOutcome) -> io::Result<()> {
    match outcome {
        SearchOutcome::Ranked(hits) => {
            for hit in hits {
                writeln!(out, "{}", hit.title)?;
            }
            Ok(())
        }
        SearchOutcome::NoRelevantDocuments => writeln!(out, "search item {query:?} has no relevant documents"),
        SearchOutcome::EmptyCorpus => writeln!(out, "search item {query:?} has no relevant documents, empty corpus"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wikirank_core::{build_index, Document, PageRankParams};

    #[test]
    fn answers_until_quit() {
        let docs = vec![
            Document::new(1, "Volcano", Some("lava and ash".into())),
            Document::new(2, "Glacier", Some("ice".into())),
        ];
        let querier = Querier::new(build_index(&docs, &PageRankParams::default()).unwrap());
        let mut out = Vec::new();
        run(&querier, true, Cursor::new("lava\nsand\n:quit\nice\n"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "search> volcano\nsearch> search item \"sand\" has no relevant documents\nsearch> "
        );
    }

    #[test]
    fn empty_index_says_so() {
        let mut out = Vec::new();
        run(&Querier::default(), false, Cursor::new("anything"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("empty corpus"));
    }
}
