use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wikirank_core::{DocId, Document};

/// Read every document under `input`, which may be a single file or a
/// directory of `.xml`, `.json` and `.jsonl` files.
pub fn read_collection(input: &Path) -> Result<Vec<Document>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("xml" | "json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input {} does not exist", input.display());
    }

    let mut docs = Vec::new();
    for file in files {
        let read = match extension(&file) {
            Some("jsonl") => read_jsonl(&file),
            Some("json") => read_json(&file),
            _ => read_xml(&file),
        };
        docs.extend(read.with_context(|| format!("reading {}", file.display()))?);
    }
    Ok(docs)
}

fn extension(p: &Path) -> Option<&str> { p.extension().and_then(|s| s.to_str()) }

fn read_xml(file: &Path) -> Result<Vec<Document>> {
    let xml = fs::read_to_string(file)?;
    parse_wiki_xml(&xml)
}

fn read_jsonl(file: &Path) -> Result<Vec<Document>> {
    let reader = BufReader::new(File::open(file)?);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: Document = serde_json::from_str(&line)?;
        docs.push(Document::new(doc.id, &doc.title, doc.text));
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<Document>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let raw: Vec<Document> = match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(serde_json::from_value).collect::<Result<_, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(raw.into_iter().map(|d| Document::new(d.id, &d.title, d.text)).collect())
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Title,
    Text,
}

#[derive(Default)]
struct PageFields {
    id: Option<String>,
    title: Option<String>,
    text: Option<String>,
}

impl PageFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Id => &mut self.id,
            Field::Title => &mut self.title,
            Field::Text => &mut self.text,
        }
    }

    fn into_document(self) -> Result<Document> {
        let raw_id = self.id.ok_or_else(|| anyhow!("page without <id>"))?;
        let id: DocId = raw_id.trim().parse().with_context(|| format!("page id {raw_id:?} is not an integer"))?;
        let title = self.title.ok_or_else(|| anyhow!("page {id} has no <title>"))?;
        Ok(Document::new(id, &title, self.text))
    }
}

/// Parse a wiki dump: `<page>` elements with `<id>`, `<title>` and an
/// optional `<text>`. Only the first `<id>` of a page counts, so nested
/// revision ids are ignored.
pub fn parse_wiki_xml(xml: &str) -> Result<Vec<Document>> {
    let mut reader = Reader::from_str(xml);
    let mut docs = Vec::new();
    let mut page: Option<PageFields> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let f = match e.name().as_ref() {
                    b"page" => {
                        page.get_or_insert_with(PageFields::default);
                        continue;
                    }
                    b"id" => Field::Id,
                    b"title" => Field::Title,
                    b"text" => Field::Text,
                    _ => continue,
                };
                if let Some(p) = page.as_mut() {
                    let slot = p.slot(f);
                    if slot.is_none() {
                        *slot = Some(String::new());
                        field = Some(f);
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(p) = page.as_mut() {
                    if e.name().as_ref() == b"text" {
                        p.text.get_or_insert_with(String::new);
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(p), Some(f)) = (page.as_mut(), field) {
                    let text = t.unescape()?;
                    p.slot(f).get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::CData(c) => {
                if let (Some(p), Some(f)) = (page.as_mut(), field) {
                    let bytes = c.into_inner();
                    p.slot(f).get_or_insert_with(String::new).push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"page" => {
                    field = None;
                    if let Some(p) = page.take() {
                        docs.push(p.into_document()?);
                    }
                }
                b"id" | b"title" | b"text" => field = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(docs)
}
