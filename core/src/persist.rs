use crate::{AuthorityTable, IndexSnapshot, RelevanceTable, TitleTable};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn titles(&self) -> PathBuf { self.root.join("titles.bin") }
    pub fn authority(&self) -> PathBuf { self.root.join("docs.bin") }
    pub fn relevance(&self) -> PathBuf { self.root.join("words.bin") }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let value = bincode::deserialize(&buf).with_context(|| format!("decode {}", path.display()))?;
    Ok(value)
}

pub fn save_titles(paths: &IndexPaths, titles: &TitleTable) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.titles(), titles)
}

pub fn load_titles(paths: &IndexPaths) -> Result<TitleTable> { read_bincode(&paths.titles()) }

pub fn save_authority(paths: &IndexPaths, authority: &AuthorityTable) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.authority(), authority)
}

pub fn load_authority(paths: &IndexPaths) -> Result<AuthorityTable> { read_bincode(&paths.authority()) }

pub fn save_relevance(paths: &IndexPaths, relevance: &RelevanceTable) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.relevance(), relevance)
}

pub fn load_relevance(paths: &IndexPaths) -> Result<RelevanceTable> { read_bincode(&paths.relevance()) }

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Publish all artifacts of one run. Everything is staged in a scratch
/// directory and only moved over the live files once every write succeeded.
pub fn save_snapshot(paths: &IndexPaths, snapshot: &IndexSnapshot, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let staging = IndexPaths::new(paths.root.join(".staging"));
    if staging.root.exists() {
        fs::remove_dir_all(&staging.root)?;
    }
    save_titles(&staging, &snapshot.titles)?;
    save_authority(&staging, &snapshot.authority)?;
    save_relevance(&staging, &snapshot.relevance)?;
    save_meta(&staging, meta)?;

    for (from, to) in [
        (staging.titles(), paths.titles()),
        (staging.authority(), paths.authority()),
        (staging.relevance(), paths.relevance()),
        (staging.meta(), paths.meta()),
    ] {
        fs::rename(&from, &to).with_context(|| format!("publish {}", to.display()))?;
    }
    fs::remove_dir_all(&staging.root)?;
    Ok(())
}

/// Load whatever can be loaded. A table that is missing or unreadable is
/// reported and left empty.
pub fn load_snapshot_lenient(paths: &IndexPaths) -> IndexSnapshot {
    fn or_empty<T: Default>(what: &str, loaded: Result<T>) -> T {
        loaded.unwrap_or_else(|err| {
            warn!(table = what, error = %format!("{err:#}"), "could not load table, using an empty one");
            T::default()
        })
    }
    IndexSnapshot {
        titles: or_empty("titles", load_titles(paths)),
        authority: or_empty("authority", load_authority(paths)),
        relevance: or_empty("relevance", load_relevance(paths)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_index, Document, PageRankParams};
    use tempfile::tempdir;

    fn meta(n: usize) -> MetaFile {
        MetaFile { num_docs: n as u32, num_terms: 0, created_at: "2024-01-01T00:00:00Z".into(), version: FORMAT_VERSION }
    }

    #[test]
    fn snapshot_survives_disk() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let docs = vec![
            Document::new(1, "Alpha", Some("alpha links [[beta]]".into())),
            Document::new(2, "Beta", Some("beta links [[alpha]]".into())),
        ];
        let snap = build_index(&docs, &PageRankParams::default()).unwrap();
        save_snapshot(&paths, &snap, &meta(2)).unwrap();
        assert!(!dir.path().join(".staging").exists());
        assert_eq!(load_snapshot_lenient(&paths), snap);
        assert_eq!(load_meta(&paths).unwrap().num_docs, 2);
    }

    #[test]
    fn missing_tables_load_empty() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path().join("nope"));
        assert_eq!(load_snapshot_lenient(&paths), IndexSnapshot::default());
    }

    #[test]
    fn rebuilding_is_byte_identical() {
        let dir = tempdir().unwrap();
        let docs = vec![
            Document::new(3, "Gamma", Some("[[delta]] gamma rays".into())),
            Document::new(4, "Delta", Some("river delta and [[gamma|gamma rays]]".into())),
            Document::new(5, "Epsilon", None),
        ];
        let mut bytes = Vec::new();
        for run in ["first", "second"] {
            let paths = IndexPaths::new(dir.path().join(run));
            let snap = build_index(&docs, &PageRankParams::default()).unwrap();
            save_snapshot(&paths, &snap, &meta(3)).unwrap();
            bytes.push([
                fs::read(paths.titles()).unwrap(),
                fs::read(paths.authority()).unwrap(),
                fs::read(paths.relevance()).unwrap(),
            ]);
        }
        assert_eq!(bytes[0], bytes[1]);
    }
}
