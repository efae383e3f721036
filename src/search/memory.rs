//! In-memory document index
//!
//! Documents are read from JSON-lines files: either a single file, or every
//! `*.jsonl` file in a directory (in file-name order). Each line is one JSON
//! object; leaf values are stringified into [`FieldValue`]s.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::query::{self, Query};
use super::{IndexInfo, Result, SearchBackend, SearchError};
use crate::render::{document_from_json, DocumentRecord, FieldValue};

pub struct MemoryIndex {
    name: String,
    documents: Vec<DocumentRecord>,
    /// UID to position in `documents`
    by_id: HashMap<String, usize>,
    loaded_at: DateTime<Utc>,
}

impl MemoryIndex {
    /// Build an index over `documents`, keyed by the first scalar of `id_field`
    pub fn new(name: &str, id_field: &str, documents: Vec<DocumentRecord>) -> Self {
        let by_id = documents
            .iter()
            .enumerate()
            .filter_map(|(pos, doc)| {
                doc.get(id_field)
                    .and_then(FieldValue::first_scalar)
                    .map(|id| (id.to_string(), pos))
            })
            .collect();

        Self {
            name: name.to_string(),
            documents,
            by_id,
            loaded_at: Utc::now(),
        }
    }

    /// Load documents from a `.jsonl` file or a directory of them
    pub fn load(name: &str, id_field: &str, path: &Path) -> Result<Self> {
        let files = if path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(path)
                .map_err(|e| SearchError::Index(format!("{}: {}", path.display(), e)))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
                .collect();
            files.sort();
            files
        } else {
            vec![path.to_path_buf()]
        };

        let mut documents = Vec::new();
        for file in &files {
            let content = fs::read_to_string(file)
                .map_err(|e| SearchError::Index(format!("{}: {}", file.display(), e)))?;

            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                    SearchError::Index(format!("{}:{}: {}", file.display(), line_no + 1, e))
                })?;
                match document_from_json(value) {
                    Some(doc) => documents.push(doc),
                    None => tracing::warn!(
                        "Skipping non-object line {}:{}",
                        file.display(),
                        line_no + 1
                    ),
                }
            }
        }

        let index = Self::new(name, id_field, documents);
        tracing::info!(
            "Loaded {} index: {} documents from {} file(s)",
            name,
            index.documents.len(),
            files.len()
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a DocumentRecord> + 'a {
        self.documents.iter().filter(move |doc| query.matches(doc))
    }
}

impl SearchBackend for MemoryIndex {
    fn normalize_query(&self, raw: &str, field: Option<&str>) -> Result<String> {
        let mut parsed = query::parse(raw)?;
        if let Some(field) = field.filter(|f| !f.trim().is_empty()) {
            parsed.restrict_to(field);
        }
        Ok(parsed.to_string())
    }

    fn total_match_count(&self, query: &str) -> Result<usize> {
        let parsed = query::parse(query)?;
        Ok(self.matching(&parsed).count())
    }

    fn search(&self, query: &str, max_hits: usize) -> Result<Vec<DocumentRecord>> {
        let parsed = query::parse(query)?;
        Ok(self.matching(&parsed).take(max_hits).cloned().collect())
    }

    fn fetch(&self, ids: &[String]) -> Result<Vec<DocumentRecord>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|&pos| self.documents[pos].clone())
            .collect())
    }

    fn info(&self) -> IndexInfo {
        IndexInfo {
            name: self.name.clone(),
            document_count: self.documents.len(),
            last_update: self.loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(id: &str, title: &str) -> DocumentRecord {
        DocumentRecord::from([
            ("id".to_string(), FieldValue::from(id)),
            ("title".to_string(), FieldValue::from(title)),
        ])
    }

    fn index() -> MemoryIndex {
        MemoryIndex::new(
            "pubmed",
            "id",
            vec![
                doc("1", "aspirin for headache"),
                doc("2", "ibuprofen for headache"),
                doc("3", "aspirin and stroke"),
            ],
        )
    }

    #[test]
    fn test_search_preserves_index_order() {
        let ix = index();
        let q = ix.normalize_query("headache", None).unwrap();
        let hits = ix.search(&q, 10).unwrap();
        let ids: Vec<_> = hits.iter().map(|d| d["id"].as_scalar().unwrap()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(ix.total_match_count(&q).unwrap(), 2);
    }

    #[test]
    fn test_search_max_hits() {
        let ix = index();
        let q = ix.normalize_query("aspirin OR ibuprofen", None).unwrap();
        assert_eq!(ix.total_match_count(&q).unwrap(), 3);
        assert_eq!(ix.search(&q, 2).unwrap().len(), 2);
        assert!(ix.search(&q, 0).unwrap().is_empty());
    }

    #[test]
    fn test_field_restriction() {
        let ix = index();
        assert_eq!(
            ix.normalize_query("aspirin", Some("ti")).unwrap(),
            "aspirin[ti]"
        );
        let q = ix.normalize_query("1", Some("uid")).unwrap();
        assert_eq!(ix.total_match_count(&q).unwrap(), 1);
    }

    #[test]
    fn test_quoted_keyword_round_trips_through_backend() {
        let ix = index();
        for raw in [r#"aspirin "and""#, r#""stroke(""#] {
            let q = ix.normalize_query(raw, None).unwrap();
            assert_eq!(ix.total_match_count(&q).unwrap(), 1, "{raw}");
            assert_eq!(ix.search(&q, 10).unwrap().len(), 1, "{raw}");
        }
    }

    #[test]
    fn test_fetch_in_request_order() {
        let ix = index();
        let docs = ix
            .fetch(&["3".to_string(), "missing".to_string(), "1".to_string()])
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_scalar().unwrap()).collect();
        assert_eq!(ids, ["3", "1"]);
    }

    #[test]
    fn test_list_valued_id_field() {
        let study = DocumentRecord::from([(
            "nct_id".to_string(),
            FieldValue::from(vec!["NCT0001".to_string()]),
        )]);
        let ix = MemoryIndex::new("ctgov", "nct_id", vec![study]);
        assert_eq!(ix.fetch(&["NCT0001".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": 11, "title": "first"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"["not", "a", "document"]"#).unwrap();
        writeln!(file, r#"{{"id": "12", "title": "second"}}"#).unwrap();

        let ix = MemoryIndex::load("pubmed", "id", file.path()).unwrap();
        assert_eq!(ix.len(), 2);
        assert_eq!(ix.fetch(&["11".to_string()]).unwrap()[0]["title"], FieldValue::from("first"));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"id\": \"2\"}\n").unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"id\": \"1\"}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ix = MemoryIndex::load("pubmed", "id", dir.path()).unwrap();
        assert_eq!(ix.len(), 2);
        assert_eq!(ix.info().document_count, 2);
        let q = ix.normalize_query("1 OR 2", Some("uid")).unwrap();
        let hits = ix.search(&q, 10).unwrap();
        assert_eq!(hits[0]["id"], FieldValue::from("1"));
    }

    #[test]
    fn test_load_sample_data() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");

        let pubmed = MemoryIndex::load("pubmed", "id", &data.join("pubmed.sample.jsonl")).unwrap();
        let q = pubmed.normalize_query("migraine", Some("mh")).unwrap();
        let hits = pubmed.search(&q, 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], FieldValue::from("29187304"));

        let ctgov = MemoryIndex::load("ctgov", "nct_id", &data.join("ctgov.sample.jsonl")).unwrap();
        assert_eq!(ctgov.fetch(&["NCT02466958".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let ix = MemoryIndex::load("pubmed", "id", file.path()).unwrap();
        assert!(ix.is_empty());
        assert!(!index().is_empty());
    }

    #[test]
    fn test_load_errors() {
        let missing = MemoryIndex::load("pubmed", "id", Path::new("/nonexistent/index.jsonl"));
        assert!(matches!(missing, Err(SearchError::Index(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{broken").unwrap();
        let broken = MemoryIndex::load("pubmed", "id", file.path());
        assert!(matches!(broken, Err(SearchError::Index(_))));
    }
}
