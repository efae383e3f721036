//! Result records and their wire encodings
//!
//! A request handler builds one [`ResultRecord`] from already-fetched data and
//! renders it exactly once. Records are plain data: no I/O, no shared state,
//! safe to render from any task.
//!
//! # Encodings
//!
//! | Mode   | Body                         | Content type       |
//! |--------|------------------------------|--------------------|
//! | `json` | `{header, <variant>}` object | `application/json` |
//! | `xml`  | NCBI-style element tree      | `application/xml`  |
//! | `trec` | TREC run lines (ESearch)     | `text/plain`       |
//! | other  | JSON body                    | `text/plain`       |

mod json;
mod trec;
mod value;
pub(crate) mod xml;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

pub use json::to_json;
pub use trec::to_trec;
pub use value::{document_from_json, DocumentRecord, FieldValue};
pub use xml::to_xml;

/// Version string reported in every JSON header
pub const API_VERSION: &str = "0.3-openpm";

/// Content types
pub mod mime {
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const TEXT: &str = "text/plain";
}

/// Requested response mode (`retmode`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RetMode {
    Json,
    Xml,
    Trec,
    Text,
    /// Unrecognized mode, kept verbatim for logging
    Other(String),
}

impl RetMode {
    pub fn parse(mode: &str) -> Self {
        match mode.trim().to_ascii_lowercase().as_str() {
            "json" => RetMode::Json,
            "xml" => RetMode::Xml,
            "trec" => RetMode::Trec,
            "text" => RetMode::Text,
            _ => RetMode::Other(mode.to_string()),
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            RetMode::Json => mime::JSON,
            RetMode::Xml => mime::XML,
            RetMode::Trec | RetMode::Text | RetMode::Other(_) => mime::TEXT,
        }
    }
}

impl From<String> for RetMode {
    fn from(mode: String) -> Self {
        RetMode::parse(&mode)
    }
}

/// Result variant names, as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Generic result, used for errors raised before an endpoint is known
    Search,
    ESearch,
    EFetch,
    ESummary,
}

impl ResultKind {
    pub fn class_name(self) -> &'static str {
        match self {
            ResultKind::Search => "SearchResult",
            ResultKind::ESearch => "ESearchResult",
            ResultKind::EFetch => "EFetchResult",
            ResultKind::ESummary => "ESummaryResult",
        }
    }

    /// Top-level JSON key: `esearchresult`
    pub fn json_key(self) -> String {
        self.class_name().to_ascii_lowercase()
    }

    /// `header.type` value: `esearch`
    pub fn header_type(self) -> String {
        self.json_key().replace("result", "")
    }

    /// XML root element: `eSearchResult`
    pub fn xml_root(self) -> &'static str {
        xml_tag(match self {
            ResultKind::Search => "searchresult",
            ResultKind::ESearch => "esearchresult",
            ResultKind::EFetch => "efetchresult",
            ResultKind::ESummary => "esummaryresult",
        })
    }
}

/// Shared field-name substitution table for XML output
///
/// Names without an entry keep their original spelling.
pub fn xml_tag(name: &str) -> &str {
    match name {
        "count" => "Count",
        "retmax" => "RetMax",
        "retstart" => "RetStart",
        "idlist" => "IdList",
        "translationset" => "TranslationSet",
        "querytranslation" => "QueryTranslation",
        "summaries" => "DocSum",
        "efetchresult" => "eFetchResult",
        "esummaryresult" => "eSummaryResult",
        "esearchresult" => "eSearchResult",
        "searchresult" => "SearchResult",
        other => other,
    }
}

/// Element name used for each item of a flattened sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTag {
    /// Scalar UID lists
    Id,
    /// Document and summary lists
    Article,
}

impl ItemTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemTag::Id => "Id",
            ItemTag::Article => "Article",
        }
    }
}

/// One payload field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
    pub items: ItemTag,
}

impl Field {
    fn new(name: &'static str, value: impl Into<FieldValue>) -> Self {
        Self {
            name,
            value: value.into(),
            items: ItemTag::Article,
        }
    }

    fn ids(name: &'static str, ids: Vec<String>) -> Self {
        Self {
            name,
            value: ids.into(),
            items: ItemTag::Id,
        }
    }
}

/// What a record renders: either an error message or its payload fields
#[derive(Debug, Clone, PartialEq)]
pub enum Body<'a> {
    Error(&'a str),
    Payload(Vec<Field>),
}

/// `{from, to}` query translation pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet {
    pub from: String,
    pub to: String,
}

/// TREC run identifiers, used only by the TREC encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrecRun {
    pub query_id: String,
    pub tag: String,
}

impl Default for TrecRun {
    fn default() -> Self {
        Self {
            query_id: "0".to_string(),
            tag: "orbit".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ESearchResult {
    pub retmode: RetMode,
    pub count: usize,
    pub retmax: usize,
    pub retstart: usize,
    pub idlist: Vec<String>,
    pub querytranslation: String,
    pub translationset: TranslationSet,
    pub trec: TrecRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EFetchResult {
    pub retmode: RetMode,
    pub articles: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ESummaryResult {
    pub retmode: RetMode,
    pub retstart: usize,
    pub retmax: usize,
    pub summaries: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    pub retmode: RetMode,
    pub kind: ResultKind,
    pub message: String,
}

/// A response payload, one case per result kind
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRecord {
    ESearch(ESearchResult),
    EFetch(EFetchResult),
    ESummary(ESummaryResult),
    Error(ErrorResult),
}

impl ResultRecord {
    pub fn error(retmode: RetMode, kind: ResultKind, message: impl Into<String>) -> Self {
        ResultRecord::Error(ErrorResult {
            retmode,
            kind,
            message: message.into(),
        })
    }

    pub fn retmode(&self) -> &RetMode {
        match self {
            ResultRecord::ESearch(r) => &r.retmode,
            ResultRecord::EFetch(r) => &r.retmode,
            ResultRecord::ESummary(r) => &r.retmode,
            ResultRecord::Error(r) => &r.retmode,
        }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            ResultRecord::ESearch(_) => ResultKind::ESearch,
            ResultRecord::EFetch(_) => ResultKind::EFetch,
            ResultRecord::ESummary(_) => ResultKind::ESummary,
            ResultRecord::Error(r) => r.kind,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultRecord::Error(_))
    }

    /// Payload fields in wire order
    pub fn body(&self) -> Body<'_> {
        match self {
            ResultRecord::Error(r) => Body::Error(&r.message),
            ResultRecord::ESearch(r) => {
                let pair = DocumentRecord::from([
                    ("from".to_string(), FieldValue::from(r.translationset.from.clone())),
                    ("to".to_string(), FieldValue::from(r.translationset.to.clone())),
                ]);
                Body::Payload(vec![
                    Field::new("count", r.count.to_string()),
                    Field::new("retmax", r.retmax.to_string()),
                    Field::new("retstart", r.retstart.to_string()),
                    Field::ids("idlist", r.idlist.clone()),
                    Field::new("querytranslation", r.querytranslation.clone()),
                    Field::new("translationset", pair),
                ])
            }
            ResultRecord::EFetch(r) => {
                Body::Payload(vec![Field::new("articles", r.articles.clone())])
            }
            ResultRecord::ESummary(r) => Body::Payload(vec![
                Field::new("retstart", r.retstart.to_string()),
                Field::new("retmax", r.retmax.to_string()),
                Field::new("summaries", r.summaries.clone()),
            ]),
        }
    }

    /// Encode the record in its requested mode
    pub fn render(&self) -> Result<Rendered, RenderError> {
        let mode = self.retmode();
        let body = match (mode, self) {
            (RetMode::Xml, _) => to_xml(self)?,
            (RetMode::Trec, ResultRecord::ESearch(search)) => to_trec(search).into_bytes(),
            _ => to_json(self)?,
        };

        Ok(Rendered {
            media_type: mode.media_type(),
            body,
        })
    }
}

/// Encoder failures
///
/// Writing into an in-memory buffer does not fail for well-formed records;
/// these only surface on a broken invariant.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML encoding failed: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Rendered response bytes with their content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub media_type: &'static str,
    pub body: Vec<u8>,
}

impl Rendered {
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Entrez responses keep a 200 status even when carrying an `ERROR`
impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.media_type)],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_search(mode: RetMode) -> ResultRecord {
        ResultRecord::ESearch(ESearchResult {
            retmode: mode,
            count: 150,
            retmax: 3,
            retstart: 0,
            idlist: vec!["3829102".into(), "1928374".into(), "5566778".into()],
            querytranslation: "cancer[mesh] AND therapy[title]".into(),
            translationset: TranslationSet {
                from: "cancer therapy".into(),
                to: "cancer[mesh] AND therapy[title]".into(),
            },
            trec: TrecRun::default(),
        })
    }

    #[test]
    fn test_retmode_parse() {
        assert_eq!(RetMode::parse("json"), RetMode::Json);
        assert_eq!(RetMode::parse(" XML "), RetMode::Xml);
        assert_eq!(RetMode::parse("trec"), RetMode::Trec);
        assert_eq!(RetMode::parse("text"), RetMode::Text);
        assert_eq!(RetMode::parse("csv"), RetMode::Other("csv".into()));
    }

    #[test]
    fn test_media_types() {
        assert_eq!(RetMode::Json.media_type(), "application/json");
        assert_eq!(RetMode::Xml.media_type(), "application/xml");
        assert_eq!(RetMode::Trec.media_type(), "text/plain");
        assert_eq!(RetMode::Other("csv".into()).media_type(), "text/plain");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ResultKind::ESearch.json_key(), "esearchresult");
        assert_eq!(ResultKind::ESearch.header_type(), "esearch");
        assert_eq!(ResultKind::Search.header_type(), "search");
        assert_eq!(ResultKind::ESearch.xml_root(), "eSearchResult");
        assert_eq!(ResultKind::EFetch.xml_root(), "eFetchResult");
        assert_eq!(ResultKind::ESummary.xml_root(), "eSummaryResult");
        assert_eq!(ResultKind::Search.xml_root(), "SearchResult");
    }

    #[test]
    fn test_substitution_table() {
        assert_eq!(xml_tag("count"), "Count");
        assert_eq!(xml_tag("summaries"), "DocSum");
        assert_eq!(xml_tag("articles"), "articles");
        assert_eq!(xml_tag("from"), "from");
    }

    #[test]
    fn test_search_body_field_order() {
        let Body::Payload(fields) = sample_search(RetMode::Json).body() else {
            panic!("expected payload");
        };
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            ["count", "retmax", "retstart", "idlist", "querytranslation", "translationset"]
        );
        assert_eq!(fields[3].items, ItemTag::Id);
        assert_eq!(fields[5].items, ItemTag::Article);
    }

    #[test]
    fn test_render_dispatch() {
        let json = sample_search(RetMode::Json).render().unwrap();
        assert_eq!(json.media_type, "application/json");
        assert!(json.as_str().starts_with('{'));

        let xml = sample_search(RetMode::Xml).render().unwrap();
        assert_eq!(xml.media_type, "application/xml");
        assert!(xml.as_str().starts_with("<?xml"));

        let trec = sample_search(RetMode::Trec).render().unwrap();
        assert_eq!(trec.media_type, "text/plain");
        assert_eq!(trec.as_str().lines().count(), 3);

        // Unknown modes fall back to JSON bytes
        let other = sample_search(RetMode::Other("csv".into())).render().unwrap();
        assert_eq!(other.media_type, "text/plain");
        assert!(other.as_str().starts_with('{'));
    }

    #[test]
    fn test_trec_only_for_search() {
        let fetch = ResultRecord::EFetch(EFetchResult {
            retmode: RetMode::Trec,
            articles: vec![],
        });
        let rendered = fetch.render().unwrap();
        assert_eq!(rendered.media_type, "text/plain");
        assert!(rendered.as_str().contains("\"efetchresult\""));
    }

    #[test]
    fn test_render_is_idempotent() {
        for mode in [RetMode::Json, RetMode::Xml, RetMode::Trec] {
            let record = sample_search(mode);
            assert_eq!(record.render().unwrap(), record.render().unwrap());
        }
    }

    #[test]
    fn test_error_record() {
        let record = ResultRecord::error(RetMode::Xml, ResultKind::Search, "boom");
        assert!(record.is_error());
        assert_eq!(record.kind(), ResultKind::Search);
        assert_eq!(record.body(), Body::Error("boom"));
    }
}
