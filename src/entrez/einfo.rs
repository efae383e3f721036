//! EInfo: database list and per-database statistics
//!
//! EInfo has its own envelope (`eInfoResult`), so it renders itself instead of
//! going through [`ResultRecord`](crate::render::ResultRecord).

use chrono::{DateTime, Utc};
use quick_xml::{
    events::{BytesEnd, BytesStart, Event},
    Writer,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Cursor;

use super::{default_xml, invalid_db_message, is_supported_db, DATABASES};
use crate::error::Result;
use crate::render::xml::{write_prologue, write_simple_element};
use crate::render::{RenderError, Rendered, RetMode, API_VERSION};
use crate::search::SearchHandle;

const DOCTYPE: &str = r#"eInfoResult PUBLIC "-//NLM//DTD einfo 20190110//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20190110/einfo.dtd""#;

#[derive(Debug, Clone, Deserialize)]
pub struct EInfoParams {
    pub db: Option<String>,
    #[serde(default = "default_xml")]
    pub retmode: RetMode,
}

/// A searchable field as advertised by EInfo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    pub description: &'static str,
    pub is_date: bool,
    pub is_numerical: bool,
    pub single_token: bool,
    pub hierarchy: bool,
    pub is_hidden: bool,
}

const fn field(
    name: &'static str,
    full_name: &'static str,
    description: &'static str,
    flags: [bool; 4],
) -> FieldInfo {
    let [is_date, is_numerical, single_token, hierarchy] = flags;
    FieldInfo {
        name,
        full_name,
        description,
        is_date,
        is_numerical,
        single_token,
        hierarchy,
        is_hidden: false,
    }
}

/// PubMed search fields: `[is_date, is_numerical, single_token, hierarchy]`
pub const PUBMED_FIELDS: &[FieldInfo] = &[
    field("ALL", "All Fields", "All terms from all searchable fields", [false, false, false, false]),
    field("UID", "UID", "Unique number assigned to publication", [false, true, false, false]),
    field("TITL", "Title", "Words in title of publication", [false, false, false, false]),
    field("MESH", "MeSH Terms", "Medical Subject Headings assigned to publication", [false, false, true, true]),
    field("MAJR", "MeSH Major Topic", "MeSH terms of major importance to publication", [false, false, true, true]),
    field("PDAT", "Date - Publication", "Date of publication", [true, false, true, false]),
    field("PTYP", "Publication Type", "Type of publication (e.g., review)", [false, false, true, true]),
    field("SUBH", "MeSH Subheading", "Additional specificity for MeSH term", [false, false, true, true]),
    field("TIAB", "Title/Abstract", "Free text associated with Abstract/Title", [false, false, false, false]),
];

/// Statistics for one database
#[derive(Debug, Clone, PartialEq)]
pub struct DbInfo {
    pub name: &'static str,
    pub menu_name: &'static str,
    pub description: &'static str,
    pub count: usize,
    pub last_update: DateTime<Utc>,
    pub fields: &'static [FieldInfo],
}

impl DbInfo {
    pub fn pubmed(count: usize, last_update: DateTime<Utc>) -> Self {
        Self {
            name: "pubmed",
            menu_name: "PubMed",
            description: "PubMed bibliographic record",
            count,
            last_update,
            fields: PUBMED_FIELDS,
        }
    }

    /// `Build-2026.02.19.01.50`
    pub fn build(&self) -> String {
        self.last_update.format("Build-%Y.%m.%d.%H.%M").to_string()
    }

    /// `2026/02/19 01:50`
    pub fn last_update(&self) -> String {
        self.last_update.format("%Y/%m/%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EInfoBody {
    DbList(Vec<&'static str>),
    DbInfo(DbInfo),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EInfoResult {
    pub retmode: RetMode,
    pub body: EInfoBody,
}

pub async fn einfo(handle: &SearchHandle, params: EInfoParams) -> Result<EInfoResult> {
    let db = params.db.filter(|db| !db.trim().is_empty());

    let body = match db {
        None => EInfoBody::DbList(DATABASES.to_vec()),
        Some(db) if is_supported_db(&db) => {
            let info = handle.info().await?;
            EInfoBody::DbInfo(DbInfo::pubmed(info.document_count, info.last_update))
        }
        Some(db) => EInfoBody::Error(invalid_db_message(&db)),
    };

    Ok(EInfoResult {
        retmode: params.retmode,
        body,
    })
}

impl EInfoResult {
    pub fn render(&self) -> std::result::Result<Rendered, RenderError> {
        let body = match self.retmode {
            RetMode::Xml => self.to_xml()?,
            _ => serde_json::to_vec(&self.to_json())?,
        };
        Ok(Rendered {
            media_type: self.retmode.media_type(),
            body,
        })
    }

    fn to_json(&self) -> Value {
        let content = match &self.body {
            EInfoBody::DbList(names) => json!({ "dblist": names }),
            EInfoBody::DbInfo(info) => {
                let fields: Vec<Value> = info
                    .fields
                    .iter()
                    .map(|f| {
                        json!({
                            "name": f.name,
                            "fullname": f.full_name,
                            "description": f.description,
                            "termcount": "",
                            "isdate": yes_no(f.is_date),
                            "isnumerical": yes_no(f.is_numerical),
                            "singletoken": yes_no(f.single_token),
                            "hierarchy": yes_no(f.hierarchy),
                            "ishidden": yes_no(f.is_hidden),
                        })
                    })
                    .collect();

                json!({
                    "dbinfo": [{
                        "dbname": info.name,
                        "menuname": info.menu_name,
                        "description": info.description,
                        "dbbuild": info.build(),
                        "count": info.count.to_string(),
                        "lastupdate": info.last_update(),
                        "fieldlist": fields,
                    }]
                })
            }
            EInfoBody::Error(message) => json!({ "ERROR": message }),
        };

        json!({
            "header": { "type": "einfo", "version": API_VERSION },
            "einforesult": content,
        })
    }

    fn to_xml(&self) -> std::result::Result<Vec<u8>, quick_xml::Error> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_prologue(&mut writer, Some(DOCTYPE))?;
        writer.write_event(Event::Start(BytesStart::new("eInfoResult")))?;

        match &self.body {
            EInfoBody::DbList(names) => {
                writer.write_event(Event::Start(BytesStart::new("DbList")))?;
                for name in names {
                    write_simple_element(&mut writer, "DbName", name)?;
                }
                writer.write_event(Event::End(BytesEnd::new("DbList")))?;
            }
            EInfoBody::DbInfo(info) => {
                writer.write_event(Event::Start(BytesStart::new("DbInfo")))?;
                write_simple_element(&mut writer, "DbName", info.name)?;
                write_simple_element(&mut writer, "MenuName", info.menu_name)?;
                write_simple_element(&mut writer, "Description", info.description)?;
                write_simple_element(&mut writer, "DbBuild", &info.build())?;
                write_simple_element(&mut writer, "Count", &info.count.to_string())?;
                write_simple_element(&mut writer, "LastUpdate", &info.last_update())?;

                writer.write_event(Event::Start(BytesStart::new("FieldList")))?;
                for f in info.fields {
                    write_field(&mut writer, f)?;
                }
                writer.write_event(Event::End(BytesEnd::new("FieldList")))?;
                writer.write_event(Event::End(BytesEnd::new("DbInfo")))?;
            }
            EInfoBody::Error(message) => write_simple_element(&mut writer, "ERROR", message)?,
        }

        writer.write_event(Event::End(BytesEnd::new("eInfoResult")))?;
        Ok(writer.into_inner().into_inner())
    }
}

fn write_field<W: std::io::Write>(
    writer: &mut Writer<W>,
    f: &FieldInfo,
) -> std::result::Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("Field")))?;
    write_simple_element(writer, "Name", f.name)?;
    write_simple_element(writer, "FullName", f.full_name)?;
    write_simple_element(writer, "Description", f.description)?;
    write_simple_element(writer, "TermCount", "")?;
    write_simple_element(writer, "IsDate", yes_no(f.is_date))?;
    write_simple_element(writer, "IsNumerical", yes_no(f.is_numerical))?;
    write_simple_element(writer, "SingleToken", yes_no(f.single_token))?;
    write_simple_element(writer, "Hierarchy", yes_no(f.hierarchy))?;
    write_simple_element(writer, "IsHidden", yes_no(f.is_hidden))?;
    writer.write_event(Event::End(BytesEnd::new("Field")))?;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        "N"
    }
}
