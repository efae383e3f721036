//! XML encoding
//!
//! Generates NCBI-flavored element trees: the root is the substituted variant
//! name, each payload field becomes a child, and values are flattened by one
//! recursive rule shared by every field.

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io::Cursor;

use super::{xml_tag, Body, FieldValue, ItemTag, ResultKind, ResultRecord};

/// Serialize a record to XML bytes
pub fn to_xml(record: &ResultRecord) -> Result<Vec<u8>, quick_xml::Error> {
    let kind = record.kind();
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write_prologue(&mut writer, doctype(kind))?;

    let root = kind.xml_root();
    writer.write_event(Event::Start(BytesStart::new(root)))?;

    match record.body() {
        Body::Error(message) => write_simple_element(&mut writer, "ERROR", message)?,
        Body::Payload(fields) => {
            for field in &fields {
                let tag = xml_tag(field.name);
                writer.write_event(Event::Start(BytesStart::new(tag)))?;
                write_value(&mut writer, &field.value, field.items)?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new(root)))?;
    Ok(writer.into_inner().into_inner())
}

/// Published NCBI DOCTYPE for a result kind, where one exists
fn doctype(kind: ResultKind) -> Option<&'static str> {
    match kind {
        ResultKind::ESearch => Some(
            r#"eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd""#,
        ),
        ResultKind::ESummary => Some(
            r#"eSummaryResult PUBLIC "-//NLM//DTD esummary v1 20041029//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20041029/esummary-v1.dtd""#,
        ),
        ResultKind::Search | ResultKind::EFetch => None,
    }
}

/// Flatten a value under the element that is currently open
///
/// Mapping keys go through the substitution table; sequence items are
/// wrapped in `items` elements all the way down.
fn write_value<W: std::io::Write>(
    writer: &mut Writer<W>,
    value: &FieldValue,
    items: ItemTag,
) -> Result<(), quick_xml::Error> {
    match value {
        FieldValue::Scalar(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        FieldValue::Mapping(map) => {
            for (key, child) in map {
                let tag = xml_tag(key);
                writer.write_event(Event::Start(BytesStart::new(tag)))?;
                write_value(writer, child, items)?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
        }
        FieldValue::Sequence(children) => {
            let tag = items.as_str();
            for child in children {
                writer.write_event(Event::Start(BytesStart::new(tag)))?;
                write_value(writer, child, items)?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
        }
    }
    Ok(())
}

/// XML declaration, optionally followed by a DOCTYPE line
pub(crate) fn write_prologue<W: std::io::Write>(
    writer: &mut Writer<W>,
    doctype: Option<&str>,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    if let Some(doctype) = doctype {
        writer.write_event(Event::DocType(BytesText::from_escaped(doctype)))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }
    Ok(())
}

pub(crate) fn write_simple_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
