//! Boolean query language for [`MemoryIndex`](super::MemoryIndex)
//!
//! A deliberately small PubMed-like dialect:
//!
//! ```text
//! (headache and ibuprofen) OR "migraine therapy"[ti] NOT review[pt]
//! ```
//!
//! - terms are bare words or quoted phrases, optionally tagged `[field]`
//! - `AND`, `OR`, `NOT` are binary, case-insensitive and evaluated left to right
//! - adjacent terms without an operator are joined with `AND`
//! - a trailing `*` makes the last word of a term a prefix
//!
//! The normalized form ([`Display`](std::fmt::Display)) tags every term and
//! parenthesizes nested groups, so it parses back to the same tree.

use std::fmt;

use super::{Result, SearchError};
use crate::render::DocumentRecord;

const ALL_FIELDS: &str = "All Fields";

/// Parsed query tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Term {
        text: String,
        field: Option<String>,
        prefix: bool,
    },
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    /// `a NOT b`: documents matching `a` but not `b`
    Not(Box<Query>, Box<Query>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    Not,
}

impl Op {
    fn keyword(word: &str) -> Option<Op> {
        match word.to_ascii_uppercase().as_str() {
            "AND" => Some(Op::And),
            "OR" => Some(Op::Or),
            "NOT" => Some(Op::Not),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Op(Op),
    Atom {
        text: String,
        field: Option<String>,
    },
}

/// Parse a raw query string
pub fn parse(raw: &str) -> Result<Query> {
    if raw.trim().is_empty() {
        return Err(SearchError::EmptyInput("Empty query".to_string()));
    }

    let tokens = tokenize(raw)?;
    let mut parser = Parser { tokens, pos: 0 };
    let query = parser.expr()?;

    if parser.pos < parser.tokens.len() {
        return Err(syntax("Unbalanced parentheses in query"));
    }
    Ok(query)
}

fn syntax(message: impl Into<String>) -> SearchError {
    SearchError::QuerySyntax(message.into())
}

fn tokenize(raw: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            '[' => return Err(syntax("Field tag without a search term")),
            '"' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == '"')
                    .ok_or_else(|| syntax("Unterminated quoted phrase"))?;
                let text: String = chars[i + 1..i + 1 + close].iter().collect();
                i += close + 2;
                let (field, next) = field_tag(&chars, i)?;
                i = next;
                tokens.push(Token::Atom { text, field });
            }
            _ => {
                let start = i;
                while i < chars.len()
                    && !chars[i].is_whitespace()
                    && !matches!(chars[i], '(' | ')' | '"' | '[')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let (field, next) = field_tag(&chars, i)?;
                i = next;

                match Op::keyword(&word) {
                    Some(op) if field.is_none() => tokens.push(Token::Op(op)),
                    _ => tokens.push(Token::Atom { text: word, field }),
                }
            }
        }
    }

    Ok(tokens)
}

/// Read an optional `[field]` immediately following a term
fn field_tag(chars: &[char], i: usize) -> Result<(Option<String>, usize)> {
    if chars.get(i) != Some(&'[') {
        return Ok((None, i));
    }
    let close = chars[i + 1..]
        .iter()
        .position(|&ch| ch == ']')
        .ok_or_else(|| syntax("Unterminated field tag"))?;
    let tag: String = chars[i + 1..i + 1 + close].iter().collect();
    let tag = tag.trim();

    let field = if tag.eq_ignore_ascii_case(ALL_FIELDS) || tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    };
    Ok((field, i + close + 2))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expr(&mut self) -> Result<Query> {
        let mut left = self.primary()?;

        loop {
            let op = match self.peek() {
                None | Some(Token::Close) => break,
                Some(Token::Op(op)) => {
                    let op = *op;
                    self.pos += 1;
                    op
                }
                // Implicit AND between adjacent terms or groups
                Some(Token::Open) | Some(Token::Atom { .. }) => Op::And,
            };

            if matches!(self.peek(), None | Some(Token::Close)) {
                return Err(syntax(format!("Missing term after {}", op.name())));
            }
            let right = Box::new(self.primary()?);
            let l = Box::new(left);
            left = match op {
                Op::And => Query::And(l, right),
                Op::Or => Query::Or(l, right),
                Op::Not => Query::Not(l, right),
            };
        }

        Ok(left)
    }

    fn primary(&mut self) -> Result<Query> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| syntax("Unexpected end of query"))?;
        self.pos += 1;

        match token {
            Token::Open => {
                let inner = self.expr()?;
                match self.peek() {
                    Some(Token::Close) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    _ => Err(syntax("Unbalanced parentheses in query")),
                }
            }
            Token::Close => Err(syntax("Unbalanced parentheses in query")),
            Token::Op(op) => Err(syntax(format!(
                "Operator {} without a left-hand term",
                op.name()
            ))),
            Token::Atom { text, field } => {
                let (text, prefix) = match text.strip_suffix('*') {
                    Some(stem) => (stem.to_string(), true),
                    None => (text, false),
                };
                if text.trim().is_empty() {
                    return Err(syntax("Empty search term"));
                }
                Ok(Query::Term { text, field, prefix })
            }
        }
    }
}

impl Query {
    /// Force every term onto `field`
    pub fn restrict_to(&mut self, field: &str) {
        match self {
            Query::Term { field: f, .. } => *f = Some(field.trim().to_lowercase()),
            Query::And(l, r) | Query::Or(l, r) | Query::Not(l, r) => {
                l.restrict_to(field);
                r.restrict_to(field);
            }
        }
    }

    pub fn matches(&self, doc: &DocumentRecord) -> bool {
        match self {
            Query::Term { text, field, prefix } => term_matches(doc, text, field.as_deref(), *prefix),
            Query::And(l, r) => l.matches(doc) && r.matches(doc),
            Query::Or(l, r) => l.matches(doc) || r.matches(doc),
            Query::Not(l, r) => l.matches(doc) && !r.matches(doc),
        }
    }

    fn is_group(&self) -> bool {
        !matches!(self, Query::Term { .. })
    }
}

/// Document fields searched for a field tag
fn field_names(tag: &str) -> Vec<&str> {
    match tag {
        "ti" | "title" => vec!["title"],
        "ab" | "abstract" => vec!["abstract"],
        "tiab" | "title/abstract" => vec!["title", "abstract"],
        "au" | "author" | "authors" => vec!["authors"],
        "mh" | "mesh" | "mesh terms" => vec!["mesh_heading_list"],
        "majr" | "mesh major topic" => vec!["mesh_major_heading_list"],
        "pt" | "publication type" => vec!["publication_type"],
        "uid" | "pmid" => vec!["id"],
        "dp" | "pdat" | "date - publication" => vec!["date"],
        other => vec![other],
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Contiguous word match, with the last word compared as a prefix when asked
fn term_matches(doc: &DocumentRecord, text: &str, field: Option<&str>, prefix: bool) -> bool {
    let needle = words(text);
    if needle.is_empty() {
        return false;
    }

    let values: Vec<&str> = match field {
        Some(tag) => field_names(tag)
            .into_iter()
            .filter_map(|name| doc.get(name))
            .flat_map(|value| value.scalars())
            .collect(),
        None => doc.values().flat_map(|value| value.scalars()).collect(),
    };

    values.into_iter().any(|value| {
        let hay = words(value);
        hay.windows(needle.len()).any(|window| {
            let last = needle.len() - 1;
            window.iter().zip(&needle).enumerate().all(|(i, (h, n))| {
                if prefix && i == last {
                    h.starts_with(n.as_str())
                } else {
                    h == n
                }
            })
        })
    })
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term { text, field, prefix } => {
                let star = if *prefix { "*" } else { "" };
                if needs_quotes(text) {
                    write!(f, "\"{}{}\"", text, star)?;
                } else {
                    write!(f, "{}{}", text, star)?;
                }
                write!(f, "[{}]", field.as_deref().unwrap_or(ALL_FIELDS))
            }
            Query::And(l, r) => write_binary(f, l, "AND", r),
            Query::Or(l, r) => write_binary(f, l, "OR", r),
            Query::Not(l, r) => write_binary(f, l, "NOT", r),
        }
    }
}

/// Terms that would not tokenize back to a single atom when written bare
fn needs_quotes(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']'))
        || Op::keyword(text).is_some()
}

fn write_binary(f: &mut fmt::Formatter<'_>, left: &Query, op: &str, right: &Query) -> fmt::Result {
    for (i, side) in [left, right].into_iter().enumerate() {
        if i == 1 {
            write!(f, " {} ", op)?;
        }
        if side.is_group() {
            write!(f, "({})", side)?;
        } else {
            write!(f, "{}", side)?;
        }
    }
    Ok(())
}
