//! INI text parsing
//!
//! Converts raw text into a flat [`Store`]. Lines are classified by their
//! leading character:
//! - `\t...` - continuation of the previously assigned value
//! - `; ...` or `/ ...` - comment
//! - `[name]` - section header
//! - `key = value` - assignment under the current section

use crate::error::{Error, Result};
use crate::store::{composite_key, Store};

/// Lead character marking a continuation line
const CONTINUATION_MARKER: char = '\t';

/// Line-break handling used to split input and join continuation lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineBreak {
    /// Split on `\n` and drop one trailing `\r` per line; join with `\n`
    #[default]
    Auto,
    /// Split and join on `\n` only
    Lf,
    /// Split and join on `\r\n`
    CrLf,
}

impl LineBreak {
    /// Sequence used to join continuation lines onto a value
    pub fn separator(&self) -> &'static str {
        match self {
            LineBreak::Auto | LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }

    /// Split raw text into lines
    fn lines<'a>(&self, raw: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let strip_cr = *self == LineBreak::Auto;
        raw.split(self.separator()).map(move |line| {
            if strip_cr {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
    }
}

/// Options controlling how text is parsed
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// How lines are split and continuation lines joined
    pub line_break: LineBreak,
}

impl ParseOptions {
    /// Options using the given line-break handling
    pub fn with_line_break(line_break: LineBreak) -> Self {
        Self { line_break }
    }
}

/// A classified, non-blank input line
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Comment,
    Section(&'a str),
    Continuation(&'a str),
    Assignment { key: &'a str, value: &'a str },
}

/// Classify a single non-blank line
///
/// On failure, returns the help text for the malformed-line error.
fn classify(line: &str) -> std::result::Result<Line<'_>, &'static str> {
    if line.starts_with(CONTINUATION_MARKER) {
        return Ok(Line::Continuation(line));
    }

    let content = line.trim_start();
    match content.chars().next() {
        Some(';') | Some('/') => Ok(Line::Comment),
        Some('[') => match content[1..].find(']') {
            Some(end) => Ok(Line::Section(&content[1..end + 1])),
            None => Err("Close the section header with ']'"),
        },
        _ => match content.split_once('=') {
            Some((key, value)) => Ok(Line::Assignment {
                key: key.trim(),
                value: value.trim(),
            }),
            None => Err("Expected 'key = value', a '[section]' header, or a comment"),
        },
    }
}

/// Parse INI text into a store
///
/// Fails with a malformed-line error on the first line that cannot be
/// classified; no partial store is returned.
pub fn parse(raw: &str, options: &ParseOptions) -> Result<Store> {
    let separator = options.line_break.separator();
    let mut store = Store::default();
    let mut section = String::new();
    let mut prev_key: Option<String> = None;
    let mut section_count = 0usize;

    for (index, line) in options.line_break.lines(raw).enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let line_no = index + 1;
        let classified =
            classify(line).map_err(|help| Error::malformed_line(line_no, line, help))?;

        match classified {
            Line::Comment => {}
            Line::Section(name) => {
                section = name.to_string();
                section_count += 1;
            }
            Line::Continuation(text) => {
                let appended = prev_key
                    .as_deref()
                    .is_some_and(|key| store.append(key, separator, text));
                if !appended {
                    return Err(Error::malformed_line(
                        line_no,
                        line,
                        "A tab-indented continuation line must follow a 'key = value' line",
                    ));
                }
            }
            Line::Assignment { key, value } => {
                let full_key = composite_key(&section, key);
                log::trace!("Assigned '{}' at line {}", full_key, line_no);
                store.assign(full_key.clone(), value.to_string());
                prev_key = Some(full_key);
            }
        }
    }

    log::debug!(
        "Parsed {} entries from {} section headers",
        store.len(),
        section_count
    );

    Ok(store)
}
