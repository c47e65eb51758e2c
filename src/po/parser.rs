// SPDX-License-Identifier: PMPL-1.0-or-later

//! Line-oriented `.po` parser.
//!
//! An entry is complete when the next comment or `msgctxt`/`msgid` keyword
//! starts after it has a `msgstr`, or at end of input. Blank lines carry no
//! meaning.

use crate::po::escape::unescape;
use crate::types::{Entry, Header, Location, PoFile};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
    #[error("line {line}: invalid escape sequence '\\{found}'")]
    InvalidEscape { line: usize, found: char },
    #[error("line {line}: unexpected content: {text}")]
    UnexpectedLine { line: usize, text: String },
    #[error("line {line}: {keyword} without a preceding msgid")]
    MissingMsgid { line: usize, keyword: &'static str },
    #[error("line {line}: entry has no msgstr")]
    MissingMsgstr { line: usize },
    #[error("line {line}: plural index out of order or invalid: {text}")]
    InvalidPluralIndex { line: usize, text: String },
    #[error("line {line}: string continuation without a keyword")]
    DanglingString { line: usize },
    #[error("line {line}: {keyword} does not match the entry's msgid_plural")]
    PluralMismatch { line: usize, keyword: &'static str },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedString { line }
            | ParseError::InvalidEscape { line, .. }
            | ParseError::UnexpectedLine { line, .. }
            | ParseError::MissingMsgid { line, .. }
            | ParseError::MissingMsgstr { line }
            | ParseError::InvalidPluralIndex { line, .. }
            | ParseError::DanglingString { line }
            | ParseError::PluralMismatch { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Default)]
struct Builder {
    entry: Entry,
    has_msgid: bool,
    has_content: bool,
}

impl Builder {
    fn is_empty(&self) -> bool {
        !self.has_content
    }
}

struct Parser {
    file: PoFile,
    current: Builder,
    field: Field,
}

/// Parse the contents of a `.po`/`.pot` file.
pub fn parse(input: &str) -> Result<PoFile, ParseError> {
    let mut parser = Parser {
        file: PoFile::default(),
        current: Builder::default(),
        field: Field::None,
    };

    for (idx, raw) in input.lines().enumerate() {
        parser.line(idx + 1, raw)?;
    }
    parser.finish_entry(input.lines().count())?;
    Ok(parser.file)
}

impl Parser {
    fn line(&mut self, line_no: usize, raw: &str) -> Result<(), ParseError> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if let Some(previous) = rest.strip_prefix('|') {
                self.comment_boundary(line_no)?;
                self.current.entry.obsolete = true;
                self.current.entry.previous.push(strip_one_space(previous).to_string());
                self.current.has_content = true;
                return Ok(());
            }
            if rest.is_empty() {
                return Ok(());
            }
            if !rest.starts_with('"') {
                self.keyword_boundary(line_no, rest)?;
            }
            self.current.entry.obsolete = true;
            return self.keyword_or_string(line_no, rest);
        }

        if let Some(rest) = line.strip_prefix('#') {
            self.comment_boundary(line_no)?;
            let entry = &mut self.current.entry;
            if let Some(refs) = rest.strip_prefix(':') {
                entry
                    .locations
                    .extend(refs.split_whitespace().map(Location::parse));
            } else if let Some(flags) = rest.strip_prefix(',') {
                entry.flags.extend(
                    flags
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                );
            } else if let Some(text) = rest.strip_prefix('.') {
                entry.extracted_comments.push(strip_one_space(text).to_string());
            } else if let Some(text) = rest.strip_prefix('|') {
                entry.previous.push(strip_one_space(text).to_string());
            } else {
                entry.translator_comments.push(strip_one_space(rest).to_string());
            }
            self.current.has_content = true;
            return Ok(());
        }

        if !line.starts_with('"') {
            self.keyword_boundary(line_no, line)?;
        }
        self.keyword_or_string(line_no, line)
    }

    /// A comment after a complete entry starts the next one.
    fn comment_boundary(&mut self, line_no: usize) -> Result<(), ParseError> {
        if self.current.has_msgid {
            self.finish_entry(line_no)?;
        }
        Ok(())
    }

    /// `msgctxt`/`msgid` after a complete entry starts the next one.
    fn keyword_boundary(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let starts_entry = line.starts_with("msgctxt")
            || (line.starts_with("msgid") && !line.starts_with("msgid_plural"));
        if starts_entry && self.current.has_msgid {
            self.finish_entry(line_no)?;
        }
        Ok(())
    }

    fn keyword_or_string(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if line.starts_with('"') {
            let value = parse_literal(line, line_no)?;
            return self.append(line_no, &value);
        }

        let (keyword, rest) = split_keyword(line).ok_or_else(|| ParseError::UnexpectedLine {
            line: line_no,
            text: line.to_string(),
        })?;
        let value = parse_literal(rest, line_no)?;
        let entry = &mut self.current.entry;

        match keyword {
            "msgctxt" => {
                entry.line = line_no;
                entry.msgctxt = Some(value);
                self.field = Field::Context;
            }
            "msgid" => {
                if entry.msgctxt.is_none() {
                    entry.line = line_no;
                }
                entry.msgid = value;
                self.current.has_msgid = true;
                self.field = Field::Id;
            }
            "msgid_plural" => {
                if !self.current.has_msgid {
                    return Err(ParseError::MissingMsgid {
                        line: line_no,
                        keyword: "msgid_plural",
                    });
                }
                entry.msgid_plural = Some(value);
                self.field = Field::IdPlural;
            }
            "msgstr" => {
                if !self.current.has_msgid {
                    return Err(ParseError::MissingMsgid {
                        line: line_no,
                        keyword: "msgstr",
                    });
                }
                if !entry.msgstr.is_empty() {
                    return Err(ParseError::UnexpectedLine {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                if entry.msgid_plural.is_some() {
                    return Err(ParseError::PluralMismatch {
                        line: line_no,
                        keyword: "msgstr",
                    });
                }
                entry.msgstr.push(value);
                self.field = Field::Str(0);
            }
            indexed => {
                let index = plural_index(indexed).ok_or_else(|| ParseError::UnexpectedLine {
                    line: line_no,
                    text: line.to_string(),
                })?;
                if !self.current.has_msgid {
                    return Err(ParseError::MissingMsgid {
                        line: line_no,
                        keyword: "msgstr",
                    });
                }
                if entry.msgid_plural.is_none() {
                    return Err(ParseError::PluralMismatch {
                        line: line_no,
                        keyword: "msgstr[N]",
                    });
                }
                if index != entry.msgstr.len() {
                    return Err(ParseError::InvalidPluralIndex {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                entry.msgstr.push(value);
                self.field = Field::Str(index);
            }
        }
        self.current.has_content = true;
        Ok(())
    }

    fn append(&mut self, line_no: usize, value: &str) -> Result<(), ParseError> {
        let entry = &mut self.current.entry;
        let target = match self.field {
            Field::None => return Err(ParseError::DanglingString { line: line_no }),
            Field::Context => entry.msgctxt.get_or_insert_with(String::new),
            Field::Id => &mut entry.msgid,
            Field::IdPlural => entry.msgid_plural.get_or_insert_with(String::new),
            Field::Str(i) => match entry.msgstr.get_mut(i) {
                Some(s) => s,
                None => return Err(ParseError::DanglingString { line: line_no }),
            },
        };
        target.push_str(value);
        Ok(())
    }

    fn finish_entry(&mut self, line_no: usize) -> Result<(), ParseError> {
        let builder = std::mem::take(&mut self.current);
        self.field = Field::None;
        if builder.is_empty() {
            return Ok(());
        }
        if !builder.has_msgid {
            // Trailing comments with no entry are dropped.
            if builder.entry.msgctxt.is_some() {
                return Err(ParseError::MissingMsgid {
                    line: builder.entry.line,
                    keyword: "msgctxt",
                });
            }
            return Ok(());
        }
        let entry = builder.entry;
        if entry.msgstr.is_empty() {
            return Err(ParseError::MissingMsgstr {
                line: if entry.line > 0 { entry.line } else { line_no },
            });
        }

        let is_header = entry.msgid.is_empty()
            && entry.msgctxt.is_none()
            && !entry.obsolete
            && self.file.header.is_none()
            && self.file.entries.is_empty();
        if is_header {
            self.file.header = Some(Header::from_entry(entry));
        } else {
            self.file.entries.push(entry);
        }
        Ok(())
    }
}

fn strip_one_space(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

fn split_keyword(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c: char| c.is_whitespace() || c == '"')?;
    let keyword = &line[..end];
    match keyword {
        "msgctxt" | "msgid" | "msgid_plural" | "msgstr" => Some((keyword, &line[end..])),
        k if plural_index(k).is_some() => Some((keyword, &line[end..])),
        _ => None,
    }
}

fn plural_index(keyword: &str) -> Option<usize> {
    keyword
        .strip_prefix("msgstr[")?
        .strip_suffix(']')?
        .parse::<usize>()
        .ok()
}

/// Parse the quoted literals of one line, concatenated. Adjacent literals
/// (`"a" "b"`) may be separated by whitespace only.
fn parse_literal(text: &str, line: usize) -> Result<String, ParseError> {
    let text = text.trim();
    let unexpected = || ParseError::UnexpectedLine {
        line,
        text: text.to_string(),
    };
    if !text.starts_with('"') {
        return Err(if text.is_empty() {
            ParseError::UnterminatedString { line }
        } else {
            unexpected()
        });
    }

    let mut value = String::new();
    let mut rest = text;
    while let Some(after_quote) = rest.strip_prefix('"') {
        let end = closing_quote(after_quote).ok_or(ParseError::UnterminatedString { line })?;
        let body = &after_quote[..end];
        value.push_str(&unescape(body).map_err(|found| ParseError::InvalidEscape { line, found })?);
        rest = after_quote[end + 1..].trim_start();
    }
    if !rest.is_empty() {
        return Err(unexpected());
    }
    Ok(value)
}

/// Byte offset of the first unescaped `"`.
fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match (escaped, c) {
            (false, '\\') => escaped = true,
            (false, '"') => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_entries() {
        let content = r#"
msgid "Login"
msgstr "Logga in"

msgid "Logout"
msgstr "Logga ut"
"#;
        let file = parse(content).unwrap();
        assert!(file.header.is_none());
        assert_eq!(file.entries.len(), 2);
        assert_eq!(file.entries[0].msgid, "Login");
        assert_eq!(file.entries[0].msgstr, vec!["Logga in"]);
        assert_eq!(file.entries[0].line, 2);
        assert_eq!(file.entries[1].line, 5);
    }

    #[test]
    fn parse_header_and_comments() {
        let content = r#"# Swedish translations.
msgid ""
msgstr ""
"Language: sv\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#. shown on the login form
#: fedora/tg/templates/login.html:12
#: fedora/tg/templates/login.html:40
#, python-format
msgid "Welcome, %s"
msgstr "Välkommen, %s"
"#;
        let file = parse(content).unwrap();
        let header = file.header.as_ref().unwrap();
        assert_eq!(header.entry.translator_comments, vec!["Swedish translations."]);
        assert_eq!(header.get("language"), Some("sv"));
        let entry = &file.entries[0];
        assert_eq!(entry.extracted_comments, vec!["shown on the login form"]);
        assert_eq!(entry.locations.len(), 2);
        assert_eq!(entry.locations[1].line, Some(40));
        assert_eq!(entry.flags, vec!["python-format"]);
        assert_eq!(entry.msgstr[0], "Välkommen, %s");
    }

    #[test]
    fn parse_multiline_and_plural() {
        let content = r#"msgctxt "wiki"
msgid ""
"%(count)s page "
"changed"
msgid_plural "%(count)s pages changed"
msgstr[0] "%(count)s sida ändrad"
msgstr[1] "%(count)s sidor ändrade"
"#;
        let file = parse(content).unwrap();
        let entry = &file.entries[0];
        assert_eq!(entry.msgctxt.as_deref(), Some("wiki"));
        assert_eq!(entry.msgid, "%(count)s page changed");
        assert_eq!(entry.line, 1);
        assert_eq!(entry.msgstr.len(), 2);
    }

    #[test]
    fn parse_obsolete_entry() {
        let content = "#~ msgid \"Old\"\n#~ msgstr \"Gammal\"\n";
        let file = parse(content).unwrap();
        assert!(file.entries[0].obsolete);
        assert_eq!(file.entries[0].msgstr[0], "Gammal");
    }

    #[test]
    fn error_missing_msgstr() {
        let err = parse("msgid \"a\"\n\nmsgid \"b\"\nmsgstr \"B\"\n").unwrap_err();
        assert_eq!(err, ParseError::MissingMsgstr { line: 1 });
    }

    #[test]
    fn error_unterminated_and_escape() {
        assert_eq!(
            parse("msgid \"open\n").unwrap_err(),
            ParseError::UnterminatedString { line: 1 }
        );
        assert_eq!(
            parse("msgid \"a\\qb\"\nmsgstr \"\"\n").unwrap_err(),
            ParseError::InvalidEscape { line: 1, found: 'q' }
        );
    }

    #[test]
    fn error_plural_index_out_of_order() {
        let err = parse("msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[1] \"x\"\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidPluralIndex { line: 3, .. }));
    }

    #[test]
    fn adjacent_literals_concatenate() {
        let file = parse("msgid \"Forgot \" \"Password?\"\nmsgstr \"Glömt \"\"lösenord?\"\n").unwrap();
        assert_eq!(file.entries[0].msgid, "Forgot Password?");
        assert_eq!(file.entries[0].msgstr[0], "Glömt lösenord?");

        assert!(matches!(
            parse("msgid \"a\" junk\nmsgstr \"\"\n").unwrap_err(),
            ParseError::UnexpectedLine { line: 1, .. }
        ));
        assert_eq!(
            parse("msgid \"a\" \"b\nmsgstr \"\"\n").unwrap_err(),
            ParseError::UnterminatedString { line: 1 }
        );
    }

    #[test]
    fn indexed_msgstr_requires_msgid_plural() {
        assert_eq!(
            parse("msgid \"a\"\nmsgstr[0] \"x\"\nmsgstr[1] \"y\"\n").unwrap_err(),
            ParseError::PluralMismatch {
                line: 2,
                keyword: "msgstr[N]"
            }
        );
        assert_eq!(
            parse("msgid \"a\"\nmsgid_plural \"as\"\nmsgstr \"x\"\n").unwrap_err(),
            ParseError::PluralMismatch {
                line: 3,
                keyword: "msgstr"
            }
        );
    }

    #[test]
    fn error_dangling_and_unknown_keyword() {
        assert_eq!(
            parse("\"floating\"\n").unwrap_err(),
            ParseError::DanglingString { line: 1 }
        );
        assert!(matches!(
            parse("msgfoo \"x\"\n").unwrap_err(),
            ParseError::UnexpectedLine { line: 1, .. }
        ));
        assert_eq!(
            parse("msgstr \"x\"\n").unwrap_err(),
            ParseError::MissingMsgid {
                line: 1,
                keyword: "msgstr"
            }
        );
    }
}
