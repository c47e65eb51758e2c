// SPDX-License-Identifier: PMPL-1.0-or-later

//! Canonical `.po` serialization.

use crate::po::escape::escape;
use crate::types::{Entry, PoFile};

/// Serialize a file in canonical form.
pub fn write(file: &PoFile) -> String {
    let mut blocks = Vec::with_capacity(file.entries.len() + 1);
    if let Some(header) = &file.header {
        blocks.push(write_entry(&header.entry));
    }
    for entry in &file.entries {
        blocks.push(write_entry(entry));
    }
    let mut out = blocks.join("\n");
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Serialize one entry, including its comments, with a trailing newline.
pub fn write_entry(entry: &Entry) -> String {
    let mut lines = Vec::new();

    for comment in &entry.translator_comments {
        lines.push(comment_line("#", comment));
    }
    for comment in &entry.extracted_comments {
        lines.push(comment_line("#.", comment));
    }
    for location in &entry.locations {
        lines.push(format!("#: {}", location));
    }
    if !entry.flags.is_empty() {
        lines.push(format!("#, {}", entry.flags.join(", ")));
    }
    let previous_marker = if entry.obsolete { "#~|" } else { "#|" };
    for previous in &entry.previous {
        lines.push(comment_line(previous_marker, previous));
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(ctx) = &entry.msgctxt {
        push_string(&mut lines, prefix, "msgctxt", ctx);
    }
    push_string(&mut lines, prefix, "msgid", &entry.msgid);
    if let Some(plural) = &entry.msgid_plural {
        push_string(&mut lines, prefix, "msgid_plural", plural);
        for (i, msgstr) in entry.msgstr.iter().enumerate() {
            push_string(&mut lines, prefix, &format!("msgstr[{}]", i), msgstr);
        }
    } else {
        let msgstr = entry.msgstr.first().map(String::as_str).unwrap_or("");
        push_string(&mut lines, prefix, "msgstr", msgstr);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn comment_line(marker: &str, text: &str) -> String {
    if text.is_empty() {
        marker.to_string()
    } else {
        format!("{} {}", marker, text)
    }
}

/// Strings with a newline before their end are split after each `\n`.
fn push_string(lines: &mut Vec<String>, prefix: &str, keyword: &str, value: &str) {
    let segments: Vec<&str> = value.split_inclusive('\n').collect();
    if segments.len() <= 1 {
        lines.push(format!("{}{} \"{}\"", prefix, keyword, escape(value)));
        return;
    }
    lines.push(format!("{}{} \"\"", prefix, keyword));
    for segment in segments {
        lines.push(format!("{}\"{}\"", prefix, escape(segment)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::po::parse;

    #[test]
    fn writes_plural_and_context() {
        let mut entry = Entry::new("%(count)s page changed", "%(count)s sida ändrad");
        entry.msgctxt = Some("wiki".to_string());
        entry.msgid_plural = Some("%(count)s pages changed".to_string());
        entry.msgstr.push("%(count)s sidor ändrade".to_string());
        entry.flags.push("python-format".to_string());
        let text = write_entry(&entry);
        assert_eq!(
            text,
            "#, python-format\n\
             msgctxt \"wiki\"\n\
             msgid \"%(count)s page changed\"\n\
             msgid_plural \"%(count)s pages changed\"\n\
             msgstr[0] \"%(count)s sida ändrad\"\n\
             msgstr[1] \"%(count)s sidor ändrade\"\n"
        );
    }

    #[test]
    fn splits_embedded_newlines() {
        let entry = Entry::new("first\nsecond", "första\nandra");
        let text = write_entry(&entry);
        assert_eq!(
            text,
            "msgid \"\"\n\"first\\n\"\n\"second\"\nmsgstr \"\"\n\"första\\n\"\n\"andra\"\n"
        );
    }

    #[test]
    fn canonical_text_round_trips_exactly() {
        let text = "# Swedish\n\
                    msgid \"\"\n\
                    msgstr \"\"\n\
                    \"Language: sv\\n\"\n\
                    \"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n\
                    \n\
                    #: login.html:3\n\
                    #, python-format\n\
                    msgid \"Welcome, %s\"\n\
                    msgstr \"Välkommen, %s\"\n\
                    \n\
                    #~ msgid \"Old\"\n\
                    #~ msgstr \"Gammal\"\n";
        let parsed = parse(text).unwrap();
        assert_eq!(write(&parsed), text);
    }
}
