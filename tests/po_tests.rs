// SPDX-License-Identifier: PMPL-1.0-or-later

//! Codec behaviour on hand-edited, non-canonical catalogs

use fas_locale::po::{self, ParseError};
use fas_locale::types::Location;
use std::fs;
use tempfile::TempDir;

const HAND_EDITED: &str = "# Swedish translations for python-fedora.\n\
msgid \"\"\n\
msgstr \"\"\n\
\"Content-Type: text/plain; charset=UTF-8\\n\"\n\
\"Language: sv\\n\"\n\
\n\
\n\
#: fedora/tg/templates/genshi/login.html:11 fedora/tg/templates/genshi/login.html:43\n\
#,python-format,   fuzzy\n\
msgid \"Welcome, \"\n\
\"%s\"\n\
msgstr \"Välkommen, \"\n\
   \"%s\"\n\
#~ msgid \"Sign Up\"\n\
#~ msgstr \"Registrera dig\"\n";

#[test]
fn normalizing_is_semantic_round_trip_and_idempotent() {
    let parsed = po::parse(HAND_EDITED).unwrap();
    let entry = &parsed.entries[0];
    assert_eq!(entry.msgid, "Welcome, %s");
    assert_eq!(entry.msgstr, vec!["Välkommen, %s".to_string()]);
    assert_eq!(entry.flags, vec!["python-format", "fuzzy"]);
    assert_eq!(
        entry.locations,
        vec![
            Location::parse("fedora/tg/templates/genshi/login.html:11"),
            Location::parse("fedora/tg/templates/genshi/login.html:43"),
        ]
    );

    let canonical = po::write(&parsed);
    assert_ne!(canonical, HAND_EDITED);
    let reparsed = po::parse(&canonical).unwrap();
    assert_eq!(po::write(&reparsed), canonical);

    // Line numbers move; equality does not look at them.
    assert_ne!(reparsed.entries[0].line, parsed.entries[0].line);
    assert_eq!(reparsed, parsed);
}

#[test]
fn canonical_layout() {
    let canonical = po::write(&po::parse(HAND_EDITED).unwrap());
    assert!(canonical.contains(
        "#: fedora/tg/templates/genshi/login.html:11\n#: fedora/tg/templates/genshi/login.html:43\n#, python-format, fuzzy\n"
    ));
    assert!(canonical.contains("msgid \"Welcome, %s\"\nmsgstr \"Välkommen, %s\"\n"));
    assert!(canonical.ends_with("#~ msgid \"Sign Up\"\n#~ msgstr \"Registrera dig\"\n"));
    assert!(!canonical.contains("\n\n\n"));
}

#[test]
fn read_file_strips_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sv.po");
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice("msgid \"Logout\"\nmsgstr \"Logga ut\"\n".as_bytes());
    fs::write(&path, bytes).unwrap();

    let file = po::read_file(&path).unwrap();
    assert!(file.header.is_none());
    assert_eq!(file.entries[0].msgstr[0], "Logga ut");
}

#[test]
fn parse_errors_carry_line_numbers() {
    let err = po::parse("msgid \"Login\"\nmsgstr \"Logga in\"\n\nmsgid \"Logout\"\nmsgstr \"Logga \\q\"\n")
        .unwrap_err();
    assert_eq!(err.line(), 5);
}

#[test]
fn indexed_msgstr_without_plural_is_rejected() {
    let err = po::parse("msgid \"Logout\"\nmsgstr[0] \"Logga ut\"\nmsgstr[1] \"Logga ut nu\"\n")
        .unwrap_err();
    assert!(matches!(err, ParseError::PluralMismatch { line: 2, .. }));
}

#[test]
fn every_plural_form_survives_a_rewrite() {
    let text = "msgid \"%d wiki change in the past week\"\n\
                msgid_plural \"%d wiki changes in the past week\"\n\
                msgstr[0] \"%d wikiändring den senaste veckan\"\n\
                msgstr[1] \"%d wikiändringar den senaste veckan\"\n";
    let parsed = po::parse(text).unwrap();
    let reparsed = po::parse(&po::write(&parsed)).unwrap();
    assert_eq!(reparsed, parsed);
    assert_eq!(reparsed.entries[0].msgstr.len(), 2);
}

#[test]
fn adjacent_literals_normalize_to_one() {
    let parsed = po::parse("msgid \"Most active \" \"wiki users\"\nmsgstr \"Mest aktiva wikianvändare\"\n").unwrap();
    assert_eq!(parsed.entries[0].msgid, "Most active wiki users");
    assert_eq!(
        po::write(&parsed),
        "msgid \"Most active wiki users\"\nmsgstr \"Mest aktiva wikianvändare\"\n"
    );
}

#[test]
fn normalize_file_strips_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sv.po");
    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice("msgid \"Logout\"\nmsgstr \"Logga ut\"\n".as_bytes());
    fs::write(&path, bytes).unwrap();

    let normalized = po::normalize_file(&path).unwrap();
    assert!(!normalized.is_canonical());
    assert_eq!(normalized.canonical, "msgid \"Logout\"\nmsgstr \"Logga ut\"\n");
}

#[test]
fn normalize_file_reencodes_latin1_as_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("de.po");
    let mut bytes = b"msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\"Language: de\\n\"\n\nmsgid \"Password:\"\nmsgstr \"Passw".to_vec();
    bytes.push(0xf6);
    bytes.extend_from_slice(b"rter:\"\n");
    fs::write(&path, bytes).unwrap();

    let normalized = po::normalize_file(&path).unwrap();
    assert!(!normalized.is_canonical());
    assert!(normalized
        .canonical
        .contains("\"Content-Type: text/plain; charset=UTF-8\\n\""));
    assert!(normalized.canonical.contains("msgstr \"Passwörter:\""));

    fs::write(&path, &normalized.canonical).unwrap();
    assert!(po::normalize_file(&path).unwrap().is_canonical());
}

#[test]
fn normalize_file_accepts_canonical_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sv.po");
    fs::write(&path, "msgid \"Login\"\nmsgstr \"Logga in\"\n").unwrap();
    assert!(po::normalize_file(&path).unwrap().is_canonical());
}
