// SPDX-License-Identifier: PMPL-1.0-or-later

//! Properties every shipped catalog must hold

use fas_locale::bundled::{self, LOCALES, TEMPLATE};
use fas_locale::lint::{self, checks_placeholders, LintOptions};
use fas_locale::placeholder::PlaceholderSet;
use fas_locale::po;
use fas_locale::types::{MessageKey, Severity};
use std::collections::HashSet;
use std::path::PathBuf;

#[test]
fn welcome_in_swedish() {
    assert_eq!(bundled::t("sv", "Welcome, %s"), "Välkommen, %s");
}

#[test]
fn translations_keep_placeholder_sets() {
    for &(code, text) in LOCALES {
        let file = po::parse(text).unwrap_or_else(|e| panic!("{} does not parse: {}", code, e));
        for entry in file.active_entries().filter(|e| checks_placeholders(e)) {
            let expected = PlaceholderSet::from_text(&entry.msgid).unwrap();
            for msgstr in entry.msgstr.iter().filter(|s| !s.is_empty()) {
                let found = PlaceholderSet::from_text(msgstr)
                    .unwrap_or_else(|e| panic!("{}: {:?}: {}", code, msgstr, e));
                assert_eq!(found, expected, "{}: {:?}", code, entry.msgid);
            }
        }
    }
}

#[test]
fn msgids_are_unique_per_file() {
    let files = LOCALES
        .iter()
        .map(|&(code, text)| (code, text))
        .chain(std::iter::once(("template", TEMPLATE)));
    for (code, text) in files {
        let file = po::parse(text).unwrap();
        let mut seen: HashSet<MessageKey> = HashSet::new();
        for entry in file.active_entries() {
            assert!(seen.insert(entry.key()), "{}: duplicate {}", code, entry.key());
        }
    }
}

#[test]
fn bundled_files_round_trip_byte_for_byte() {
    let files = LOCALES
        .iter()
        .map(|&(code, text)| (code, text))
        .chain(std::iter::once(("template", TEMPLATE)));
    for (code, text) in files {
        let parsed = po::parse(text).unwrap();
        let written = po::write(&parsed);
        assert_eq!(written, text, "{} is not canonical", code);
        assert_eq!(po::parse(&written).unwrap(), parsed);
    }
}

#[test]
fn every_locale_covers_the_template() {
    let template = po::parse(TEMPLATE).unwrap();
    let keys: HashSet<MessageKey> = template.active_entries().map(|e| e.key()).collect();
    for &(code, text) in LOCALES {
        let file = po::parse(text).unwrap();
        let ours: HashSet<MessageKey> = file.active_entries().map(|e| e.key()).collect();
        assert_eq!(ours, keys, "{} drifted from the template", code);
    }
}

#[test]
fn bundled_catalogs_lint_without_errors_or_warnings() {
    let template = po::parse(TEMPLATE).unwrap();
    let options = LintOptions::new().with_template(template.clone());
    for &(code, text) in LOCALES {
        let file = po::parse(text).unwrap();
        let path = PathBuf::from(format!("locales/{}.po", code));
        let report = lint::lint_po(&file, &path, &options);
        let serious: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.severity != Severity::Info)
            .collect();
        assert!(serious.is_empty(), "{}: {:?}", code, serious);
    }

    let report = lint::lint_po(&template, &PathBuf::from("locales/python-fedora.pot"), &options);
    assert!(report.findings.is_empty(), "{:?}", report.findings);
}

#[test]
fn plural_forms_follow_the_language() {
    let library = bundled::library();
    let msgid = "%d wiki change in the past week";
    let plural = "%d wiki changes in the past week";
    for (code, one, many) in [
        ("sv", "%d wikiändring den senaste veckan", "%d wikiändringar den senaste veckan"),
        ("fr", "%d modification du wiki la semaine dernière", "%d modifications du wiki la semaine dernière"),
    ] {
        let translator = library.translator(&code.parse().unwrap());
        assert_eq!(translator.ngettext(msgid, plural, 1), one);
        assert_eq!(translator.ngettext(msgid, plural, 3), many);
    }

    // French uses the singular for zero, Swedish the plural.
    let fr = library.translator(&"fr".parse().unwrap());
    assert_eq!(fr.ngettext(msgid, plural, 0), "%d modification du wiki la semaine dernière");
    let sv = library.translator(&"sv".parse().unwrap());
    assert_eq!(sv.ngettext(msgid, plural, 0), "%d wikiändringar den senaste veckan");
}

#[test]
fn identity_log_messages_render() {
    use fas_locale::placeholder::FormatArgs;

    let library = bundled::library();
    let de = library.translator(&"de_AT".parse().unwrap());
    let text = de
        .format(
            "Error logging in %(user)s: %(error)s",
            &FormatArgs::named([("user", "toshio"), ("error", "timeout")]),
        )
        .unwrap();
    assert_eq!(text, "Fehler beim Anmelden von toshio: timeout");

    let ja = library.translator(&"ja".parse().unwrap());
    let text = ja
        .format(
            "jsonfasprovider, ssl, returned errors from send_request: %s",
            &FormatArgs::positional(["503"]),
        )
        .unwrap();
    assert_eq!(text, "jsonfasprovider, ssl, returned errors from send_request: 503");
}
