// SPDX-License-Identifier: PMPL-1.0-or-later

//! Header entry metadata (`msgid ""`).

use crate::plural::{PluralError, PluralForms};
use crate::types::{Entry, Header};

/// Fields every shipped locale catalog must carry.
pub const REQUIRED_FIELDS: &[&str] = &["Content-Type", "Language", "Plural-Forms"];

impl Header {
    /// Build a header from the raw header entry, parsing its `Name: Value` lines.
    pub fn from_entry(entry: Entry) -> Self {
        let raw = entry.msgstr.first().map(String::as_str).unwrap_or("");
        let fields = parse_fields(raw);
        Header { entry, fields }
    }

    /// Case-insensitive field lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace or append a field, keeping the raw msgstr in sync.
    pub fn set(&mut self, name: &str, value: &str) {
        match self
            .fields
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(field) => field.1 = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
        let raw: String = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}: {}\n", k, v))
            .collect();
        self.entry.msgstr = vec![raw];
    }

    /// Point `Content-Type` at `charset`, keeping its other parameters.
    pub fn set_charset(&mut self, charset: &str) {
        let content_type = match self.get("Content-Type") {
            Some(value) if charset_from_content_type(value).is_some() => value
                .split(';')
                .map(|part| match part.trim().split_once('=') {
                    Some((k, _)) if k.trim().eq_ignore_ascii_case("charset") => {
                        format!("charset={}", charset)
                    }
                    _ => part.trim().to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            Some(value) if !value.is_empty() => format!("{}; charset={}", value, charset),
            _ => format!("text/plain; charset={}", charset),
        };
        self.set("Content-Type", &content_type);
    }

    pub fn language(&self) -> Option<&str> {
        self.get("Language").filter(|v| !v.is_empty())
    }

    /// Charset named in `Content-Type`, e.g. `UTF-8`.
    pub fn charset(&self) -> Option<&str> {
        charset_from_content_type(self.get("Content-Type")?)
    }

    /// Parsed `Plural-Forms`; `None` when the field is absent.
    pub fn plural_forms(&self) -> Option<Result<PluralForms, PluralError>> {
        self.get("Plural-Forms").map(PluralForms::parse)
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|f| self.get(f).map(str::is_empty).unwrap_or(true))
            .collect()
    }
}

fn parse_fields(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

pub(crate) fn charset_from_content_type(value: &str) -> Option<&str> {
    value
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> Header {
        Header::from_entry(Entry::new("", raw))
    }

    #[test]
    fn set_charset_keeps_media_type() {
        let mut h = header("Content-Type: text/plain; charset=ISO-8859-1\nLanguage: de\n");
        h.set_charset("UTF-8");
        assert_eq!(h.get("Content-Type"), Some("text/plain; charset=UTF-8"));
        assert_eq!(h.language(), Some("de"));

        let mut bare = header("Language: de\n");
        bare.set_charset("UTF-8");
        assert_eq!(bare.charset(), Some("UTF-8"));
    }

    #[test]
    fn fields_and_charset() {
        let h = header(
            "Project-Id-Version: python-fedora 0.3\nContent-Type: text/plain; charset=ISO-8859-1\nLanguage: de\n",
        );
        assert_eq!(h.get("project-id-version"), Some("python-fedora 0.3"));
        assert_eq!(h.charset(), Some("ISO-8859-1"));
        assert_eq!(h.language(), Some("de"));
        assert_eq!(h.missing_fields(), vec!["Plural-Forms"]);
    }

    #[test]
    fn set_rebuilds_raw_msgstr() {
        let mut h = header("Language: sv\n");
        h.set("Plural-Forms", "nplurals=2; plural=(n != 1);");
        h.set("language", "sv_SE");
        assert_eq!(
            h.entry.msgstr[0],
            "Language: sv_SE\nPlural-Forms: nplurals=2; plural=(n != 1);\n"
        );
        let forms = h.plural_forms().unwrap().unwrap();
        assert_eq!(forms.nplurals, 2);
    }
}
