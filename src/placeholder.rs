// SPDX-License-Identifier: PMPL-1.0-or-later

//! Python-format placeholders: extraction, comparison and rendering
//!
//! A placeholder is `%[(name)][flags][width][.precision][length]conversion`.
//! `%%` is a literal percent sign. Any other `%` is malformed, which is what
//! makes a translation blow up at render time.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^%(?:\((?P<name>[^)]*)\))?(?P<flags>[#0\- +]*)(?P<width>\*|\d+)?(?:\.(?P<precision>\*|\d+))?[hlL]?(?P<conv>[diouxXeEfFgGcrsa%])",
        )
        .expect("placeholder regex is valid")
    })
}

/// Width or precision component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// `*`: taken from the next positional argument.
    Star,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the `%`.
    pub offset: usize,
    /// Full source text, e.g. `%(user)s`.
    pub text: String,
    pub name: Option<String>,
    pub flags: String,
    pub width: Option<Count>,
    pub precision: Option<Count>,
    pub conversion: char,
}

impl Placeholder {
    /// Conversions that accept the same arguments compare equal.
    pub fn kind(&self) -> char {
        match self.conversion {
            'i' | 'u' => 'd',
            'F' => 'f',
            c => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Placeholder(Placeholder),
}

/// Result of scanning a string for placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pieces: Vec<Piece>,
    /// Byte offsets of `%` signs that start no valid placeholder.
    pub malformed: Vec<usize>,
}

impl Scan {
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Placeholder(ph) => Some(ph),
            Piece::Literal(_) => None,
        })
    }
}

/// Split `text` into literal runs and placeholders.
pub fn scan(text: &str) -> Scan {
    let mut scan = Scan::default();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(rel) = text[pos..].find('%') {
        let start = pos + rel;
        literal.push_str(&text[pos..start]);
        match placeholder_regex().captures(&text[start..]) {
            Some(caps) => {
                let whole = caps.get(0).map(|m| m.as_str()).unwrap_or("%");
                let conversion = caps
                    .name("conv")
                    .and_then(|m| m.as_str().chars().next())
                    .unwrap_or('s');
                if conversion == '%' && whole == "%%" {
                    literal.push('%');
                } else {
                    if !literal.is_empty() {
                        scan.pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    scan.pieces.push(Piece::Placeholder(Placeholder {
                        offset: start,
                        text: whole.to_string(),
                        name: caps.name("name").map(|m| m.as_str().to_string()),
                        flags: caps
                            .name("flags")
                            .map(|m| m.as_str().to_string())
                            .unwrap_or_default(),
                        width: caps.name("width").map(|m| parse_count(m.as_str())),
                        precision: caps.name("precision").map(|m| parse_count(m.as_str())),
                        conversion,
                    }));
                }
                pos = start + whole.len();
            }
            None => {
                scan.malformed.push(start);
                literal.push('%');
                pos = start + 1;
            }
        }
    }
    literal.push_str(&text[pos..]);
    if !literal.is_empty() {
        scan.pieces.push(Piece::Literal(literal));
    }
    scan
}

fn parse_count(raw: &str) -> Count {
    if raw == "*" {
        Count::Star
    } else {
        raw.parse().map(Count::Fixed).unwrap_or(Count::Star)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    #[error("malformed placeholder at offset {0}")]
    Malformed(usize),
    #[error("positional and named placeholders are mixed")]
    Mixed,
    #[error("placeholder %({0}) is used with different conversions")]
    Conflict(String),
}

/// The placeholders a string expects its arguments to fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderSet {
    /// Conversion kinds in order; `*` widths count as a `d` argument.
    pub positional: Vec<char>,
    pub named: BTreeMap<String, char>,
}

impl PlaceholderSet {
    pub fn from_text(text: &str) -> Result<Self, PlaceholderError> {
        let scanned = scan(text);
        if let Some(&offset) = scanned.malformed.first() {
            return Err(PlaceholderError::Malformed(offset));
        }
        let mut set = PlaceholderSet::default();
        for ph in scanned.placeholders() {
            match &ph.name {
                Some(name) => match set.named.get(name) {
                    Some(&kind) if kind != ph.kind() => {
                        return Err(PlaceholderError::Conflict(name.clone()))
                    }
                    _ => {
                        set.named.insert(name.clone(), ph.kind());
                    }
                },
                None => {
                    if ph.width == Some(Count::Star) {
                        set.positional.push('d');
                    }
                    if ph.precision == Some(Count::Star) {
                        set.positional.push('d');
                    }
                    set.positional.push(ph.kind());
                }
            }
        }
        if !set.positional.is_empty() && !set.named.is_empty() {
            return Err(PlaceholderError::Mixed);
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Positional placeholders must match in order, named ones as a set.
    pub fn matches(&self, other: &PlaceholderSet) -> bool {
        self == other
    }
}

impl fmt::Display for PlaceholderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let parts: Vec<String> = self
            .positional
            .iter()
            .map(|c| format!("%{}", c))
            .chain(self.named.iter().map(|(n, c)| format!("%({}){}", n, c)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// True when `text` contains at least one placeholder (malformed ones included).
pub fn has_placeholders(text: &str) -> bool {
    let scanned = scan(text);
    scanned.placeholders().next().is_some() || !scanned.malformed.is_empty()
}

// ─── Rendering ──────────────────────────────────────────────────────

/// Arguments for `%` interpolation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormatArgs {
    #[default]
    None,
    Positional(Vec<String>),
    Named(BTreeMap<String, String>),
}

impl FormatArgs {
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FormatArgs::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        FormatArgs::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("malformed placeholder at offset {0}")]
    Malformed(usize),
    #[error("no argument for placeholder {0}")]
    MissingArgument(String),
    #[error("{0} positional argument(s) not converted")]
    UnusedArguments(usize),
    #[error("named and positional arguments cannot be mixed")]
    MixedArguments,
    #[error("placeholder {placeholder} needs a number, got {value:?}")]
    NotANumber { placeholder: String, value: String },
}

/// Render `template` with Python `%` semantics.
pub fn format(template: &str, args: &FormatArgs) -> Result<String, FormatError> {
    let scanned = scan(template);
    if let Some(&offset) = scanned.malformed.first() {
        return Err(FormatError::Malformed(offset));
    }

    let empty = Vec::new();
    let positional = match args {
        FormatArgs::Positional(values) => values,
        _ => &empty,
    };
    let mut next = 0usize;
    let mut take = |text: &str| -> Result<String, FormatError> {
        let value = positional
            .get(next)
            .cloned()
            .ok_or_else(|| FormatError::MissingArgument(text.to_string()))?;
        next += 1;
        Ok(value)
    };

    let mut out = String::with_capacity(template.len());
    for piece in &scanned.pieces {
        let ph = match piece {
            Piece::Literal(text) => {
                out.push_str(text);
                continue;
            }
            Piece::Placeholder(ph) => ph,
        };

        let width = match ph.width {
            Some(Count::Star) => Some(parse_usize(&ph.text, &take(&ph.text)?)?),
            Some(Count::Fixed(w)) => Some(w),
            None => None,
        };
        let precision = match ph.precision {
            Some(Count::Star) => Some(parse_usize(&ph.text, &take(&ph.text)?)?),
            Some(Count::Fixed(p)) => Some(p),
            None => None,
        };

        let value = match (&ph.name, args) {
            (Some(name), FormatArgs::Named(map)) => map
                .get(name)
                .cloned()
                .ok_or_else(|| FormatError::MissingArgument(ph.text.clone()))?,
            (Some(_), FormatArgs::Positional(_)) => return Err(FormatError::MixedArguments),
            (None, FormatArgs::Named(_)) => return Err(FormatError::MixedArguments),
            (_, FormatArgs::None) => return Err(FormatError::MissingArgument(ph.text.clone())),
            (None, FormatArgs::Positional(_)) => take(&ph.text)?,
        };

        let rendered = convert(ph, &value, precision)?;
        out.push_str(&pad(rendered, width, ph));
    }

    if next < positional.len() {
        return Err(FormatError::UnusedArguments(positional.len() - next));
    }
    Ok(out)
}

fn parse_usize(placeholder: &str, value: &str) -> Result<usize, FormatError> {
    value.trim().parse().map_err(|_| FormatError::NotANumber {
        placeholder: placeholder.to_string(),
        value: value.to_string(),
    })
}

fn convert(ph: &Placeholder, value: &str, precision: Option<usize>) -> Result<String, FormatError> {
    let not_a_number = || FormatError::NotANumber {
        placeholder: ph.text.clone(),
        value: value.to_string(),
    };
    let integer = || -> Result<i64, FormatError> {
        let trimmed = value.trim();
        trimmed
            .parse::<i64>()
            .or_else(|_| trimmed.parse::<f64>().map(|f| f.trunc() as i64))
            .map_err(|_| not_a_number())
    };
    let float = || value.trim().parse::<f64>().map_err(|_| not_a_number());
    let sign = |negative: bool| {
        if negative {
            "-"
        } else if ph.flags.contains('+') {
            "+"
        } else if ph.flags.contains(' ') {
            " "
        } else {
            ""
        }
    };

    Ok(match ph.conversion {
        's' | 'r' | 'a' => match precision {
            Some(p) => value.chars().take(p).collect(),
            None => value.to_string(),
        },
        'c' => value.chars().next().map(String::from).unwrap_or_default(),
        'd' | 'i' | 'u' => {
            let v = integer()?;
            format!("{}{}", sign(v < 0), v.unsigned_abs())
        }
        'x' => {
            let v = integer()?;
            let prefix = if ph.flags.contains('#') { "0x" } else { "" };
            format!("{}{}{:x}", sign(v < 0), prefix, v.unsigned_abs())
        }
        'X' => {
            let v = integer()?;
            let prefix = if ph.flags.contains('#') { "0X" } else { "" };
            format!("{}{}{:X}", sign(v < 0), prefix, v.unsigned_abs())
        }
        'o' => {
            let v = integer()?;
            let prefix = if ph.flags.contains('#') { "0o" } else { "" };
            format!("{}{}{:o}", sign(v < 0), prefix, v.unsigned_abs())
        }
        'f' | 'F' => {
            let v = float()?;
            format!("{}{:.*}", sign(v < 0.0), precision.unwrap_or(6), v.abs())
        }
        'e' | 'E' => {
            let v = float()?;
            let text = format!("{:.*e}", precision.unwrap_or(6), v.abs());
            let text = python_exponent(&text);
            let text = if ph.conversion == 'E' {
                text.to_uppercase()
            } else {
                text
            };
            format!("{}{}", sign(v < 0.0), text)
        }
        _ => {
            // g/G: shortest round-trip representation
            let v = float()?;
            format!("{}{}", sign(v < 0.0), v.abs())
        }
    })
}

/// Rust writes `1.5e3`; Python writes `1.5e+03`.
fn python_exponent(text: &str) -> String {
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text.to_string(),
    }
}

fn pad(rendered: String, width: Option<usize>, ph: &Placeholder) -> String {
    let Some(width) = width else {
        return rendered;
    };
    let len = rendered.chars().count();
    if len >= width {
        return rendered;
    }
    let fill = width - len;
    if ph.flags.contains('-') {
        format!("{}{}", rendered, " ".repeat(fill))
    } else if ph.flags.contains('0') && !matches!(ph.conversion, 's' | 'r' | 'a' | 'c') {
        let (sign, digits) = match rendered.chars().next() {
            Some(c @ ('-' | '+' | ' ')) => (c.to_string(), rendered[1..].to_string()),
            _ => (String::new(), rendered),
        };
        format!("{}{}{}", sign, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_positional_named_and_literal_percent() {
        let scanned = scan("100%% of %(user)s and %s, %-5d");
        let texts: Vec<&str> = scanned.placeholders().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["%(user)s", "%s", "%-5d"]);
        assert!(scanned.malformed.is_empty());
    }

    #[test]
    fn scan_reports_malformed_percent() {
        let scanned = scan("50% done");
        // "% d" is a valid placeholder with a space flag, "% o" too; "%!" is not.
        assert!(scanned.malformed.is_empty());
        assert_eq!(scan("odd %! here").malformed, vec![4]);
        assert_eq!(scan("trailing %").malformed, vec![9]);
    }

    #[test]
    fn set_compares_positional_in_order() {
        let a = PlaceholderSet::from_text("%s has %d pages").unwrap();
        let b = PlaceholderSet::from_text("%s har %i sidor").unwrap();
        let c = PlaceholderSet::from_text("%d sidor har %s").unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn set_compares_named_as_set() {
        let a = PlaceholderSet::from_text("Error logging in %(user)s: %(error)s").unwrap();
        let b = PlaceholderSet::from_text("%(error)s: kunde inte logga in %(user)s").unwrap();
        let c = PlaceholderSet::from_text("Fel vid inloggning av %(user)s").unwrap();
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        assert_eq!(a.to_string(), "%(error)s %(user)s");
    }

    #[test]
    fn set_rejects_mixed_and_conflicting() {
        assert_eq!(
            PlaceholderSet::from_text("%s and %(user)s"),
            Err(PlaceholderError::Mixed)
        );
        assert_eq!(
            PlaceholderSet::from_text("%(n)s %(n)d"),
            Err(PlaceholderError::Conflict("n".to_string()))
        );
    }

    #[test]
    fn format_positional_and_named() {
        assert_eq!(
            format("Välkommen, %s", &FormatArgs::positional(["toshio"])).unwrap(),
            "Välkommen, toshio"
        );
        let args = FormatArgs::named([("user", "ricky"), ("error", "timeout")]);
        assert_eq!(
            format("Error logging in %(user)s: %(error)s", &args).unwrap(),
            "Error logging in ricky: timeout"
        );
        assert_eq!(format("100%%", &FormatArgs::None).unwrap(), "100%");
    }

    #[test]
    fn format_width_precision_and_numbers() {
        let args = FormatArgs::positional(["7", "abcdef", "3.14159", "255"]);
        assert_eq!(
            format("[%03d] [%-4.2s] [%.2f] [%#x]", &args).unwrap(),
            "[007] [ab  ] [3.14] [0xff]"
        );
        assert_eq!(
            format("%e", &FormatArgs::positional(["1500"])).unwrap(),
            "1.500000e+03"
        );
    }

    #[test]
    fn format_errors() {
        assert_eq!(
            format("%s %s", &FormatArgs::positional(["one"])),
            Err(FormatError::MissingArgument("%s".to_string()))
        );
        assert_eq!(
            format("%s", &FormatArgs::positional(["one", "two"])),
            Err(FormatError::UnusedArguments(1))
        );
        assert_eq!(
            format("%(user)s", &FormatArgs::positional(["x"])),
            Err(FormatError::MixedArguments)
        );
        assert!(matches!(
            format("%d", &FormatArgs::positional(["many"])),
            Err(FormatError::NotANumber { .. })
        ));
        assert_eq!(
            format("bad %!", &FormatArgs::None),
            Err(FormatError::Malformed(4))
        );
    }
}
