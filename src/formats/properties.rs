//! Support for the Java `.properties` resource format.
//!
//! Implements the classic line-oriented grammar: `key=value`, `key:value`,
//! and whitespace-separated pairs, `#`/`!` comment lines, backslash line
//! continuation, and `\uXXXX` escape decoding.

use crate::{
    error::{Error, ParseErrorKind},
    traits::FormatParser,
    types::ResourceMapping,
};

/// A parsed Java properties file, as an ordered list of raw pairs.
///
/// Duplicate keys are kept here in document order; converting into a
/// [`ResourceMapping`] applies last-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs in document order, duplicates included.
    pub pairs: Vec<(String, String)>,
}

impl FormatParser for Format {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        // A truncated stream is a malformed document for this attempt,
        // not an environment fault.
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::parse(ParseErrorKind::MalformedProperties, e.to_string()))?;

        let mut pairs = Vec::new();
        let mut iter = lines.iter();
        while let Some(raw) = iter.next() {
            let line = raw.trim_start_matches([' ', '\t', '\x0c']);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            // An odd number of trailing backslashes continues the logical
            // line; the continuation's leading whitespace is stripped.
            let mut logical = line.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                let Some(next) = iter.next() else { break };
                logical.push_str(next.trim_start_matches([' ', '\t', '\x0c']));
            }

            let (raw_key, raw_value) = split_key_value(&logical);
            pairs.push((unescape(&raw_key)?, unescape(&raw_value)?));
        }

        Ok(Format { pairs })
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        for (key, value) in &self.pairs {
            writeln!(writer, "{}={}", escape_key(key), escape_value(value)).map_err(Error::Io)?;
        }
        Ok(())
    }
}

impl From<Format> for ResourceMapping {
    fn from(value: Format) -> Self {
        value.pairs.into_iter().collect()
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn is_separator_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Splits a logical line into its raw (still escaped) key and value parts.
///
/// The key ends at the first unescaped `=`, `:`, or whitespace character.
/// When the terminator is whitespace, a single following `=` or `:` is
/// consumed as the separator, matching `java.util.Properties`.
fn split_key_value(line: &str) -> (String, String) {
    let chars: Vec<char> = line.chars().collect();

    let mut key_end = chars.len();
    let mut separator = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i += 2;
            continue;
        }
        if c == '=' || c == ':' || is_separator_whitespace(c) {
            key_end = i;
            separator = Some(c);
            break;
        }
        i += 1;
    }

    let key: String = chars[..key_end.min(chars.len())].iter().collect();

    let mut j = key_end;
    let explicit = matches!(separator, Some('=') | Some(':'));
    if explicit {
        j += 1;
    }
    while j < chars.len() && is_separator_whitespace(chars[j]) {
        j += 1;
    }
    if !explicit && j < chars.len() && matches!(chars[j], '=' | ':') {
        j += 1;
        while j < chars.len() && is_separator_whitespace(chars[j]) {
            j += 1;
        }
    }

    let value: String = chars[j.min(chars.len())..].iter().collect();
    (key, value)
}

/// Decodes `\t \n \r \f \\` and `\uXXXX` escapes. Surrogate pairs written
/// as two consecutive `\uXXXX` escapes combine into one scalar value; an
/// unpaired surrogate decodes to U+FFFD. Unknown escapes pass the escaped
/// character through, matching `java.util.Properties`.
fn unescape(input: &str) -> Result<String, Error> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&esc) = chars.get(i) else { break };
        i += 1;
        match esc {
            'u' => {
                let code = read_hex4(&chars, i)?;
                i += 4;
                if (0xD800..=0xDBFF).contains(&code)
                    && chars.get(i) == Some(&'\\')
                    && chars.get(i + 1) == Some(&'u')
                {
                    if let Ok(low) = read_hex4(&chars, i + 2) {
                        if (0xDC00..=0xDFFF).contains(&low) {
                            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            out.push(
                                char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER),
                            );
                            i += 6;
                            continue;
                        }
                    }
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &[char], at: usize) -> Result<u32, Error> {
    let mut code = 0u32;
    for offset in 0..4 {
        let digit = chars
            .get(at + offset)
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| {
                Error::parse(
                    ParseErrorKind::MalformedProperties,
                    "malformed \\uxxxx encoding",
                )
            })?;
        code = code * 16 + digit;
    }
    Ok(code)
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            '#' => out.push_str("\\#"),
            '!' => out.push_str("\\!"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            other => out.push(other),
        }
    }
    out
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_start = true;
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' if at_start => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            other => out.push(other),
        }
        at_start = false;
    }
    out
}
