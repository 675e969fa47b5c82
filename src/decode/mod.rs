//! HTML character reference decoding.
//!
//! The provider escapes question and answer text (`&quot;`, `&#039;`,
//! `&eacute;` ...). Everything shown in the terminal goes through
//! [`decode_html_entities`] first.

mod entities;

use entities::NAMED_REFERENCES;

/// Longest reference body we try to resolve, excluding `&` and `;`.
const MAX_REFERENCE_LENGTH: usize = 32;

/// Resolve every named and numeric character reference in `input`.
///
/// References that can't be resolved are left as they are.
pub fn decode_html_entities(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match resolve_reference(rest) {
            Some((decoded, consumed)) => {
                decoded.push_to(&mut output);
                rest = &rest[consumed..];
            }
            None => {
                output.push('&');
                rest = &rest[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

enum Decoded {
    Char(char),
    Text(&'static str),
}

impl Decoded {
    fn push_to(self, output: &mut String) {
        match self {
            Decoded::Char(ch) => output.push(ch),
            Decoded::Text(text) => output.push_str(text),
        }
    }
}

/// `text` starts with `&`. Returns the replacement and the byte length of
/// the whole reference.
fn resolve_reference(text: &str) -> Option<(Decoded, usize)> {
    let body = &text[1..];
    let end = body
        .char_indices()
        .take(MAX_REFERENCE_LENGTH + 1)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i)?;
    let name = &body[..end];

    let decoded = match name.strip_prefix('#') {
        Some(number) => Decoded::Char(numeric_reference(number)?),
        None => Decoded::Text(named_reference(name)?),
    };

    Some((decoded, end + 2))
}

/// Decimal (`39`) or hex (`x27`) code point. Digits only, no sign.
fn numeric_reference(number: &str) -> Option<char> {
    let (digits, radix) = match number.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let code = u32::from_str_radix(digits, radix).ok()?;
    match code {
        0 => Some(char::REPLACEMENT_CHARACTER),
        0x80..=0x9f => Some(windows_1252(code)),
        _ => char::from_u32(code),
    }
}

/// C1 control references are read as windows-1252, as browsers do.
fn windows_1252(code: u32) -> char {
    match code {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{2c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{160}',
        0x8b => '\u{2039}',
        0x8c => '\u{152}',
        0x8e => '\u{17d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{2dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{161}',
        0x9b => '\u{203a}',
        0x9c => '\u{153}',
        0x9e => '\u{17e}',
        0x9f => '\u{178}',
        other => char::from_u32(other).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

fn named_reference(name: &str) -> Option<&'static str> {
    NAMED_REFERENCES
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|index| NAMED_REFERENCES[index].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '&' => "&amp;".to_string(),
                '"' => "&quot;".to_string(),
                '\'' => "&#039;".to_string(),
                '<' => "&lt;".to_string(),
                '>' => "&gt;".to_string(),
                other => other.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_basic_references() {
        assert_eq!(decode_html_entities("&amp;"), "&");
        assert_eq!(decode_html_entities("&quot;test&quot;"), "\"test\"");
        assert_eq!(decode_html_entities("It&#039;s"), "It's");
        assert_eq!(decode_html_entities("It&#x27;s"), "It's");
    }

    #[test]
    fn test_named_latin_and_typographic() {
        assert_eq!(decode_html_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_html_entities("Don&rsquo;t stop&hellip;"), "Don’t stop…");
        assert_eq!(decode_html_entities("M&uuml;ller"), "Müller");
    }

    #[test]
    fn test_unresolvable_passes_through() {
        assert_eq!(decode_html_entities("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_html_entities("&amp"), "&amp");
        assert_eq!(decode_html_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_html_entities("&#1114112;"), "&#1114112;");
        assert_eq!(decode_html_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let samples = [
            "Which \"planet\" is <closest> to the sun?",
            "It's 'quoted'",
            "plain text",
            "",
        ];
        for sample in samples {
            assert_eq!(decode_html_entities(&encode(sample)), sample);
        }
    }

    #[test]
    fn test_full_named_table() {
        assert_eq!(decode_html_entities("&lambda;"), "λ");
        assert_eq!(decode_html_entities("&Sigma;&mu;&theta;"), "Σμθ");
        assert_eq!(decode_html_entities("5 &minus; 3"), "5 − 3");
        assert_eq!(decode_html_entities("a&lrm;b"), "a\u{200e}b");
        assert_eq!(decode_html_entities("&NotEqualTilde;"), "\u{2242}\u{338}");
        assert_eq!(
            decode_html_entities("&CounterClockwiseContourIntegral;"),
            "\u{2233}"
        );
    }

    #[test]
    fn test_named_table_is_sorted() {
        assert!(NAMED_REFERENCES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_numeric_edge_cases() {
        assert_eq!(decode_html_entities("&#0;"), "\u{fffd}");
        assert_eq!(decode_html_entities("&#+39;"), "&#+39;");
        assert_eq!(decode_html_entities("&#-39;"), "&#-39;");
        assert_eq!(decode_html_entities("&#x+27;"), "&#x+27;");
        assert_eq!(decode_html_entities("&#;"), "&#;");
        assert_eq!(decode_html_entities("&#150;"), "–");
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn test_decodes_already_escaped_ampersand_once() {
        assert_eq!(decode_html_entities("&amp;quot;"), "&quot;");
    }
}
