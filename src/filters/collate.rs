//! Hungarian collation for titles and facet labels.
//!
//! Letters follow the Hungarian alphabet, so digraphs (`cs`, `gy`, `sz`, ...)
//! sort as single letters after their base letter and `ö`/`ü` are letters
//! of their own. Acute accents only break ties between otherwise equal
//! strings, as does case (lowercase first).

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

const ALPHABET: &[&str] = &[
    "a", "b", "c", "cs", "d", "dz", "dzs", "e", "f", "g", "gy", "h", "i", "j", "k", "l", "ly", "m",
    "n", "ny", "o", "ö", "p", "q", "r", "s", "sz", "t", "ty", "u", "ü", "v", "w", "x", "y", "z",
    "zs",
];

const LETTER_BASE: u32 = 1_000;
const OTHER_BASE: u32 = 10_000;

/// Comparable key; fields compare in declaration order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<u32>,
    secondary: Vec<u8>,
    tertiary: Vec<u8>,
    raw: String,
}

fn strip_acute(c: char) -> (char, u8) {
    match c {
        'á' => ('a', 1),
        'é' => ('e', 1),
        'í' => ('i', 1),
        'ó' => ('o', 1),
        'ő' => ('ö', 1),
        'ú' => ('u', 1),
        'ű' => ('ü', 1),
        other => (other, 0),
    }
}

fn letter_rank(letter: &str) -> Option<u32> {
    ALPHABET
        .iter()
        .position(|l| *l == letter)
        .map(|i| LETTER_BASE + i as u32)
}

/// Build the sort key for `text`
pub fn key(text: &str) -> CollationKey {
    let chars: Vec<char> = text.nfc().collect();
    let lower: Vec<(char, u8)> = chars
        .iter()
        .map(|c| strip_acute(c.to_lowercase().next().unwrap_or(*c)))
        .collect();

    let mut primary = Vec::with_capacity(chars.len());
    let mut secondary = Vec::with_capacity(chars.len());
    let mut tertiary = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < lower.len() {
        let (c, accent) = lower[i];

        if c.is_whitespace() || (c.is_ascii_punctuation() && c != '\'') {
            // punctuation and spacing count as a word break
            if primary.last() != Some(&0) {
                primary.push(0);
                secondary.push(0);
                tertiary.push(0);
            }
            i += 1;
            continue;
        }

        let mut matched = None;
        for len in [3, 2] {
            if i + len > lower.len() {
                continue;
            }
            // digraph parts carry no accents
            if lower[i..i + len].iter().any(|(_, a)| *a != 0) {
                continue;
            }
            let candidate: String = lower[i..i + len].iter().map(|(c, _)| *c).collect();
            if let Some(rank) = letter_rank(&candidate) {
                matched = Some((rank, len));
                break;
            }
        }

        let (rank, len) = matched.unwrap_or_else(|| {
            let rank = if let Some(d) = c.to_digit(10) {
                1 + d
            } else {
                letter_rank(c.encode_utf8(&mut [0; 4])).unwrap_or(OTHER_BASE + c as u32)
            };
            (rank, 1)
        });

        primary.push(rank);
        secondary.push(accent);
        tertiary.push(u8::from(chars[i].is_uppercase()));
        i += len;
    }

    CollationKey {
        primary,
        secondary,
        tertiary,
        raw: text.to_string(),
    }
}

/// Compare two strings in Hungarian order
pub fn compare(a: &str, b: &str) -> Ordering {
    key(a).cmp(&key(b))
}
