//! Locale-style text collation for sorting.
//!
//! Three comparison levels, each consulted only when the previous one ties:
//! - primary: base characters, case and diacritics ignored; whitespace sorts
//!   before punctuation/symbols, which sort before digits, then letters.
//!   ASCII punctuation follows the root locale order (`_ - , ; : ! ? .` ...
//!   with currency signs last), not code point order
//! - secondary: diacritics ("resume" < "résumé")
//! - tertiary: case, lowercase first ("apple" < "Apple")
//!
//! A final raw byte comparison makes the order total.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Whitespace as trimmed from cell text and skipped before a number.
///
/// Unicode `White_Space` minus U+0085 (NEL), plus the byte order mark.
pub fn is_blank_char(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// ASCII punctuation and symbols in root locale collation order.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Character class for primary-level ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
    Whitespace,
    Symbol,
    Digit,
    Letter,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if is_blank_char(c) {
            CharClass::Whitespace
        } else if c.is_alphabetic() {
            CharClass::Letter
        } else if c.is_numeric() {
            CharClass::Digit
        } else {
            CharClass::Symbol
        }
    }

    /// Primary weight of `c` within its class.
    fn weight(self, c: char) -> u32 {
        match self {
            CharClass::Symbol => match SYMBOL_ORDER.find(c) {
                Some(pos) => pos as u32,
                None => SYMBOL_ORDER.len() as u32 + c as u32,
            },
            _ => c as u32,
        }
    }
}

/// Precomputed collation key. Derived `Ord` compares fields in declaration
/// order, which is exactly primary → secondary → tertiary → raw.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(CharClass, u32)>,
    secondary: Vec<char>,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let primary = text
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .map(|c| {
                let class = CharClass::of(c);
                (class, class.weight(c))
            })
            .collect();

        let secondary = text.nfd().flat_map(char::to_lowercase).collect();

        // false (lowercase) sorts before true (uppercase)
        let tertiary = text
            .chars()
            .filter(|c| c.is_alphabetic())
            .map(char::is_uppercase)
            .collect();

        Self {
            primary,
            secondary,
            tertiary,
            raw: text.to_string(),
        }
    }
}
