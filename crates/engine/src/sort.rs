//! Single-column sort: direction cycling and the cell comparator.
//!
//! Cells are always text. Two cells that both start with a number (leading
//! prefix parse, so "12kg" is 12) compare numerically; any other pair
//! compares by locale-style collation of the raw text.
//!
//! That pairwise rule is not transitive on every mixed column, so a plain
//! comparison sort could see an inconsistent order. `sort_rows` instead
//! sorts the numeric cells numerically and the other cells by collation,
//! then merges the two runs with the pairwise rule. Whenever the rule is
//! consistent on a column the result is exactly its order.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::collate::{is_blank_char, CollationKey};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Next sort state after the user activates `column`.
///
/// Same column: ascending → descending → unsorted → ascending.
/// A different column always starts at ascending.
pub fn next_sort_state(current: Option<SortState>, column: usize) -> Option<SortState> {
    let direction = match current {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Ascending => Some(SortDirection::Descending),
            SortDirection::Descending => None,
        },
        _ => Some(SortDirection::Ascending),
    };
    direction.map(|direction| SortState { column, direction })
}

/// Parse the numeric prefix of `text`.
///
/// Accepts leading whitespace, an optional sign, `Infinity`, digits with an
/// optional fraction and an optional exponent. Anything after the numeric
/// prefix is ignored. Returns `None` when no digits lead the text.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start_matches(is_blank_char);
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if s[i..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = &s[frac_start..j];
        i = j;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    let mut exponent = "";
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            exponent = &s[i + 1..j];
        }
    }

    let normalized = format!(
        "{}{}.{}{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        if exponent.is_empty() { "" } else { "e" },
        exponent,
    );
    normalized.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Sort key for one cell of the active column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellKey {
    number: Option<OrderedFloat<f64>>,
    text: CollationKey,
}

impl CellKey {
    pub fn new(value: &str) -> Self {
        Self {
            number: parse_leading_float(value).map(OrderedFloat),
            text: CollationKey::new(value),
        }
    }

    pub fn is_number(&self) -> bool {
        self.number.is_some()
    }

    /// Pairwise rule: numeric when both cells are numbers, collation otherwise.
    pub fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        let ord = match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.text.cmp(&other.text),
        };
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Stable sort of `rows` by the cell at `column`.
/// Rows shorter than `column` sort as if the cell were empty.
pub fn sort_rows(rows: &mut Vec<Vec<String>>, column: usize, direction: SortDirection) {
    let (mut numbers, mut texts): (Vec<_>, Vec<_>) = rows
        .drain(..)
        .map(|row| {
            let key = CellKey::new(row.get(column).map(String::as_str).unwrap_or(""));
            (key, row)
        })
        .partition(|(key, _)| key.is_number());

    // Each run is totally ordered on its own
    numbers.sort_by(|a, b| a.0.compare(&b.0, direction));
    texts.sort_by(|a, b| a.0.compare(&b.0, direction));

    let mut numbers = numbers.into_iter().peekable();
    let mut texts = texts.into_iter().peekable();
    loop {
        let take_number = match (numbers.peek(), texts.peek()) {
            (Some(n), Some(t)) => n.0.compare(&t.0, direction) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_number { numbers.next() } else { texts.next() };
        if let Some((_, row)) = next {
            rows.push(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[&str]) -> Vec<Vec<String>> {
        values.iter().map(|v| vec![v.to_string()]).collect()
    }

    fn flat(rows: &[Vec<String>]) -> Vec<&str> {
        rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn test_sort_cycle_same_column() {
        let s1 = next_sort_state(None, 2);
        assert_eq!(s1, Some(SortState { column: 2, direction: SortDirection::Ascending }));
        let s2 = next_sort_state(s1, 2);
        assert_eq!(s2, Some(SortState { column: 2, direction: SortDirection::Descending }));
        let s3 = next_sort_state(s2, 2);
        assert_eq!(s3, None);
        let s4 = next_sort_state(s3, 2);
        assert_eq!(s4, s1);
    }

    #[test]
    fn test_sort_cycle_switch_column_starts_ascending() {
        let desc = Some(SortState { column: 0, direction: SortDirection::Descending });
        assert_eq!(
            next_sort_state(desc, 1),
            Some(SortState { column: 1, direction: SortDirection::Ascending })
        );
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("42"), Some(42.0));
        assert_eq!(parse_leading_float("  -3.5"), Some(-3.5));
        assert_eq!(parse_leading_float("+.5"), Some(0.5));
        assert_eq!(parse_leading_float("7."), Some(7.0));
        assert_eq!(parse_leading_float("12kg"), Some(12.0));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("2e+x"), Some(2.0));
        assert_eq!(parse_leading_float("1.5E-1 units"), Some(0.15));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("$5"), None);
    }

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let mut rows = column(&["10", "2", "1"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_sort_numeric_descending() {
        let mut rows = column(&["3", "-1", "20", "0.5"]);
        sort_rows(&mut rows, 0, SortDirection::Descending);
        assert_eq!(flat(&rows), vec!["20", "3", "0.5", "-1"]);
    }

    #[test]
    fn test_sort_text_ascending() {
        let mut rows = column(&["banana", "Cherry", "apple"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["apple", "banana", "Cherry"]);
    }

    #[test]
    fn test_sort_blanks_before_numbers_before_words() {
        let mut rows = column(&["b", "3", "", "1", "a"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["", "1", "3", "a", "b"]);

        sort_rows(&mut rows, 0, SortDirection::Descending);
        assert_eq!(flat(&rows), vec!["b", "a", "3", "1", ""]);
    }

    #[test]
    fn test_sort_moves_whole_rows() {
        let mut rows = vec![
            vec!["Charlie".to_string(), "30".to_string()],
            vec!["Alice".to_string(), "10".to_string()],
            vec!["Bob".to_string(), "20".to_string()],
        ];
        sort_rows(&mut rows, 1, SortDirection::Descending);
        assert_eq!(rows[0], vec!["Charlie", "30"]);
        assert_eq!(rows[1], vec!["Bob", "20"]);
        assert_eq!(rows[2], vec!["Alice", "10"]);
    }

    #[test]
    fn test_sort_stability() {
        let mut rows = vec![
            vec!["1".to_string(), "first".to_string()],
            vec!["0".to_string(), "x".to_string()],
            vec!["1.0".to_string(), "second".to_string()],
            vec!["1".to_string(), "third".to_string()],
        ];
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        let tags: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(tags, vec!["x", "first", "second", "third"]);

        // Descending keeps equal keys in their current order too
        sort_rows(&mut rows, 0, SortDirection::Descending);
        let tags: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(tags, vec!["first", "second", "third", "x"]);
    }

    #[test]
    fn test_compare_direction() {
        let cmp = |a: &str, b: &str, d| CellKey::new(a).compare(&CellKey::new(b), d);
        assert_eq!(cmp("2", "10", SortDirection::Ascending), Ordering::Less);
        assert_eq!(cmp("2", "10", SortDirection::Descending), Ordering::Greater);
        assert_eq!(cmp("b", "A", SortDirection::Ascending), Ordering::Greater);
        // Number against text falls back to collation: '-' ties, digit < letter
        assert_eq!(cmp("-5", "-a", SortDirection::Ascending), Ordering::Less);
    }

    #[test]
    fn test_sort_negative_number_beside_symbol_text() {
        let mut rows = column(&["-a", "-5"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["-5", "-a"]);

        let mut rows = column(&["$5", "2", "-3"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["-3", "$5", "2"]);

        sort_rows(&mut rows, 0, SortDirection::Descending);
        assert_eq!(flat(&rows), vec!["2", "$5", "-3"]);
    }

    #[test]
    fn test_sort_infinity_collates_against_words() {
        let mut rows = column(&["Infinity", "apple", "zebra", "3"]);
        sort_rows(&mut rows, 0, SortDirection::Ascending);
        assert_eq!(flat(&rows), vec!["3", "apple", "Infinity", "zebra"]);
    }

    #[test]
    fn test_parse_keeps_nel() {
        assert_eq!(parse_leading_float("\u{85}5"), None);
        assert_eq!(parse_leading_float("\u{FEFF}\u{A0}5"), Some(5.0));
    }
}
