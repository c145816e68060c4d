//! Sort argument parsing
//!
//! Accepts the compact form `-name,age` (leading `-` for descending) and, as
//! a fallback, a literal list such as `[("name", -1), ("age", 1)]`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;

use crate::errors::{ProjectionError, ProjectionResult};
use crate::query::{SortDirection, SortKey};

static SIMPLE_SORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-,\w]+$").unwrap());

/// Parses a sort argument into ordered sort keys.
///
/// Returns `None` when no sort was requested.
pub fn extract_sort_arg(sort: Option<&str>) -> ProjectionResult<Option<Vec<SortKey>>> {
    let Some(sort) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let keys = if SIMPLE_SORT.is_match(sort) {
        parse_simple(sort)?
    } else {
        parse_literal(sort)?
    };
    Ok(Some(keys))
}

fn parse_simple(sort: &str) -> ProjectionResult<Vec<SortKey>> {
    sort.split(',')
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix('-') {
            Some("") => Err(ProjectionError::invalid_argument(
                "Sort field name missing after '-'",
            )),
            Some(field) => Ok(SortKey::desc(field)),
            None => Ok(SortKey::asc(part)),
        })
        .collect()
}

fn parse_literal(sort: &str) -> ProjectionResult<Vec<SortKey>> {
    SortLiteral::new(sort)
        .parse()
        .ok_or_else(|| ProjectionError::invalid_argument(format!("Unable to parse sort: {}", sort)))
}

/// Reader for list literals of `(field, direction)` tuples.
///
/// Tuples and lists are interchangeable, strings take single or double
/// quotes with backslash escapes, trailing commas are allowed.
struct SortLiteral<'s> {
    chars: Peekable<Chars<'s>>,
}

impl<'s> SortLiteral<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            chars: source.chars().peekable(),
        }
    }

    fn parse(mut self) -> Option<Vec<SortKey>> {
        if !self.eat('[') {
            return None;
        }
        let mut keys = Vec::new();
        while !self.eat(']') {
            keys.push(self.key()?);
            if !self.eat(',') && self.peek() != Some(']') {
                return None;
            }
        }
        self.skip_whitespace();
        self.chars.next().is_none().then_some(keys)
    }

    fn key(&mut self) -> Option<SortKey> {
        let close = if self.eat('(') {
            ')'
        } else if self.eat('[') {
            ']'
        } else {
            return None;
        };

        let field = self.string()?;
        if self.eat(close) {
            return Some(SortKey::asc(field));
        }
        if !self.eat(',') {
            return None;
        }
        if self.eat(close) {
            return Some(SortKey::asc(field));
        }

        let direction = SortDirection::from_i64(self.integer()?)?;
        self.eat(',');
        self.eat(close).then_some(SortKey { field, direction })
    }

    fn string(&mut self) -> Option<String> {
        self.skip_whitespace();
        let quote = self.chars.next().filter(|c| *c == '"' || *c == '\'')?;
        let mut value = String::new();
        loop {
            match self.chars.next()? {
                '\\' => value.push(self.chars.next()?),
                c if c == quote => return Some(value),
                c => value.push(c),
            }
        }
    }

    fn integer(&mut self) -> Option<i64> {
        self.skip_whitespace();
        let mut digits = String::new();
        if let Some(sign) = self.chars.next_if(|c| *c == '-' || *c == '+') {
            digits.push(sign);
        }
        while let Some(digit) = self.chars.next_if(char::is_ascii_digit) {
            digits.push(digit);
        }
        digits.parse().ok()
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        self.chars.next_if_eq(&expected).is_some()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_sort() {
        let keys = extract_sort_arg(Some("-name,age")).unwrap().unwrap();
        assert_eq!(keys, vec![SortKey::desc("name"), SortKey::asc("age")]);
    }

    #[test]
    fn test_no_sort() {
        assert_eq!(extract_sort_arg(None).unwrap(), None);
        assert_eq!(extract_sort_arg(Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_literal_fallback() {
        let keys = extract_sort_arg(Some(r#"[("name", -1), ('age', 1), ("city",)]"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            keys,
            vec![SortKey::desc("name"), SortKey::asc("age"), SortKey::asc("city")]
        );
    }

    #[test]
    fn test_literal_quoted_punctuation() {
        let keys = extract_sort_arg(Some(r#"[("it's", 1), ('a(b)', -1), ("say \"hi\"",)]"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey::asc("it's"),
                SortKey::desc("a(b)"),
                SortKey::asc("say \"hi\""),
            ]
        );
    }

    #[test]
    fn test_literal_empty_and_trailing() {
        assert_eq!(extract_sort_arg(Some("[]")).unwrap(), Some(Vec::new()));
        let keys = extract_sort_arg(Some("[ ( 'name' , -1 , ) , ]")).unwrap().unwrap();
        assert_eq!(keys, vec![SortKey::desc("name")]);
    }

    #[test]
    fn test_literal_lists() {
        let keys = extract_sort_arg(Some(r#"[["lastname", -1]]"#)).unwrap().unwrap();
        assert_eq!(keys, vec![SortKey::desc("lastname")]);
    }

    #[test]
    fn test_malformed_sort_is_client_error() {
        let inputs = [
            "name asc",
            "[(\"name\", 2)]",
            "{\"name\": 1}",
            "-",
            "[(1, 1)]",
            "[(\"name\", 1, 2)]",
            "[(\"name\", 1)] extra",
            "[(\"name\"]",
            "[(\"name\", 1) (\"age\", 1)]",
        ];
        for input in inputs {
            let err = extract_sort_arg(Some(input)).unwrap_err();
            assert!(err.is_client_error(), "{} should be rejected", input);
        }
    }
}
