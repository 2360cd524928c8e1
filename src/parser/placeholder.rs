//! Placeholder scanner for normalized slow-log statements.
//!
//! `mysqldumpslow` abstracts literals into a bare `N` (numbers) or `'S'`
//! (strings). The scanner walks a statement left to right and, at every
//! position, tries three shapes in order (first match wins):
//!
//! 1. `LIMIT N`, `OFFSET N`, or a comparison operator before `N` (`x < N`)
//! 2. `N`, optionally followed by a comparison operator (`N <= x`)
//! 3. `'S`, optionally preceded by `LIKE` (`LIKE 'S'`)
//!
//! Keywords and tokens are matched case-insensitively and must stand on
//! word boundaries.
use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{not, opt, recognize, value},
    error::{Error, ErrorKind},
    sequence::{pair, terminated},
};

/// Comparison operator adjacent to a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

impl Comparison {
    pub const fn is_less(self) -> bool {
        matches!(self, Self::Less | Self::LessEq)
    }
}

/// Which token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    /// `N`
    Number,
    /// `S` (always right after a quote)
    String,
}

/// Context the placeholder was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Limit,
    Offset,
    Like,
    /// Operator before the placeholder: `x < N`
    CompareRight(Comparison),
    /// Operator after the placeholder: `N < x`
    CompareLeft(Comparison),
    Bare,
}

/// A located placeholder. `prefix` and `suffix` are the surrounding text
/// consumed by the match and are kept verbatim on replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch<'a> {
    /// Byte offset of the whole match (prefix included)
    pub start: usize,
    /// Byte offset one past the whole match (suffix included)
    pub end: usize,
    pub prefix: &'a str,
    pub token: &'a str,
    pub suffix: &'a str,
    pub holder: Holder,
    pub kind: PlaceholderKind,
}

type Shape<'a> = (&'a str, &'a str, &'a str, Holder, PlaceholderKind);

pub const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// ASCII-only case-insensitive tag. Non-ASCII input never matches, even
/// when it lowercases to the keyword's letters (`\u{212A}` is a `k`).
fn keyword<'a>(word: &'static str) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| match input.get(..word.len()) {
        Some(head) if head.eq_ignore_ascii_case(word) => Ok((&input[word.len()..], head)),
        _ => Err(nom::Err::Error(Error::new(input, ErrorKind::Tag))),
    }
}

fn comparison(input: &str) -> IResult<&str, Comparison> {
    alt((
        value(Comparison::LessEq, tag("<=")),
        value(Comparison::GreaterEq, tag(">=")),
        value(Comparison::Less, tag("<")),
        value(Comparison::Greater, tag(">")),
    ))(input)
}

/// `N` not followed by a word character
fn number_token(input: &str) -> IResult<&str, &str> {
    terminated(keyword("N"), not(satisfy(is_word_char)))(input)
}

/// `S` not followed by a word character
fn string_token(input: &str) -> IResult<&str, &str> {
    terminated(keyword("S"), not(satisfy(is_word_char)))(input)
}

/// Shape 1, keyword branch: `LIMIT N` / `OFFSET N`
fn keyword_prefixed(input: &str) -> IResult<&str, Shape<'_>> {
    let (rest, keyword) = alt((
        value(PlaceholderKind::Limit, keyword("LIMIT")),
        value(PlaceholderKind::Offset, keyword("OFFSET")),
    ))(input)?;
    let (rest, _) = multispace1(rest)?;
    let prefix = &input[..input.len() - rest.len()];
    let (rest, token) = number_token(rest)?;
    Ok((rest, (prefix, token, "", Holder::Number, keyword)))
}

/// Shape 1, operator branch: `< N`, `>=N`
fn comparison_prefixed(input: &str) -> IResult<&str, Shape<'_>> {
    let (rest, op) = comparison(input)?;
    let (rest, _) = multispace0(rest)?;
    let prefix = &input[..input.len() - rest.len()];
    let (rest, token) = number_token(rest)?;
    Ok((
        rest,
        (prefix, token, "", Holder::Number, PlaceholderKind::CompareRight(op)),
    ))
}

/// Shape 2: `N` with an optional trailing operator
fn number_with_suffix(input: &str) -> IResult<&str, Shape<'_>> {
    let (rest, token) = number_token(input)?;
    let (after, op) = opt(pair(multispace0, comparison))(rest)?;
    let suffix = &rest[..rest.len() - after.len()];
    let kind = match op {
        Some((_, op)) => PlaceholderKind::CompareLeft(op),
        None => PlaceholderKind::Bare,
    };
    Ok((after, ("", token, suffix, Holder::Number, kind)))
}

/// Shape 3: `'S` with an optional `LIKE` in front
fn quoted_string(input: &str, allow_like: bool) -> IResult<&str, Shape<'_>> {
    let (rest, like) = if allow_like {
        opt(recognize(pair(keyword("LIKE"), multispace0)))(input)?
    } else {
        (input, None)
    };
    let (rest, _) = char('\'')(rest)?;
    let prefix = &input[..input.len() - rest.len()];
    let (rest, token) = string_token(rest)?;
    let kind = if like.is_some() {
        PlaceholderKind::Like
    } else {
        PlaceholderKind::Bare
    };
    Ok((rest, (prefix, token, "", Holder::String, kind)))
}

/// Try every shape at the start of `input`. `at_word_boundary` tells whether
/// the preceding character (if any) is a non-word character, which keywords
/// and a leading `N` require.
fn shape_at(input: &str, at_word_boundary: bool) -> Option<(&str, Shape<'_>)> {
    if at_word_boundary {
        if let Ok(found) = keyword_prefixed(input) {
            return Some(found);
        }
    }
    if let Ok(found) = comparison_prefixed(input) {
        return Some(found);
    }
    if at_word_boundary {
        if let Ok(found) = number_with_suffix(input) {
            return Some(found);
        }
    }
    quoted_string(input, at_word_boundary).ok()
}

/// Find every placeholder in `statement`, left to right, non-overlapping
pub fn scan_placeholders(statement: &str) -> Vec<PlaceholderMatch<'_>> {
    let mut found = Vec::new();
    let mut pos = 0;
    let mut prev: Option<char> = None;

    while pos < statement.len() {
        let at_word_boundary = !prev.is_some_and(is_word_char);
        let input = &statement[pos..];

        if let Some((rest, (prefix, token, suffix, holder, kind))) =
            shape_at(input, at_word_boundary)
        {
            let end = statement.len() - rest.len();
            found.push(PlaceholderMatch {
                start: pos,
                end,
                prefix,
                token,
                suffix,
                holder,
                kind,
            });
            prev = statement[..end].chars().next_back();
            pos = end;
            continue;
        }

        let Some(c) = input.chars().next() else {
            break;
        };
        prev = Some(c);
        pos += c.len_utf8();
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(statement: &str) -> Vec<PlaceholderKind> {
        scan_placeholders(statement).iter().map(|m| m.kind).collect()
    }

    #[test]
    fn test_bare_number() {
        let found = scan_placeholders("SELECT * FROM t WHERE id = N");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PlaceholderKind::Bare);
        assert_eq!(found[0].holder, Holder::Number);
        assert_eq!(found[0].token, "N");
        assert_eq!(&"SELECT * FROM t WHERE id = N"[found[0].start..found[0].end], "N");
    }

    #[test]
    fn test_limit_and_offset() {
        let found = scan_placeholders("SELECT * FROM t LIMIT N OFFSET N");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, PlaceholderKind::Limit);
        assert_eq!(found[0].prefix, "LIMIT ");
        assert_eq!(found[1].kind, PlaceholderKind::Offset);
        assert_eq!(found[1].prefix, "OFFSET ");
    }

    #[test]
    fn test_limit_requires_whitespace() {
        assert_eq!(kinds("LIMITN"), vec![]);
        assert_eq!(kinds("LIMIT\n\tN"), vec![PlaceholderKind::Limit]);
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        // `XLIMIT N` is not a LIMIT clause, the N is still bare
        assert_eq!(kinds("XLIMIT N"), vec![PlaceholderKind::Bare]);
    }

    #[test]
    fn test_comparison_prefix() {
        assert_eq!(
            kinds("a < N AND b <= N AND c > N AND d >=N"),
            vec![
                PlaceholderKind::CompareRight(Comparison::Less),
                PlaceholderKind::CompareRight(Comparison::LessEq),
                PlaceholderKind::CompareRight(Comparison::Greater),
                PlaceholderKind::CompareRight(Comparison::GreaterEq),
            ]
        );
        let found = scan_placeholders("x<=  N");
        assert_eq!(found[0].prefix, "<=  ");
    }

    #[test]
    fn test_comparison_suffix() {
        let found = scan_placeholders("N < a AND N >= b");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, PlaceholderKind::CompareLeft(Comparison::Less));
        assert_eq!(found[0].suffix, " <");
        assert_eq!(
            found[1].kind,
            PlaceholderKind::CompareLeft(Comparison::GreaterEq)
        );
        assert_eq!(found[1].suffix, " >=");
    }

    #[test]
    fn test_between_is_bare() {
        assert_eq!(
            kinds("x BETWEEN N AND N"),
            vec![PlaceholderKind::Bare, PlaceholderKind::Bare]
        );
    }

    #[test]
    fn test_not_equal_operator_scans_greater() {
        assert_eq!(
            kinds("x <> N"),
            vec![PlaceholderKind::CompareRight(Comparison::Greater)]
        );
    }

    #[test]
    fn test_number_inside_words_ignored() {
        assert_eq!(kinds("SELECT name, N1, xN FROM NN"), vec![]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            kinds("select * from t where a = n limit n"),
            vec![PlaceholderKind::Bare, PlaceholderKind::Limit]
        );
        assert_eq!(kinds("name like 's'"), vec![PlaceholderKind::Like]);
    }

    #[test]
    fn test_string_placeholders() {
        let found = scan_placeholders("WHERE a = 'S' AND b LIKE 'S'");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, PlaceholderKind::Bare);
        assert_eq!(found[0].holder, Holder::String);
        assert_eq!(found[0].prefix, "'");
        assert_eq!(found[1].kind, PlaceholderKind::Like);
        assert_eq!(found[1].prefix, "LIKE '");
    }

    #[test]
    fn test_unquoted_or_long_string_ignored() {
        assert_eq!(kinds("WHERE a = S"), vec![]);
        assert_eq!(kinds("WHERE a = 'Sam'"), vec![]);
    }

    #[test]
    fn test_in_list() {
        assert_eq!(
            kinds("id IN (N, N, N) AND s IN ('S','S')"),
            vec![PlaceholderKind::Bare; 5]
        );
    }

    #[test]
    fn test_kelvin_sign_is_not_a_keyword_letter() {
        assert_eq!(kinds("WHERE name LI\u{212A}E 'S'"), vec![PlaceholderKind::Bare]);
        assert_eq!(kinds("LIMIT N \u{212A}"), vec![PlaceholderKind::Limit]);
        assert_eq!(
            kinds("x = \u{212A}ELVIN AND y < N"),
            vec![PlaceholderKind::CompareRight(Comparison::Less)]
        );
    }

    #[test]
    fn test_non_ascii_text() {
        let found = scan_placeholders("SELECT 'é' AS ä, x FROM t WHERE y = N");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PlaceholderKind::Bare);
    }
}
