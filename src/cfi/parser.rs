//! CFI Parser
//!
//! Parses EPUB CFI strings into structured Cfi objects.
//!
//! Grammar (simplified):
//! ```text
//! cfi       = ["epubcfi("] base "!" path ["," start "," end] [")"]
//! component = ("/" step)* [":" terminal]
//! step      = number ["[" id "]"]
//! terminal  = [number] ["[" assertion "]"]
//! ```
//!
//! Separators (`!`, `,`, `/`, `:`) inside brackets are literal. Inside an ID,
//! `^` escapes the following character. Assertions are kept verbatim.
//!
//! Parsing is lenient: a step token with no number is dropped, and
//! only a missing base component makes the whole string invalid.

use std::str::FromStr;

use super::types::*;
use thiserror::Error;

const PREFIX: &str = "epubcfi(";

/// Why a string is not a usable CFI
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfiParseError {
    #[error("Empty CFI string")]
    Empty,

    #[error("CFI has no base component")]
    MissingBase,

    #[error("CFI base component has no spine step")]
    MissingSpineStep,
}

/// Check for the `epubcfi(...)` wrapper
pub fn is_cfi_string(input: &str) -> bool {
    input.starts_with(PREFIX) && input.ends_with(')')
}

/// Split on `sep`, ignoring separators inside brackets
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_bracket = false;
    let mut escaped = false;
    let mut last = 0;

    for (pos, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '^' if in_bracket => escaped = true,
            '[' => in_bracket = true,
            ']' => in_bracket = false,
            c if c == sep && !in_bracket => {
                parts.push(&input[last..pos]);
                last = pos + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[last..]);
    parts
}

/// Split `4[chap01ref]` into `("4", Some("chap01ref"))`.
///
/// The inner text is returned raw; an unclosed bracket yields no content.
fn split_bracket(token: &str) -> (&str, Option<&str>) {
    let Some(open) = token.find('[') else {
        return (token, None);
    };

    let inner_start = open + 1;
    let mut escaped = false;
    for (pos, ch) in token[inner_start..].char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '^' {
            escaped = true;
        } else if ch == ']' {
            let inner = &token[inner_start..inner_start + pos];
            return (&token[..open], Some(inner));
        }
    }

    (&token[..open], None)
}

fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut escaped = false;
    for ch in raw.chars() {
        if escaped {
            result.push(ch);
            escaped = false;
        } else if ch == '^' {
            escaped = true;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Leading decimal digits, after optional whitespace
fn leading_number(input: &str) -> Option<usize> {
    let input = input.trim_start();
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    input[..end].parse().ok()
}

/// Parse a single step token such as `10[para05]`.
///
/// Returns `None` when the token carries no usable number.
pub fn parse_step(token: &str) -> Option<Step> {
    let (number, id) = split_bracket(token.trim());
    let mut step = Step::from_encoded(leading_number(number)?)?;
    step.id = id.filter(|raw| !raw.is_empty()).map(unescape);
    Some(step)
}

/// Parse the part after `:` such as `3` or `3[yes,no]`
pub fn parse_terminal(input: &str) -> Terminal {
    let (number, assertion) = split_bracket(input.trim());
    Terminal {
        offset: leading_number(number),
        assertion: assertion.filter(|raw| !raw.is_empty()).map(str::to_string),
    }
}

/// Parse one component (`/4[body01]/10/2/1:3`) into a segment
pub fn parse_component(input: &str) -> Segment {
    let mut halves = split_top_level(input, ':').into_iter();
    let steps_part = halves.next().unwrap_or_default();

    let mut tokens = split_top_level(steps_part.trim(), '/');
    if tokens.first().is_some_and(|first| first.trim().is_empty()) {
        tokens.remove(0);
    }

    Segment {
        steps: tokens.into_iter().filter_map(parse_step).collect(),
        terminal: halves.next().map(parse_terminal).unwrap_or_default(),
    }
}

/// Parse a CFI string into a Cfi struct
pub fn parse(input: &str) -> Result<Cfi, CfiParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CfiParseError::Empty);
    }

    let body = if is_cfi_string(input) {
        &input[PREFIX.len()..input.len() - 1]
    } else {
        input
    };

    let mut indirection = split_top_level(body, '!').into_iter();
    let base_part = indirection.next().unwrap_or_default();
    if base_part.trim().is_empty() {
        return Err(CfiParseError::MissingBase);
    }

    let base = parse_component(base_part);
    if base.steps.len() < 2 {
        return Err(CfiParseError::MissingSpineStep);
    }

    let rest = indirection.next().unwrap_or_default();
    let parts = split_top_level(rest, ',');

    // Anything but `path,start,end` is a plain path
    let (path, range) = match parts.as_slice() {
        [path, start, end] => (
            parse_component(path),
            Some(CfiRange {
                start: parse_component(start),
                end: parse_component(end),
            }),
        ),
        _ => (parse_component(rest), None),
    };

    Ok(Cfi { base, path, range })
}

/// Parse a CFI string, discarding the reason on failure
pub fn try_parse(input: &str) -> Option<Cfi> {
    parse(input).ok()
}

impl FromStr for Cfi {
    type Err = CfiParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
