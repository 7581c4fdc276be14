//! Line sanitizer shared by the OBJ and MTL parsers
//!
//! Splits source text into trimmed, non-blank lines while remembering each
//! line's position in the original text for error messages.

use std::str::SplitWhitespace;

use super::error::ParseError;

/// A trimmed, non-blank line of source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number in the original text
    pub number: usize,
    /// Line contents without leading or trailing whitespace
    pub text: &'a str,
}

impl<'a> SourceLine<'a> {
    /// First whitespace-delimited token (`v`, `f`, `newmtl`, ...)
    pub fn keyword(&self) -> &'a str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the keyword, trimmed
    ///
    /// Used for names and paths, which may contain spaces.
    pub fn rest(&self) -> &'a str {
        self.text
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim())
    }

    /// Whitespace-delimited tokens after the keyword
    pub fn values(&self) -> SplitWhitespace<'a> {
        let mut tokens = self.text.split_whitespace();
        tokens.next();
        tokens
    }

    /// Parse the first `N` values after the keyword as finite floats
    ///
    /// Extra trailing values are ignored (e.g. the optional `w` of `v`).
    pub fn floats<const N: usize>(&self) -> Result<[f32; N], ParseError> {
        let mut out = [0.0; N];
        let mut values = self.values();
        for (found, slot) in out.iter_mut().enumerate() {
            let token = values.next().ok_or_else(|| ParseError::MissingValues {
                line: self.number,
                keyword: self.keyword().to_string(),
                expected: N,
                found,
            })?;
            *slot = parse_float(token, self.number)?;
        }
        Ok(out)
    }
}

/// Parse one float token, rejecting NaN and infinities
pub(crate) fn parse_float(token: &str, line: usize) -> Result<f32, ParseError> {
    match token.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::MalformedNumber {
            line,
            token: token.to_string(),
        }),
    }
}

/// Split raw text into trimmed, non-blank lines
pub fn sanitize_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.lines()
        .enumerate()
        .map(|(index, line)| SourceLine {
            number: index + 1,
            text: line.trim(),
        })
        .filter(|line| !line.text.is_empty())
}
