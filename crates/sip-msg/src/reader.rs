// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor over a header value string.
//!
//! Every value grammar parses itself from a [`Reader`] positioned at the
//! start of its production and leaves the cursor at the first unconsumed
//! delimiter (comma, semicolon, or end of input). The reader knows nothing
//! about any particular grammar; it only hands out words, quoted strings,
//! delimited substrings and bracketed segments.

/// Characters that terminate a bare word. Structural separators only: a
/// word may still contain URI-internal characters like ':', '@' and '='.
const WORD_TERMINATORS: &[char] = &[
    ' ', '\t', ',', ';', '{', '}', '(', ')', '[', ']', '<', '>', '"', '\r', '\n',
];

/// Returns true for characters allowed in a SIP token.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '!' | '%' | '*' | '_' | '+' | '`' | '\'' | '~')
}

/// Returns true when the whole string is a non-empty SIP token.
pub fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// Wraps a value in double quotes, escaping embedded quotes and backslashes.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Removes surrounding double quotes and unescapes the content. Returns the
/// input unchanged when it is not a quoted string.
pub fn unquote(s: &str) -> String {
    let t = s.trim();
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        let mut out = String::with_capacity(t.len() - 2);
        let mut escaped = false;
        for c in t[1..t.len() - 1].chars() {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else {
                out.push(c);
            }
        }
        out
    } else {
        t.to_string()
    }
}

/// Character cursor used by all value grammar parsers.
#[derive(Debug)]
pub struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a str) -> Self {
        Reader { src, pos: 0 }
    }

    /// Remaining unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Number of unconsumed bytes.
    pub fn available(&self) -> usize {
        self.src.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn starts_with(&self, prefix: char) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consumes `c` if it is the next character.
    pub fn consume(&mut self, c: char) -> bool {
        if self.starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skips spaces and tabs, returning the skipped run.
    pub fn skip_ws(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    /// Reads one word: either a quoted string (returned unescaped, without
    /// the quotes) or a run of characters up to the next separator.
    /// Returns `None` when no word is present at the cursor.
    pub fn read_word(&mut self) -> Option<String> {
        self.skip_ws();
        if self.starts_with('"') {
            return self.read_quoted();
        }
        let rest = self.rest();
        let end = rest
            .find(|c| WORD_TERMINATORS.contains(&c))
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(rest[..end].to_string())
    }

    /// Reads a quoted string at the cursor, returning the unescaped content.
    pub fn read_quoted(&mut self) -> Option<String> {
        if !self.consume('"') {
            return None;
        }
        let mut out = String::new();
        let mut escaped = false;
        let mut chars = self.rest().char_indices();
        for (i, c) in &mut chars {
            if escaped {
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                self.pos += i + 1;
                return Some(out);
            } else {
                out.push(c);
            }
        }
        // Unterminated quoted string: consume everything.
        self.pos = self.src.len();
        Some(out)
    }

    /// Reads up to (but not past) the first top-level occurrence of any
    /// delimiter in `delims`. Delimiters inside quoted strings or `<...>`
    /// brackets are not split points. The delimiter itself is not consumed.
    pub fn read_to_delimiter(&mut self, delims: &[char]) -> &'a str {
        let rest = self.rest();
        let mut in_quotes = false;
        let mut escaped = false;
        let mut bracket_depth = 0usize;
        let mut end = rest.len();
        for (i, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' if in_quotes => escaped = true,
                '"' => in_quotes = !in_quotes,
                '<' if !in_quotes => bracket_depth += 1,
                '>' if !in_quotes => bracket_depth = bracket_depth.saturating_sub(1),
                _ if !in_quotes && bracket_depth == 0 && delims.contains(&c) => {
                    end = i;
                    break;
                }
                _ => {}
            }
        }
        self.pos += end;
        &rest[..end]
    }

    /// Reads the content of a `<...>` or `(...)` segment, consuming the
    /// brackets. Returns `None` when the cursor is not at an opening bracket
    /// or the segment is unterminated.
    pub fn read_parenthesized(&mut self) -> Option<String> {
        self.skip_ws();
        let (open, close) = match self.peek() {
            Some('<') => ('<', '>'),
            Some('(') => ('(', ')'),
            _ => return None,
        };
        let rest = self.rest();
        let mut depth = 0usize;
        let mut in_quotes = false;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            if in_quotes {
                match c {
                    '\\' => escaped = true,
                    '"' => in_quotes = false,
                    _ => {}
                }
                continue;
            }
            if c == '"' {
                in_quotes = true;
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    let content = &rest[open.len_utf8()..i];
                    self.pos += i + close.len_utf8();
                    return Some(content.to_string());
                }
            }
        }
        None
    }

    /// Consumes and returns everything left on the cursor.
    pub fn read_to_end(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.src.len();
        rest
    }
}
