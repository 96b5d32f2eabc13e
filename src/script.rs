//! Reading the generator's JavaScript data files.
//!
//! Index and tree files are emitted as `var NAME = <literal>;` statements, with
//! single-quoted strings, license comments and the odd trailing comma. This module
//! turns such a literal into strict JSON so serde can take over. Plain JSON files
//! pass through unchanged.

use crate::error::LoadError;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use std::sync::LazyLock;

static VAR_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;\s])var\s+([A-Za-z_$][\w$]*)\s*=").expect("variable pattern is valid")
});

/// Reads a data file into memory.
pub(crate) async fn read_source(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Deserializes the data held by a script.
///
/// With `name`, the literal assigned to that variable is used; otherwise the first
/// declared variable, or the whole text when it is already a bare literal.
pub fn parse<T: DeserializeOwned>(
    text: &str,
    origin: &str,
    name: Option<&str>,
) -> Result<T, LoadError> {
    let json = extract_json(text, origin, name)?;
    serde_json::from_str(&json).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Extracts a literal from a script and rewrites it as JSON.
pub fn extract_json(text: &str, origin: &str, name: Option<&str>) -> Result<String, LoadError> {
    let script_error = |reason: String| LoadError::Script {
        origin: origin.to_string(),
        reason,
    };

    let source = strip_comments(text);
    let trimmed = source.trim_start();

    let start = if name.is_none() && (trimmed.starts_with('[') || trimmed.starts_with('{')) {
        source.len() - trimmed.len()
    } else {
        VAR_DECL
            .captures_iter(&source)
            .find(|caps| name.is_none_or(|wanted| &caps[1] == wanted))
            .and_then(|caps| caps.get(0))
            .map(|decl| decl.end())
            .ok_or_else(|| match name {
                Some(wanted) => format!("no variable named '{}'", wanted),
                None => "no variable declaration or literal found".to_string(),
            })
            .map_err(script_error)?
    };

    literal_to_json(&source[start..]).map_err(script_error)
}

/// Removes `//` and `/* */` comments outside string literals.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                copy_raw_string(c, &mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Copies the rest of a string literal verbatim, including its closing quote.
fn copy_raw_string(quote: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == quote {
            return;
        }
    }
}

/// Converts the first JavaScript literal in `src` into JSON.
///
/// Stops at the bracket closing the outermost array/object, or at a top-level `;`.
fn literal_to_json(src: &str) -> Result<String, String> {
    let mut out = String::with_capacity(src.len());
    let mut depth = 0usize;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push('"');
                single_quoted_to_json(&mut chars, &mut out)?;
            }
            '"' => {
                out.push('"');
                copy_raw_string('"', &mut chars, &mut out);
            }
            '[' | '{' => {
                depth += 1;
                out.push(c);
            }
            ']' | '}' => {
                if depth == 0 {
                    return Err(format!("unbalanced '{}'", c));
                }
                let kept = out.trim_end().len();
                out.truncate(kept);
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(c);
                depth -= 1;
                if depth == 0 {
                    return Ok(out);
                }
            }
            ';' if depth == 0 => break,
            _ => out.push(c),
        }
    }

    if depth > 0 {
        Err("unexpected end of input inside literal".to_string())
    } else if out.trim().is_empty() {
        Err("missing literal".to_string())
    } else {
        Ok(out.trim().to_string())
    }
}

/// Rewrites the body of a `'...'` literal as the body of a `"..."` literal.
fn single_quoted_to_json(chars: &mut Peekable<Chars<'_>>, out: &mut String) -> Result<(), String> {
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => break,
            },
            '"' => out.push_str("\\\""),
            '\'' => {
                out.push('"');
                return Ok(());
            }
            _ => out.push(c),
        }
    }
    Err("unterminated string literal".to_string())
}
