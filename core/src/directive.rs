//! # Directive Grammar
//!
//! Recognizes the two routing directives embedded in line comments:
//!
//! - `@action <basePath>` declares the route prefix of a handler type.
//! - `@router <subPath> [<methods>]` binds a handler method to a sub-path.
//!
//! The keyword must be the first token once the comment marker is stripped.
//! Any other comment text is ignored.

use regex::Regex;
use std::sync::OnceLock;

/// Keyword introducing an action directive.
pub const ACTION_KEYWORD: &str = "@action";

/// Keyword introducing a route directive.
pub const ROUTER_KEYWORD: &str = "@router";

/// Verb used when a route directive carries no method list.
pub const DEFAULT_METHOD: &str = "get";

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Route prefix for a handler type. Empty when omitted.
    Action {
        /// The declared prefix.
        base_path: String,
    },
    /// Sub-path and verb list for a handler method.
    Route {
        /// Path appended to the handler's base path.
        sub_path: String,
        /// Lower-cased, comma-joined verbs (`get`, `get,post`, `*`).
        http_method: String,
    },
}

/// Reason a directive was rejected. Callers attach the file path.
pub type DirectiveResult<T> = Result<T, String>;

/// Strips `//`, `/*`, `*/` and block continuation `*` markers from one comment line.
pub fn comment_body(line: &str) -> &str {
    let mut text = line.trim();
    if let Some(rest) = text.strip_prefix("//") {
        text = rest.trim_start_matches('/');
    } else if let Some(rest) = text.strip_prefix("/*") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("*/") {
        text = rest;
    }
    text = text.trim_start();
    if let Some(rest) = text.strip_prefix('*') {
        text = rest;
    }
    text.trim()
}

/// Returns the directive keyword heading a comment body, if any.
pub fn leading_keyword(body: &str) -> Option<&'static str> {
    match body.split_whitespace().next()? {
        ACTION_KEYWORD => Some(ACTION_KEYWORD),
        ROUTER_KEYWORD => Some(ROUTER_KEYWORD),
        _ => None,
    }
}

/// Parses a single comment line.
///
/// Returns `Ok(None)` for plain text, and `Err(reason)` when the keyword is
/// present but the rest of the line does not fit the grammar.
///
/// # Examples
/// ```
/// use routegen_core::directive::{parse_line, Directive};
///
/// let d = parse_line("// @router /:id [post]").unwrap();
/// assert_eq!(
///     d,
///     Some(Directive::Route { sub_path: "/:id".into(), http_method: "post".into() })
/// );
/// assert_eq!(parse_line("// just a note").unwrap(), None);
/// assert!(parse_line("// @router").is_err());
/// ```
pub fn parse_line(line: &str) -> DirectiveResult<Option<Directive>> {
    let body = comment_body(line);
    let Some(keyword) = leading_keyword(body) else {
        return Ok(None);
    };
    let rest = body[keyword.len()..].trim();

    if keyword == ACTION_KEYWORD {
        let base_path = rest.split_whitespace().next().unwrap_or_default();
        return Ok(Some(Directive::Action {
            base_path: base_path.to_string(),
        }));
    }

    parse_route(rest).map(Some)
}

/// Parses every line of a (possibly multi-line) comment, in order.
pub fn parse_comment(text: &str) -> DirectiveResult<Vec<Directive>> {
    let mut directives = Vec::new();
    for line in text.lines() {
        if let Some(directive) = parse_line(line)? {
            directives.push(directive);
        }
    }
    Ok(directives)
}

fn parse_route(rest: &str) -> DirectiveResult<Directive> {
    let sub_path = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| format!("{} is missing its sub-path", ROUTER_KEYWORD))?;
    if sub_path.starts_with('[') {
        return Err(format!(
            "{} is missing its sub-path before '{}'",
            ROUTER_KEYWORD, sub_path
        ));
    }

    let tail = rest[sub_path.len()..].trim_start();
    let http_method = if tail.starts_with('[') {
        parse_method_list(tail)?
    } else {
        // Anything else after the sub-path is free commentary.
        DEFAULT_METHOD.to_string()
    };

    Ok(Directive::Route {
        sub_path: sub_path.to_string(),
        http_method,
    })
}

fn parse_method_list(tail: &str) -> DirectiveResult<String> {
    static LIST_RE: OnceLock<Regex> = OnceLock::new();
    let list_re = LIST_RE.get_or_init(|| Regex::new(r"^\[([^\[\]]*)\]").expect("Invalid regex"));

    static VERB_RE: OnceLock<Regex> = OnceLock::new();
    let verb_re = VERB_RE.get_or_init(|| Regex::new(r"^(?:[A-Za-z]+|\*)$").expect("Invalid regex"));

    let inner = list_re
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| format!("unterminated method list '{}'", tail))?
        .as_str();

    let mut verbs = Vec::new();
    for verb in inner.split(|c: char| c == ',' || c.is_whitespace()) {
        if verb.is_empty() {
            continue;
        }
        if !verb_re.is_match(verb) {
            return Err(format!("invalid http method '{}' in '{}'", verb, tail));
        }
        verbs.push(verb.to_ascii_lowercase());
    }

    if verbs.is_empty() {
        Ok(DEFAULT_METHOD.to_string())
    } else {
        Ok(verbs.join(","))
    }
}
