// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The write-safe selector subset.
//!
//! Writes and deletes only accept selectors that name a concrete position, so that a
//! missing target can be created by walking the path. The grammar is:
//!
//! ```text
//! selector  := "." | "/"? step ("/" step)* predicate?
//! step      := name | "@" name | ".."
//! predicate := "[" text-without-brackets "]"
//! ```
//!
//! with these restrictions: an attribute step must be the last step, the path must
//! not end in `..`, a predicate may only follow an element step, and nothing may
//! contain a function call. `//`, wildcards and `.` inside a longer path are not
//! write-safe.

use crate::utils::{format_placeholders, has_placeholders};

/// A parsed write-safe selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePath {
    /// Starts at the root of the context node's tree
    pub absolute: bool,
    pub steps: Vec<WriteStep>,
    /// Predicate on the last element step, without brackets
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStep {
    /// `.` on its own: the context node
    SelfNode,
    Parent,
    Element(String),
    Attribute(String),
}

/// True when `selector` is inside the write-safe grammar. Pure and total.
pub fn is_legal_for_mutation(selector: &str) -> bool {
    parse_write_path(selector).is_some()
}

/// Check a selector template before any arguments are known.
///
/// Placeholders are replaced with a neutral name so that `/items/{0}` and
/// `/item[@id='{0}']` are accepted; the substituted selector is checked again on
/// every call.
pub fn is_legal_template_for_mutation(template: &str) -> bool {
    if !has_placeholders(template) {
        return is_legal_for_mutation(template);
    }
    is_legal_for_mutation(&neutral_rendering(template))
}

/// True when substituting arguments into `template` kept a keyed predicate keyed.
///
/// A template such as `/item[@id='{0}']` renders a `name='literal'` predicate with
/// neutral arguments. The rendered path must still have that shape, so an argument
/// containing a quote cannot add conditions to the predicate.
pub fn keeps_predicate_shape(template: &str, rendered: &WritePath) -> bool {
    if !has_placeholders(template) {
        return true;
    }
    match parse_write_path(&neutral_rendering(template)).and_then(|p| p.predicate_constraint()) {
        Some(_) => rendered.predicate_constraint().is_some(),
        None => true,
    }
}

fn neutral_rendering(template: &str) -> String {
    let neutral: Vec<&str> = vec!["_"; max_placeholder(template) + 1];
    format_placeholders(template, &neutral)
}

fn max_placeholder(template: &str) -> usize {
    template
        .split('{')
        .skip(1)
        .filter_map(|part| part.split_once('}'))
        .filter_map(|(digits, _)| digits.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}

/// Parse a write-safe selector, `None` when it is outside the grammar.
pub fn parse_write_path(selector: &str) -> Option<WritePath> {
    if selector == "." {
        return Some(WritePath {
            absolute: false,
            steps: vec![WriteStep::SelfNode],
            predicate: None,
        });
    }
    if selector.is_empty() || selector.contains('(') {
        return None;
    }

    let (path, predicate) = split_predicate(selector)?;
    let (absolute, relative) = match path.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, path),
    };
    if relative.is_empty() {
        return None;
    }

    let segments: Vec<&str> = relative.split('/').collect();
    let mut steps = Vec::with_capacity(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        let last = index + 1 == segments.len();
        let step = match *segment {
            ".." => WriteStep::Parent,
            s => match s.strip_prefix('@') {
                Some(name) if last && is_name(name) => WriteStep::Attribute(name.to_string()),
                Some(_) => return None,
                None if is_name(s) => WriteStep::Element(s.to_string()),
                None => return None,
            },
        };
        steps.push(step);
    }

    match steps.last() {
        Some(WriteStep::Parent) | None => return None,
        Some(WriteStep::Attribute(_)) if predicate.is_some() => return None,
        _ => {}
    }

    Some(WritePath {
        absolute,
        steps,
        predicate,
    })
}

fn split_predicate(selector: &str) -> Option<(&str, Option<String>)> {
    match selector.find('[') {
        None if selector.contains(']') => None,
        None => Some((selector, None)),
        Some(open) => {
            let inner = selector[open + 1..].strip_suffix(']')?;
            if inner.trim().is_empty() || inner.contains('[') || inner.contains(']') {
                return None;
            }
            Some((&selector[..open], Some(inner.trim().to_string())))
        }
    }
}

fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

impl WritePath {
    /// Name of the last element step, if the path ends in one
    pub fn target_element(&self) -> Option<&str> {
        match self.steps.last() {
            Some(WriteStep::Element(name)) => Some(name),
            _ => None,
        }
    }

    /// Parse a `name='literal'` or `@name='literal'` predicate into
    /// `(is_attribute, name, literal)`, the only predicate shape that can be
    /// materialized when creating a missing target.
    pub fn predicate_constraint(&self) -> Option<(bool, String, String)> {
        let predicate = self.predicate.as_deref()?;
        let (lhs, rhs) = predicate.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        let (attribute, name) = match lhs.strip_prefix('@') {
            Some(name) => (true, name),
            None => (false, lhs),
        };
        if !is_name(name) || rhs.len() < 2 {
            return None;
        }
        let quote = rhs.chars().next()?;
        if !matches!(quote, '\'' | '"') || !rhs.ends_with(quote) {
            return None;
        }
        let literal = &rhs[1..rhs.len() - 1];
        if literal.contains(quote) {
            return None;
        }
        Some((attribute, name.to_string(), literal.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_expressions() {
        for selector in [
            ".",
            "/a",
            "/a/b/asdfZRc/d",
            "/a/b/@c",
            "@xasd",
            "/a/../b",
            "/a[b='e']",
            "a/b",
            "../sibling",
            "/ns:item/value",
            "/a/b[@id='7']",
        ] {
            assert!(
                is_legal_for_mutation(selector),
                "'{}' should be a valid expression, but it is not",
                selector
            );
        }
    }

    #[test]
    fn test_illegal_expressions() {
        for selector in [
            "",
            "/",
            "@",
            "function()",
            "/trailing/slash/",
            "//double/slash",
            "/a/@b/c",
            "/a/b/.",
            "./a",
            "/a/*",
            "/a/..",
            "/a[]",
            "/a[b][c]",
            "/a/@b[x='1']",
            "/a[count(b)=1]",
            "/a]",
        ] {
            assert!(
                !is_legal_for_mutation(selector),
                "'{}' should not be a valid expression, but it is",
                selector
            );
        }
    }

    #[test]
    fn test_templates_are_checked_with_neutral_arguments() {
        assert!(is_legal_template_for_mutation("/items/{0}"));
        assert!(is_legal_template_for_mutation("/items/item[@id='{0}']"));
        assert!(!is_legal_template_for_mutation("/item[@id='{1}']/name"));
        assert!(!is_legal_template_for_mutation("//items/{0}"));
    }

    #[test]
    fn test_substitution_keeps_keyed_predicates_keyed() {
        let template = "/items/item[@id='{0}']";
        let render = |id: &str| parse_write_path(&format_placeholders(template, &[id])).unwrap();

        assert!(keeps_predicate_shape(template, &render("42")));
        assert!(!keeps_predicate_shape(template, &render("42' or @id='7")));
        // no predicate in the template, nothing to keep
        assert!(keeps_predicate_shape("/items/{0}", &parse_write_path("/items/a").unwrap()));
    }

    #[test]
    fn test_parse_write_path() {
        let path = parse_write_path("/a/../b[@k='v']").unwrap();
        assert!(path.absolute);
        assert_eq!(
            path.steps,
            vec![
                WriteStep::Element("a".into()),
                WriteStep::Parent,
                WriteStep::Element("b".into())
            ]
        );
        assert_eq!(path.target_element(), Some("b"));
        assert_eq!(
            path.predicate_constraint(),
            Some((true, "k".to_string(), "v".to_string()))
        );

        let relative = parse_write_path("@name").unwrap();
        assert!(!relative.absolute);
        assert_eq!(relative.steps, vec![WriteStep::Attribute("name".into())]);
        assert_eq!(relative.target_element(), None);
    }

    #[test]
    fn test_predicate_constraint_shapes() {
        let constraint = |s: &str| parse_write_path(s).and_then(|p| p.predicate_constraint());
        assert_eq!(
            constraint("/a[b=\"x y\"]"),
            Some((false, "b".to_string(), "x y".to_string()))
        );
        assert_eq!(constraint("/a[b>1]"), None);
        assert_eq!(constraint("/a[2]"), None);
        assert_eq!(constraint("/a"), None);
    }
}
