use std::fmt::Display;

/// Substitute positional `{n}` placeholders in a selector template.
///
/// Every `{n}` whose index is within `args` is replaced by the argument's `Display`
/// output. Placeholders pointing past the end of `args` and anything that is not a
/// well formed `{digits}` are copied verbatim. Substituted text is not escaped, so
/// an argument containing a quote can change the meaning of the selector; writes
/// and deletes reject such results through
/// [`crate::config::keeps_predicate_shape`].
///
/// # Example
///
/// ```rust
/// use the_projector::utils::format_placeholders;
///
/// let selector = format_placeholders("/items/item[@id='{0}']/{1}", &["42", "name"]);
/// assert_eq!(selector, "/items/item[@id='42']/name");
///
/// let untouched = format_placeholders("/a[{3}]", &["x"]);
/// assert_eq!(untouched, "/a[{3}]");
/// ```
pub fn format_placeholders<T: Display>(template: &str, args: &[T]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let closed = digits > 0 && after.as_bytes().get(digits) == Some(&b'}');
        let arg = closed
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|index| args.get(index));

        match arg {
            Some(arg) => {
                out.push_str(&arg.to_string());
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// True when the template contains at least one `{n}` placeholder.
pub fn has_placeholders(template: &str) -> bool {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after.as_bytes().get(digits) == Some(&b'}') {
            return true;
        }
        rest = after;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_placeholders_table_driven() {
        struct TestCase {
            name: &'static str,
            template: &'static str,
            args: Vec<&'static str>,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "no placeholders",
                template: "/a/b",
                args: vec!["x"],
                expected: "/a/b",
            },
            TestCase {
                name: "single placeholder",
                template: "/a[@id='{0}']",
                args: vec!["7"],
                expected: "/a[@id='7']",
            },
            TestCase {
                name: "repeated and reordered",
                template: "{1}/{0}/{1}",
                args: vec!["a", "b"],
                expected: "b/a/b",
            },
            TestCase {
                name: "out of range left verbatim",
                template: "/a/{2}",
                args: vec!["x"],
                expected: "/a/{2}",
            },
            TestCase {
                name: "malformed braces left verbatim",
                template: "{x}{}{0",
                args: vec!["y"],
                expected: "{x}{}{0",
            },
            TestCase {
                name: "quotes are not escaped",
                template: "/a[b='{0}']",
                args: vec!["it's"],
                expected: "/a[b='it's']",
            },
            TestCase {
                name: "multi digit index",
                template: "{10}",
                args: vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "ten"],
                expected: "ten",
            },
        ];

        for test_case in test_cases {
            assert_eq!(
                format_placeholders(test_case.template, &test_case.args),
                test_case.expected,
                "Test case '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("/a[@id='{0}']"));
        assert!(!has_placeholders("/a/b"));
        assert!(!has_placeholders("{x}"));
    }
}
