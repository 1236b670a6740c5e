// ABOUTME: SCIM filter expression formatting
// ABOUTME: Quotes attribute values so lookups cannot break out of the string literal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Build `attribute eq "value"`, escaping backslashes and double quotes
#[must_use]
pub fn eq_filter(attribute: &str, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("{attribute} eq \"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value() {
        assert_eq!(eq_filter("userName", "alice"), r#"userName eq "alice""#);
    }

    #[test]
    fn test_quotes_and_backslashes_are_escaped() {
        assert_eq!(
            eq_filter("displayName", r#"ops" or "x\y"#),
            r#"displayName eq "ops\" or \"x\\y""#
        );
    }
}
