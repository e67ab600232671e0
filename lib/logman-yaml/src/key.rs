/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

/// Fold an option name so that `disableBubble`, `disable_bubble` and
/// `disable-bubble` all match `disable_bubble`.
pub fn normalize(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.chars() {
        if c == '-' || c == '_' {
            s.push('_');
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower {
                s.push('_');
            }
            s.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            s.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t() {
        assert_eq!(normalize("abc"), "abc");
        assert_eq!(normalize("ABC"), "abc");
        assert_eq!(normalize("A-B-C"), "a_b_c");
        assert_eq!(normalize("A-B_C"), "a_b_c");
        assert_eq!(normalize("disableBubble"), "disable_bubble");
        assert_eq!(normalize("disable-bubble"), "disable_bubble");
        assert_eq!(normalize("enableCaller"), "enable_caller");
        assert_eq!(normalize("defaultChannel"), "default_channel");
        assert_eq!(normalize("use_stdout"), "use_stdout");
    }
}
