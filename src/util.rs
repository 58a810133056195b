// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Primitive string and number helpers consumed by the normalizer, the
//! validator and the codecs. The contracts here are deliberately tolerant:
//! out-of-range indices clamp instead of erroring, and the lenient integer
//! parser truncates at the first decimal point rather than failing.

/// Byte-indexed substring that clamps `start` and `len` to the string instead
/// of erroring, backing off to the nearest char boundary on either end.
pub fn substr(s: &str, start: usize, len: usize) -> &str {
    let mut begin = start.min(s.len());
    while !s.is_char_boundary(begin) {
        begin -= 1;
    }
    let mut end = begin.saturating_add(len).min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[begin..end]
}

/// Prefix of `s` at most `max` bytes long, clamped to a char boundary.
pub fn clamped_prefix(s: &str, max: usize) -> &str {
    substr(s, 0, max)
}

/// Length of the string after trimming ASCII whitespace on both ends.
pub fn trimmed_len(s: &str) -> usize {
    s.trim().len()
}

/// Lenient integer parse: skips surrounding whitespace, accepts an optional
/// sign, consumes digits up to the first non-digit, and truncates at a
/// decimal point instead of failing. Anything unparseable yields 0.
pub fn parse_i64_lenient(s: &str) -> i64 {
    let t = s.trim();
    let bytes = t.as_bytes();
    let mut i = 0;
    let mut negative = false;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        negative = bytes[i] == b'-';
        i += 1;
    }
    let begin = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == begin {
        return 0;
    }
    // A digit run may overflow i64; saturate rather than wrap.
    let magnitude: i64 = t[begin..i].parse().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Strict integer parse: whitespace-trimmed, full-token, or `None`.
pub fn parse_i64_strict(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Keeps ASCII letters.
pub fn keep_alpha(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

/// Keeps ASCII digits.
pub fn keep_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keeps ASCII letters and digits.
pub fn keep_alphanumeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Keeps all ASCII graphic characters (letters, digits, printable symbols).
pub fn keep_graphic(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_graphic()).collect()
}

/// Keeps hex digits.
pub fn keep_hex(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_hexdigit()).collect()
}

/// Case-insensitive set membership.
pub fn contains_ignore_case<S: AsRef<str>>(set: &[S], value: &str) -> bool {
    set.iter().any(|m| m.as_ref().eq_ignore_ascii_case(value))
}

/// Case-insensitive prefix test.
pub fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substr_clamps_out_of_range() {
        assert_eq!(substr("hello", 1, 3), "ell");
        assert_eq!(substr("hello", 3, 50), "lo");
        assert_eq!(substr("hello", 50, 3), "");
    }

    #[test]
    fn substr_respects_char_boundaries() {
        // 'é' is two bytes; an index inside it backs off to the boundary.
        assert_eq!(substr("é", 1, 1), "");
        assert_eq!(substr("aé", 0, 2), "a");
    }

    #[test]
    fn lenient_parse_truncates_at_decimal_point() {
        assert_eq!(parse_i64_lenient("12.7"), 12);
        assert_eq!(parse_i64_lenient("-3.9"), -3);
        assert_eq!(parse_i64_lenient(" 42 "), 42);
        assert_eq!(parse_i64_lenient("abc"), 0);
        assert_eq!(parse_i64_lenient(""), 0);
        assert_eq!(parse_i64_lenient("7up"), 7);
    }

    #[test]
    fn strict_parse_rejects_partial_tokens() {
        assert_eq!(parse_i64_strict("15"), Some(15));
        assert_eq!(parse_i64_strict("15x"), None);
        assert_eq!(parse_i64_strict(""), None);
    }

    #[test]
    fn filters() {
        assert_eq!(keep_alpha("a1b2!"), "ab");
        assert_eq!(keep_digits("a1b2!"), "12");
        assert_eq!(keep_alphanumeric("a1b2!"), "a1b2");
        assert_eq!(keep_graphic("a b!\t"), "ab!");
        assert_eq!(keep_hex("xyz123abcg"), "123abc");
    }

    #[test]
    fn case_insensitive_membership() {
        assert!(contains_ignore_case(&["Yes", "On"], "YES"));
        assert!(!contains_ignore_case(&["Yes", "On"], "off"));
        assert!(starts_with_ignore_case("Q=value", "q="));
    }
}
