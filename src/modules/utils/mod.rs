//
// Copyright (c) 2025 The Mailforge Authors
//
// This file is part of the Mailforge Synthetic Mail Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.


use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Reduces an HTML fragment to its text: tags become spaces, whitespace runs
/// collapse, the result is trimmed. Good enough for subject lines and text
/// fallback parts; this is not an HTML parser.
pub fn strip_html(html: &str) -> String {
    let without_tags = HTML_TAG_RE.replace_all(html, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Folds line breaks into spaces and trims, keeping header values single-line.
pub fn sanitize_subject(subject: &str) -> String {
    LINE_BREAK_RE.replace_all(subject, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Quarterly\nreport</h1>  <p>now   ready</p></body></html>";
        assert_eq!(strip_html(html), "Quarterly report now ready");
    }

    #[test]
    fn test_strip_html_plain_text_passthrough() {
        assert_eq!(strip_html("already plain"), "already plain");
    }

    #[test]
    fn test_sanitize_subject_folds_line_breaks() {
        assert_eq!(sanitize_subject("one\r\ntwo\nthree "), "one two three");
    }

    #[test]
    fn test_sanitize_subject_empty() {
        assert_eq!(sanitize_subject("\r\n"), "");
    }
}
