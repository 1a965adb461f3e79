//! A compact reStructuredText to HTML converter.
//!
//! Covers what content pages actually use:
//!
//! - section titles (underline, or over- and underline), levels assigned in
//!   order of first appearance
//! - paragraphs, transitions
//! - bullet (`-`, `*`, `+`) and enumerated (`1.`, `#.`) lists
//! - literal blocks introduced by `::`, indented block quotes
//! - inline ``literal``, **strong**, *emphasis*, `interpreted text` and
//!   `` `text <url>`_ `` hyperlinks
//!
//! Output is wrapped in `<div class="document">` like docutils' `html_body`.

use super::Decoder;
use regex::Regex;
use std::sync::LazyLock;

/// Characters allowed in section adornments.
const ADORNMENT_CHARS: &str = "=-`:'\"~^_*+#<>.";

/// Minimum length of a standalone adornment line to count as a transition.
const TRANSITION_MIN_LEN: usize = 4;

const INDENT_CHARS: [char; 2] = [' ', '\t'];

pub struct RstDecoder;

impl Decoder for RstDecoder {
    fn decode(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();
        let mut writer = Writer::default();
        writer.blocks(&lines);
        format!("<div class=\"document\">\n{}</div>\n", writer.html)
    }
}

#[derive(Default)]
struct Writer {
    html: String,
    /// Title styles in order of first appearance: (char, has_overline).
    styles: Vec<(char, bool)>,
}

impl Writer {
    fn blocks(&mut self, lines: &[&str]) {
        let mut i = 0;
        let mut literal_next = false;

        while i < lines.len() {
            let line = lines[i];

            if is_blank(line) {
                i += 1;
                continue;
            }

            // Indented block: literal block after "::", block quote otherwise
            if is_indented(line) {
                let end = indented_end(lines, i);
                let body = dedent(&lines[i..end]);
                if literal_next {
                    self.html.push_str("<pre class=\"literal-block\">\n");
                    self.html.push_str(&escape(&body.join("\n")));
                    self.html.push_str("\n</pre>\n");
                } else {
                    self.html.push_str("<blockquote>\n");
                    self.blocks(&body);
                    self.html.push_str("</blockquote>\n");
                }
                literal_next = false;
                i = end;
                continue;
            }
            literal_next = false;

            // Title with overline
            if let Some(ch) = adornment(line)
                && i + 2 < lines.len()
                && !is_blank(lines[i + 1])
                && adornment(lines[i + 2]) == Some(ch)
            {
                self.heading(lines[i + 1].trim(), (ch, true));
                i += 3;
                continue;
            }

            // Title with underline only
            if i + 1 < lines.len()
                && let Some(ch) = adornment(lines[i + 1])
                && lines[i + 1].trim_end().chars().count() >= line.trim().chars().count()
                && adornment(line).is_none()
            {
                self.heading(line.trim(), (ch, false));
                i += 2;
                continue;
            }

            // Transition
            if adornment(line).is_some() && line.trim_end().len() >= TRANSITION_MIN_LEN {
                self.html.push_str("<hr class=\"docutils\" />\n");
                i += 1;
                continue;
            }

            if bullet(line).is_some() {
                i = self.list(lines, i, "ul", "", bullet);
                continue;
            }

            if enumerator(line).is_some() {
                i = self.list(lines, i, "ol", " class=\"arabic\"", enumerator);
                continue;
            }

            // Paragraph
            let start = i;
            while i < lines.len() && !is_blank(lines[i]) && !is_indented(lines[i]) {
                i += 1;
            }
            let text = lines[start..i]
                .iter()
                .map(|l| l.trim())
                .collect::<Vec<_>>()
                .join("\n");
            literal_next = self.paragraph(&text);
        }
    }

    fn heading(&mut self, title: &str, style: (char, bool)) {
        let level = match self.styles.iter().position(|s| *s == style) {
            Some(pos) => pos + 1,
            None => {
                self.styles.push(style);
                self.styles.len()
            }
        }
        .min(6);
        self.html
            .push_str(&format!("<h{level}>{}</h{level}>\n", inline(title)));
    }

    /// Emit a paragraph. Returns true when it announces a literal block.
    fn paragraph(&mut self, text: &str) -> bool {
        let trimmed = text.trim_end();
        let (text, literal) = match trimmed.strip_suffix("::") {
            Some("") => return true,
            Some(rest) if rest.ends_with(char::is_whitespace) => (rest.trim_end().to_owned(), true),
            Some(rest) => (format!("{rest}:"), true),
            None => (trimmed.to_owned(), false),
        };
        self.html.push_str(&format!("<p>{}</p>\n", inline(&text)));
        literal
    }

    /// Emit a flat list; items continue on indented lines.
    fn list(
        &mut self,
        lines: &[&str],
        mut i: usize,
        tag: &str,
        attrs: &str,
        marker: impl Fn(&str) -> Option<usize>,
    ) -> usize {
        let mut items: Vec<Vec<&str>> = Vec::new();

        while i < lines.len() {
            let line = lines[i];
            if let Some(offset) = marker(line) {
                items.push(vec![line[offset..].trim()]);
            } else if is_indented(line) && !items.is_empty() {
                if let Some(item) = items.last_mut() {
                    item.push(line.trim());
                }
            } else if is_blank(line) {
                // a blank line ends the list unless another item or continuation follows
                let next = lines[i..].iter().copied().find(|l| !is_blank(l));
                match next {
                    Some(l) if marker(l).is_some() || is_indented(l) => {}
                    _ => break,
                }
            } else {
                break;
            }
            i += 1;
        }

        self.html.push_str(&format!("<{tag}{attrs}>\n"));
        for item in items {
            self.html
                .push_str(&format!("<li>{}</li>\n", inline(&item.join("\n"))));
        }
        self.html.push_str(&format!("</{tag}>\n"));
        i
    }
}

// ============================================================================
// Line Classification
// ============================================================================

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Only spaces and tabs indent; other whitespace is part of the text.
fn is_indented(line: &str) -> bool {
    !is_blank(line) && line.starts_with(INDENT_CHARS)
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches(INDENT_CHARS).len()
}

/// The adornment character if the line is a repeated punctuation run.
fn adornment(line: &str) -> Option<char> {
    let line = line.trim_end();
    let first = line.chars().next()?;
    (line.len() >= 2 && ADORNMENT_CHARS.contains(first) && line.chars().all(|c| c == first))
        .then_some(first)
}

/// Byte offset of the item text for bullet list lines.
fn bullet(line: &str) -> Option<usize> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('-' | '*' | '+'), Some(' ')) => Some(2),
        _ => None,
    }
}

/// Byte offset of the item text for enumerated list lines (`1.`, `#.`, `2)`).
fn enumerator(line: &str) -> Option<usize> {
    static RE_ENUM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(?:\d+|#)[.)] ").unwrap());
    RE_ENUM.find(line).map(|m| m.end())
}

/// End (exclusive) of the indented block starting at `start`.
fn indented_end(lines: &[&str], start: usize) -> usize {
    let mut end = start;
    let mut i = start;
    while i < lines.len() && (is_blank(lines[i]) || is_indented(lines[i])) {
        if !is_blank(lines[i]) {
            end = i + 1;
        }
        i += 1;
    }
    end
}

/// Strip the common leading whitespace.
fn dedent<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let indent = lines
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| indent_width(l))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .copied()
        .map(|l| if is_blank(l) { "" } else { &l[indent..] })
        .collect()
}

// ============================================================================
// Inline Markup
// ============================================================================

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline markup; ``literals`` are protected from further processing.
fn inline(text: &str) -> String {
    static RE_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"``(.+?)``").unwrap());

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for cap in RE_LITERAL.captures_iter(text) {
        let whole = cap.get(0).unwrap();
        out.push_str(&markup(&text[last..whole.start()]));
        out.push_str("<code>");
        out.push_str(&escape(&cap[1]));
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&markup(&text[last..]));
    out
}

fn markup(text: &str) -> String {
    static RE_LINK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"`([^`]+?)\s+&lt;([^`\s]+?)&gt;`__?").unwrap());
    static RE_CITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
    static RE_STRONG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").unwrap());
    static RE_EMPHASIS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*(\S(?:.*?\S)?)\*").unwrap());

    let text = escape(text);
    let text = RE_LINK.replace_all(&text, r#"<a class="reference external" href="$2">$1</a>"#);
    let text = RE_CITE.replace_all(&text, "<cite>$1</cite>");
    let text = RE_STRONG.replace_all(&text, "<strong>$1</strong>");
    let text = RE_EMPHASIS.replace_all(&text, "<em>$1</em>");
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> String {
        RstDecoder.decode(text)
    }

    #[test]
    fn test_document_wrapper() {
        let html = decode("Hello");
        assert!(html.starts_with("<div class=\"document\">"));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn test_section_levels_follow_first_appearance() {
        let html = decode("Title\n=====\n\nSub\n---\n\nOther\n=====\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Sub</h2>"));
        assert!(html.contains("<h1>Other</h1>"));
    }

    #[test]
    fn test_overlined_title_is_distinct_style() {
        let html = decode("=====\nTop\n=====\n\nBelow\n=====\n");
        assert!(html.contains("<h1>Top</h1>"));
        assert!(html.contains("<h2>Below</h2>"));
    }

    #[test]
    fn test_paragraphs_and_inline() {
        let html = decode("Some **bold** and *soft* text\nwith ``a < b``.\n\nSecond.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>soft</em>"));
        assert!(html.contains("<code>a &lt; b</code>"));
        assert!(html.contains("<p>Second.</p>"));
    }

    #[test]
    fn test_hyperlink() {
        let html = decode("See `Rust <https://www.rust-lang.org>`_ now.");
        assert!(html.contains(r#"<a class="reference external" href="https://www.rust-lang.org">Rust</a>"#));
    }

    #[test]
    fn test_literal_block() {
        let html = decode("Example::\n\n    fn main() {}\n    <tag>\n\nAfter.");
        assert!(html.contains("<p>Example:</p>"));
        assert!(html.contains("<pre class=\"literal-block\">\nfn main() {}\n&lt;tag&gt;\n</pre>"));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn test_expanded_literal_marker() {
        let html = decode("Code ::\n\n    x\n");
        assert!(html.contains("<p>Code</p>"));
        let html = decode("::\n\n    x\n");
        assert!(!html.contains("<p>"));
        assert!(html.contains("<pre"));
    }

    #[test]
    fn test_block_quote() {
        let html = decode("Intro.\n\n    Quoted text.\n");
        assert!(html.contains("<blockquote>\n<p>Quoted text.</p>\n</blockquote>"));
    }

    #[test]
    fn test_bullet_list() {
        let html = decode("- one\n- two\n  continued\n\n- three\n\nAfter.");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<li>two\ncontinued</li>"));
        assert!(html.contains("<li>three</li>"));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn test_enumerated_list() {
        let html = decode("1. first\n2. second\n#. third\n");
        assert!(html.contains("<ol class=\"arabic\">"));
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn test_transition() {
        let html = decode("Above.\n\n----------\n\nBelow.");
        assert!(html.contains("<hr class=\"docutils\" />"));
    }

    #[test]
    fn test_non_breaking_space_is_not_indentation() {
        let html = decode("Intro.\n\n\u{a0}quoted\n more\n");
        assert!(html.contains("<p>Intro.</p>"));
        assert!(html.contains("<p>quoted</p>"));
        assert!(html.contains("<blockquote>\n<p>more</p>\n</blockquote>"));

        let body = dedent(&["  \u{a0}x", "  y"]);
        assert_eq!(body, vec!["\u{a0}x", "y"]);
    }

    #[test]
    fn test_adornment_detection() {
        assert_eq!(adornment("====="), Some('='));
        assert_eq!(adornment("=-=-"), None);
        assert_eq!(adornment("- item"), None);
        assert_eq!(adornment("="), None);
        assert_eq!(adornment(""), None);
    }
}
