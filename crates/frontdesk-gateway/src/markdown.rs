// SPDX-FileCopyrightText: 2026 Frontdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal Markdown rendering for assistant answers.
//!
//! The input is HTML-escaped before any markup is produced, so the only tags
//! in the output are the ones generated here. Supported: fenced and inline
//! code, `#` to `###` headings, bold, italic, `http(s)` links, unordered and
//! ordered lists, paragraphs with line breaks.

use std::sync::LazyLock;

use regex::Regex;

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^\s)*]+)\)").unwrap());

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Paragraph,
    Unordered,
    Ordered,
}

/// Renders Markdown to an HTML fragment safe to insert into the page.
pub fn render_markdown(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len() + 64);
    let mut open = Block::None;
    let mut code: Option<String> = None;

    for line in escaped.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            match code.take() {
                Some(body) => push_code_block(&mut out, &body),
                None => {
                    close_block(&mut out, &mut open);
                    code = Some(String::new());
                }
            }
            continue;
        }

        if let Some(body) = code.as_mut() {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(line);
            continue;
        }

        if trimmed.is_empty() {
            close_block(&mut out, &mut open);
            continue;
        }

        if let Some((level, rest)) = heading(trimmed) {
            close_block(&mut out, &mut open);
            out.push_str(&format!("<h{level}>{}</h{level}>", render_inline(rest)));
            continue;
        }

        if let Some(item) = unordered_item(trimmed) {
            open_block(&mut out, &mut open, Block::Unordered);
            out.push_str(&format!("<li>{}</li>", render_inline(item)));
            continue;
        }

        if let Some(item) = ordered_item(trimmed) {
            open_block(&mut out, &mut open, Block::Ordered);
            out.push_str(&format!("<li>{}</li>", render_inline(item)));
            continue;
        }

        if open == Block::Paragraph {
            out.push_str("<br>");
        } else {
            open_block(&mut out, &mut open, Block::Paragraph);
        }
        out.push_str(&render_inline(trimmed));
    }

    // An unterminated fence still renders as code.
    if let Some(body) = code {
        push_code_block(&mut out, &body);
    }
    close_block(&mut out, &mut open);
    out
}

/// Reduces Markdown to plain text for speech synthesis.
pub fn strip_markdown(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            continue;
        }
        let content = heading(trimmed)
            .map(|(_, rest)| rest)
            .or_else(|| unordered_item(trimmed))
            .or_else(|| ordered_item(trimmed))
            .unwrap_or(trimmed);
        let plain = LINK.replace_all(content, "$1").replace(['*', '`'], "");
        let plain = plain.trim();
        if !plain.is_empty() {
            lines.push(plain.to_string());
        }
    }
    lines.join("\n")
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_block(out: &mut String, open: &mut Block, wanted: Block) {
    if *open == wanted {
        return;
    }
    close_block(out, open);
    out.push_str(match wanted {
        Block::Paragraph => "<p>",
        Block::Unordered => "<ul>",
        Block::Ordered => "<ol>",
        Block::None => "",
    });
    *open = wanted;
}

fn close_block(out: &mut String, open: &mut Block) {
    out.push_str(match open {
        Block::Paragraph => "</p>",
        Block::Unordered => "</ul>",
        Block::Ordered => "</ol>",
        Block::None => "",
    });
    *open = Block::None;
}

fn push_code_block(out: &mut String, body: &str) {
    out.push_str("<pre><code>");
    out.push_str(body);
    out.push_str("</code></pre>");
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    line[level..].strip_prefix(' ').map(|rest| (level, rest.trim()))
}

fn unordered_item(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(str::trim)
}

/// Inline markup for one line; code spans are left unformatted.
fn render_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in INLINE_CODE.captures_iter(line) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&format_span(&line[last..whole.start()]));
        out.push_str("<code>");
        out.push_str(code.as_str());
        out.push_str("</code>");
        last = whole.end();
    }
    out.push_str(&format_span(&line[last..]));
    out
}

fn format_span(text: &str) -> String {
    let linked = LINK.replace_all(
        text,
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    );
    let bold = BOLD.replace_all(&linked, "<strong>${1}</strong>");
    ITALIC.replace_all(&bold, "<em>${1}</em>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_before_formatting() {
        let html = render_markdown("<script>alert('x')</script>");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn paragraphs_and_line_breaks() {
        let html = render_markdown("first line\nsecond line\n\nnew paragraph");
        assert_eq!(
            html,
            "<p>first line<br>second line</p><p>new paragraph</p>"
        );
    }

    #[test]
    fn headings_up_to_level_three() {
        assert_eq!(render_markdown("# Fees"), "<h1>Fees</h1>");
        assert_eq!(render_markdown("### Fees"), "<h3>Fees</h3>");
        assert_eq!(render_markdown("#### Fees"), "<p>#### Fees</p>");
        assert_eq!(render_markdown("#hashtag"), "<p>#hashtag</p>");
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            render_markdown("**Deadline** is *soon*"),
            "<p><strong>Deadline</strong> is <em>soon</em></p>"
        );
    }

    #[test]
    fn lone_asterisks_stay_literal() {
        assert_eq!(render_markdown("2 * 3 * 4"), "<p>2 * 3 * 4</p>");
    }

    #[test]
    fn unordered_and_ordered_lists() {
        let html = render_markdown("Options:\n- Science\n- Arts\n\n1. Apply\n2. Pay");
        assert_eq!(
            html,
            "<p>Options:</p><ul><li>Science</li><li>Arts</li></ul><ol><li>Apply</li><li>Pay</li></ol>"
        );
    }

    #[test]
    fn fenced_code_is_not_formatted() {
        let html = render_markdown("```\n**not bold** <tag>\n```");
        assert_eq!(
            html,
            "<pre><code>**not bold** &lt;tag&gt;</code></pre>"
        );
    }

    #[test]
    fn unterminated_fence_renders_as_code() {
        assert_eq!(render_markdown("```\nx = 1"), "<pre><code>x = 1</code></pre>");
    }

    #[test]
    fn inline_code_is_not_formatted() {
        assert_eq!(
            render_markdown("run `*args*` now"),
            "<p>run <code>*args*</code> now</p>"
        );
    }

    #[test]
    fn only_http_links_become_anchors() {
        let html = render_markdown("[Portal](https://uni.example/apply)");
        assert_eq!(
            html,
            r#"<p><a href="https://uni.example/apply" target="_blank" rel="noopener noreferrer">Portal</a></p>"#
        );

        let html = render_markdown("[click](javascript:alert(1))");
        assert!(!html.contains("<a"));
    }

    #[test]
    fn link_url_cannot_break_out_of_attribute() {
        let html = render_markdown(r#"[x](https://a.example/"onmouseover="bad)"#);
        assert!(!html.contains(r#"" onmouseover"#));
        assert!(!html.contains(r#""onmouseover=""#));
    }

    #[test]
    fn strip_markdown_for_speech() {
        let plain = strip_markdown(
            "## Fees\n**Tuition** is *RM 10,000*.\n- See [the portal](https://uni.example)\n```\n```",
        );
        assert_eq!(plain, "Fees\nTuition is RM 10,000.\nSee the portal");
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_markdown(""), "");
        assert_eq!(strip_markdown(""), "");
    }
}
