//! Restricted markdown to HTML.
//!
//! Only what small chat models actually emit is supported: fenced code,
//! `-` / `•` list items, blank-line paragraphs, inline `` `code` `` and
//! `**bold**`. Text is passed through unescaped.

#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Code { lang: &'a str, body: String },
    Item(&'a str),
    Text(&'a str),
    Break,
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn tokenize(input: &str) -> Vec<Block<'_>> {
    let lines: Vec<&str> = input.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_fence(line) {
            if let Some(offset) = lines[i + 1..].iter().position(|l| is_fence(l)) {
                let close = i + 1 + offset;
                let lang = line.trim().trim_start_matches('`').trim();
                blocks.push(Block::Code {
                    lang,
                    body: lines[i + 1..close].join("\n"),
                });
                i = close + 1;
                continue;
            }
        }

        let trimmed = line.trim_start();
        if line.trim().is_empty() {
            if blocks.last() != Some(&Block::Break) {
                blocks.push(Block::Break);
            }
        } else if let Some(item) = list_item(trimmed) {
            blocks.push(Block::Item(item));
        } else {
            blocks.push(Block::Text(line));
        }
        i += 1;
    }

    while blocks.last() == Some(&Block::Break) {
        blocks.pop();
    }
    let leading = blocks.iter().take_while(|b| **b == Block::Break).count();
    blocks.drain(..leading);
    blocks
}

/// Strips a `-` or `•` marker followed by at least one whitespace char.
fn list_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('•'))?;
    let item = rest.trim_start();
    (item.len() < rest.len()).then_some(item)
}

fn render_inline(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(pos) = rest.find(|c: char| c == '`' || c == '*') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix('`') {
            if let Some(end) = after.find('`').filter(|&end| end > 0) {
                out.push_str("<code>");
                out.push_str(&after[..end]);
                out.push_str("</code>");
                rest = &after[end + 1..];
                continue;
            }
        } else if let Some(after) = tail.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                let inner = &after[..end];
                if !inner.is_empty() && !inner.contains('*') {
                    out.push_str("<strong>");
                    out.push_str(inner);
                    out.push_str("</strong>");
                    rest = &after[end + 2..];
                    continue;
                }
            }
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
}

/// Renders model output as HTML wrapped in a single `<p>`.
#[must_use]
pub fn render(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    out.push_str("<p>");

    let mut in_list = false;
    let mut prev_text = false;

    for block in tokenize(input) {
        let is_text = matches!(block, Block::Text(_));
        if in_list && !matches!(block, Block::Item(_)) {
            out.push_str("</ul>");
            in_list = false;
        }

        match block {
            Block::Code { lang, body } => {
                out.push_str("<pre><code class=\"language-");
                out.push_str(lang);
                out.push_str("\">");
                out.push_str(&body);
                out.push_str("</code></pre>");
            }
            Block::Item(text) => {
                if !in_list {
                    out.push_str("<ul>");
                    in_list = true;
                }
                out.push_str("<li>");
                render_inline(text, &mut out);
                out.push_str("</li>");
            }
            Block::Text(text) => {
                if prev_text {
                    out.push('\n');
                }
                render_inline(text, &mut out);
            }
            Block::Break => out.push_str("</p><p>"),
        }
        prev_text = is_text;
    }

    if in_list {
        out.push_str("</ul>");
    }
    out.push_str("</p>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text() {
        assert_eq!(render("Hello maker"), "<p>Hello maker</p>");
        assert_eq!(render(""), "<p></p>");
    }

    #[test]
    fn test_inline_spans() {
        assert_eq!(
            render("Set **retraction** to `6mm`"),
            "<p>Set <strong>retraction</strong> to <code>6mm</code></p>"
        );
    }

    #[test]
    fn test_unmatched_markers_are_literal() {
        assert_eq!(render("2 * 3 = 6"), "<p>2 * 3 = 6</p>");
        assert_eq!(render("a `tick"), "<p>a `tick</p>");
        assert_eq!(render("**not bold"), "<p>**not bold</p>");
    }

    #[test]
    fn test_list_items_share_one_list() {
        assert_eq!(
            render("Try this:\n- Lower temp\n• Dry filament\n\nGood luck!"),
            "<p>Try this:<ul><li>Lower temp</li><li>Dry filament</li></ul></p><p>Good luck!</p>"
        );
    }

    #[test]
    fn test_list_marker_takes_any_whitespace() {
        assert_eq!(
            render("-\tLower temp\n-   Slow down\n•\tDry filament"),
            "<p><ul><li>Lower temp</li><li>Slow down</li><li>Dry filament</li></ul></p>"
        );
        assert_eq!(render("-dash"), "<p>-dash</p>");
    }

    #[test]
    fn test_blank_lines_collapse() {
        assert_eq!(render("\n\none\n\n\n\ntwo\n\n"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_text_lines_keep_newlines() {
        assert_eq!(render("line one\nline two"), "<p>line one\nline two</p>");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render("Use:\n```gcode\nG28\nG1 Z0.2\n```\nDone"),
            "<p>Use:<pre><code class=\"language-gcode\">G28\nG1 Z0.2</code></pre>Done</p>"
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(
            render("```\nM104 S200\n```"),
            "<p><pre><code class=\"language-\">M104 S200</code></pre></p>"
        );
    }

    #[test]
    fn test_code_block_content_is_not_formatted() {
        assert_eq!(
            render("```\n- **x**\n```"),
            "<p><pre><code class=\"language-\">- **x**</code></pre></p>"
        );
    }

    #[test]
    fn test_unclosed_fence_is_text() {
        assert_eq!(render("```rust\nfn main"), "<p>```rust\nfn main</p>");
    }

    #[test]
    fn test_list_then_code_closes_list() {
        assert_eq!(
            render("- a\n```\nb\n```"),
            "<p><ul><li>a</li></ul><pre><code class=\"language-\">b</code></pre></p>"
        );
    }
}
