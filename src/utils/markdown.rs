// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::MarkdownOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

static BLANK_LINES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static STRUCTURAL_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s{4}|\t|#|>|\||[-*+] |\d+[.)] |!?\[|[=-]+\s*$)").unwrap());
static QUOTE_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*>\s?)*").unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// 转换前整体丢弃的元素
const SKIPPED_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "canvas", "button",
    "select", "option", "input", "textarea",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr"];

/// Markdown生成器
///
/// 转换交给 html2md 完成，这里只负责转换前按选项清理HTML，
/// 以及转换后的转义、折行和空行整理
pub struct MarkdownGenerator {
    options: MarkdownOptions,
}

impl MarkdownGenerator {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// 转换完整的HTML文档，只输出body内容
    pub fn generate(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let root = document
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| document.root_element());
        self.convert(root)
    }

    /// 转换HTML片段
    pub fn generate_fragment(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        self.convert(fragment.root_element())
    }

    fn convert(&self, root: ElementRef<'_>) -> String {
        let mut cleaned = String::new();
        self.clean_children(root, &mut cleaned);

        let markdown = html2md::parse_html(&cleaned);
        let markdown = self.finish(&markdown);
        BLANK_LINES_REGEX
            .replace_all(markdown.trim(), "\n\n")
            .to_string()
    }

    fn clean_children(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let text: &str = text;
                    out.push_str(&html_escape::encode_text(text));
                }
                Node::Element(_) => {
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        self.clean_element(child_ref, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn clean_element(&self, element: ElementRef<'_>, out: &mut String) {
        let el = element.value();
        let name = el.name();
        if SKIPPED_TAGS.contains(&name) {
            return;
        }

        match name {
            "a" if !self.keeps_link(el.attr("href")) => {
                self.clean_children(element, out);
                return;
            }
            "img" if self.options.ignore_links => {
                let alt = el.attr("alt").unwrap_or("").trim();
                out.push_str(&html_escape::encode_text(alt));
                return;
            }
            _ => {}
        }

        out.push('<');
        out.push_str(name);
        for (attr, value) in el.attrs() {
            if matches!(attr, "href" | "src" | "alt" | "title") {
                out.push_str(&format!(
                    " {}=\"{}\"",
                    attr,
                    html_escape::encode_double_quoted_attribute(value)
                ));
            }
        }
        out.push('>');
        if VOID_TAGS.contains(&name) {
            return;
        }
        self.clean_children(element, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    /// 链接是否以markdown链接形式保留，否则只保留链接文本
    fn keeps_link(&self, href: Option<&str>) -> bool {
        if self.options.ignore_links {
            return false;
        }
        match href.map(str::trim) {
            None | Some("") => false,
            Some(href) if href.starts_with("javascript:") => false,
            Some(href) if self.options.skip_internal_links && href.starts_with('#') => false,
            Some(_) => true,
        }
    }

    /// 代码块以外的行做转义与折行
    fn finish(&self, markdown: &str) -> String {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut out = Vec::with_capacity(lines.len());
        let mut in_fence = false;

        for (i, line) in lines.iter().enumerate() {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                out.push(line.to_string());
                continue;
            }
            if in_fence {
                out.push(line.to_string());
                continue;
            }

            let underlined = lines
                .get(i + 1)
                .map(|next| is_setext_underline(next))
                .unwrap_or(false);
            let structural = underlined || STRUCTURAL_LINE_REGEX.is_match(line);

            let line = if self.options.escape_html {
                escape_line(line)
            } else {
                line.to_string()
            };

            if structural {
                out.push(line);
            } else {
                out.push(wrap_text(&line, self.options.body_width));
            }
        }
        out.join("\n")
    }
}

impl Default for MarkdownGenerator {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}

/// 转义行内文本，保留行首的引用标记
fn escape_line(line: &str) -> String {
    let prefix_len = QUOTE_PREFIX_REGEX
        .find(line)
        .map(|m| m.end())
        .unwrap_or(0);
    let (prefix, text) = line.split_at(prefix_len);
    format!("{}{}", prefix, html_escape::encode_text(text))
}

fn is_setext_underline(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

/// 按宽度贪心折行，0表示不折行
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(word);
        line_len += word_len;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}
