// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// class/id 中表明是样板区域的模式
static NEGATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(nav|navbar|menu|footer|header|sidebar|breadcrumbs?|ads?|advert\w*|banner|promo|social|share|cookie|comments?|related)\b").unwrap()
});

/// 整体移除的元素
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "iframe", "svg", "button",
];

/// 作为打分单元的块级元素
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "ul",
];

/// 各指标权重
const TEXT_DENSITY_WEIGHT: f64 = 0.35;
const LINK_DENSITY_WEIGHT: f64 = 0.25;
const TAG_WEIGHT: f64 = 0.2;
const TEXT_LENGTH_WEIGHT: f64 = 0.2;

/// 文本长度评分饱和点（字符）
const TEXT_LENGTH_SATURATION: f64 = 200.0;

fn tag_weight(name: &str) -> f64 {
    match name {
        "article" | "main" | "p" | "pre" | "blockquote" | "table" | "h1" | "h2" => 1.0,
        "h3" | "section" | "dd" | "figcaption" => 0.9,
        "h4" | "h5" | "h6" | "dt" => 0.8,
        "li" | "ul" | "ol" | "div" => 0.5,
        "span" => 0.3,
        _ => 0.4,
    }
}

/// 块评分指标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMetrics {
    /// 文本长度（字符）
    pub text_len: usize,
    /// HTML长度（字符）
    pub html_len: usize,
    /// 链接文本长度（字符）
    pub link_text_len: usize,
}

impl BlockMetrics {
    fn of(element: ElementRef<'_>) -> Self {
        let text: String = element.text().collect();
        let link_text_len = element
            .select(&LINK_SELECTOR)
            .map(|a| a.text().map(|t| t.trim().chars().count()).sum::<usize>())
            .sum();
        Self {
            text_len: text.trim().chars().count(),
            html_len: element.html().chars().count(),
            link_text_len,
        }
    }

    /// 综合评分，范围 0.0 - 1.0
    pub fn score(&self, tag: &str) -> f64 {
        if self.text_len == 0 {
            return 0.0;
        }
        let text_density = (self.text_len as f64 / self.html_len.max(1) as f64).min(1.0);
        let link_density = (self.link_text_len as f64 / self.text_len as f64).min(1.0);
        let length_score =
            ((self.text_len as f64 + 1.0).ln() / (TEXT_LENGTH_SATURATION + 1.0).ln()).min(1.0);

        TEXT_DENSITY_WEIGHT * text_density
            + LINK_DENSITY_WEIGHT * (1.0 - link_density)
            + TAG_WEIGHT * tag_weight(tag)
            + TEXT_LENGTH_WEIGHT * length_score
    }
}

/// 内容裁剪过滤器
///
/// 去除导航、页眉页脚等样板区域，并按文本密度、链接密度、标签权重
/// 和文本长度为叶子块评分，丢弃低于阈值的块
pub struct PruningContentFilter {
    threshold: f64,
}

impl PruningContentFilter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// 过滤HTML文档，返回保留下来的HTML片段
    pub fn filter(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        let root = document
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| document.root_element());

        let mut out = String::new();
        self.emit_children(root, &mut out);
        debug!(
            "Pruned content from {} to {} bytes (threshold {})",
            html.len(),
            out.len(),
            self.threshold
        );
        out
    }

    fn emit_children(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let text: &str = text;
                    out.push_str(&html_escape::encode_text(text));
                }
                Node::Element(_) => {
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        self.emit_element(child_ref, out);
                    }
                }
                _ => {}
            }
        }
    }

    fn emit_element(&self, element: ElementRef<'_>, out: &mut String) {
        let el = element.value();
        let name = el.name();
        if EXCLUDED_TAGS.contains(&name) || self.is_boilerplate(element) {
            return;
        }

        if is_block_tag(name) && !has_block_children(element) {
            let metrics = BlockMetrics::of(element);
            let score = metrics.score(name);
            if score < self.threshold {
                return;
            }
            out.push_str(&element.html());
            return;
        }

        // Containers and inline elements: keep the tag, decide per child
        out.push('<');
        out.push_str(name);
        for (attr, value) in el.attrs() {
            if matches!(attr, "href" | "src" | "alt") {
                out.push_str(&format!(
                    " {}=\"{}\"",
                    attr,
                    html_escape::encode_double_quoted_attribute(value)
                ));
            }
        }
        out.push('>');
        self.emit_children(element, out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    fn is_boilerplate(&self, element: ElementRef<'_>) -> bool {
        let el = element.value();
        let role = el.attr("role").unwrap_or("");
        if matches!(role, "navigation" | "banner" | "contentinfo" | "complementary") {
            return true;
        }
        let class_id = format!("{} {}", el.attr("class").unwrap_or(""), el.id().unwrap_or(""));
        !class_id.trim().is_empty() && NEGATIVE_PATTERN.is_match(&class_id)
    }
}

fn is_block_tag(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

fn has_block_children(element: ElementRef<'_>) -> bool {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .any(|c| is_block_tag(c.value().name()))
}
