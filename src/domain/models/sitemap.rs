// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

/// 站点地图错误类型
#[derive(Error, Debug)]
pub enum SitemapError {
    /// 网络传输失败
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
    /// XML解析失败
    #[error("XML parse error: {0}")]
    Parse(String),
    /// 根元素既不是urlset也不是sitemapindex
    #[error("Not a sitemap document (root element: {0})")]
    NotASitemap(String),
}

/// 站点地图中的单个页面条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// 页面绝对URL
    pub loc: String,
    /// 最后修改时间（原始文本）
    pub lastmod: Option<String>,
}

/// 解析后的站点地图文档
///
/// 通过包装元素区分：`<url><loc>` 为页面，`<sitemap><loc>` 为子站点地图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// 叶子站点地图
    Leaf(Vec<UrlEntry>),
    /// 站点地图索引
    Index(Vec<String>),
    /// 同时包含页面和子站点地图
    Mixed {
        pages: Vec<UrlEntry>,
        sitemaps: Vec<String>,
    },
}

/// sitemaps.org 协议命名空间
pub const SITEMAP_NAMESPACE: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

/// 条目包装元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Url,
    Sitemap,
}

/// 条目内被采集的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    Lastmod,
}

/// 元素是否属于站点地图协议：绑定到sitemaps.org命名空间或未声明命名空间
fn in_sitemap_namespace(ns: &ResolveResult<'_>) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == SITEMAP_NAMESPACE,
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

impl SitemapDocument {
    /// 解析站点地图XML
    ///
    /// 只采集根元素下 `<url>`/`<sitemap>` 的直接子元素 `<loc>`/`<lastmod>`，
    /// 图片、视频等扩展命名空间中的 `loc` 被忽略
    pub fn parse(xml: &str) -> Result<Self, SitemapError> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root: Option<String> = None;
        let mut pages = Vec::new();
        let mut sitemaps = Vec::new();

        // Root is depth 1, entries depth 2, their fields depth 3
        let mut depth = 0usize;
        let mut entry: Option<EntryKind> = None;
        let mut field: Option<Field> = None;
        let mut current_loc = String::new();
        let mut current_lastmod = String::new();

        loop {
            match reader.read_resolved_event() {
                Ok((ns, Event::Start(e))) => {
                    depth += 1;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if root.is_none() {
                        root = Some(name.clone());
                    }
                    if !in_sitemap_namespace(&ns) {
                        continue;
                    }
                    match (depth, name.as_str()) {
                        (2, "url") => {
                            entry = Some(EntryKind::Url);
                            current_loc.clear();
                            current_lastmod.clear();
                        }
                        (2, "sitemap") => {
                            entry = Some(EntryKind::Sitemap);
                            current_loc.clear();
                        }
                        (3, "loc") if entry.is_some() => field = Some(Field::Loc),
                        (3, "lastmod") if entry == Some(EntryKind::Url) => {
                            field = Some(Field::Lastmod)
                        }
                        _ => {}
                    }
                }
                Ok((_, Event::Empty(e))) => {
                    if root.is_none() {
                        root = Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                    }
                }
                Ok((_, Event::End(_))) => {
                    match depth {
                        3 => field = None,
                        2 => {
                            match entry.take() {
                                Some(EntryKind::Url) if !current_loc.is_empty() => {
                                    pages.push(UrlEntry {
                                        loc: current_loc.clone(),
                                        lastmod: (!current_lastmod.is_empty())
                                            .then(|| current_lastmod.clone()),
                                    });
                                }
                                Some(EntryKind::Sitemap) if !current_loc.is_empty() => {
                                    sitemaps.push(current_loc.clone());
                                }
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Ok((_, Event::Text(e))) => {
                    let text = e
                        .unescape()
                        .map_err(|e| SitemapError::Parse(e.to_string()))?;
                    Self::capture(text.trim(), field, &mut current_loc, &mut current_lastmod);
                }
                Ok((_, Event::CData(e))) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    Self::capture(text.trim(), field, &mut current_loc, &mut current_lastmod);
                }
                Ok((_, Event::Eof)) => break,
                Err(e) => return Err(SitemapError::Parse(e.to_string())),
                _ => {}
            }
        }

        match root.as_deref() {
            Some("urlset") | Some("sitemapindex") => {}
            Some(other) => return Err(SitemapError::NotASitemap(other.to_string())),
            None => return Err(SitemapError::Parse("empty document".to_string())),
        }

        Ok(match (pages.is_empty(), sitemaps.is_empty()) {
            (_, true) => Self::Leaf(pages),
            (true, false) => Self::Index(sitemaps),
            (false, false) => Self::Mixed { pages, sitemaps },
        })
    }

    fn capture(text: &str, field: Option<Field>, loc: &mut String, lastmod: &mut String) {
        if text.is_empty() {
            return;
        }
        match field {
            Some(Field::Loc) => loc.push_str(text),
            Some(Field::Lastmod) => lastmod.push_str(text),
            None => {}
        }
    }

    /// 页面条目
    pub fn pages(&self) -> &[UrlEntry] {
        match self {
            Self::Leaf(pages) | Self::Mixed { pages, .. } => pages,
            Self::Index(_) => &[],
        }
    }

    /// 子站点地图URL
    pub fn sitemaps(&self) -> &[String] {
        match self {
            Self::Index(sitemaps) | Self::Mixed { sitemaps, .. } => sitemaps,
            Self::Leaf(_) => &[],
        }
    }
}
