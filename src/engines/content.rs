// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{PageResult, RunOptions};
use crate::utils::content_filter::PruningContentFilter;
use crate::utils::markdown::MarkdownGenerator;

/// 将页面HTML转换为整页markdown与裁剪后的markdown
pub fn render_page(html: &str, options: &RunOptions) -> PageResult {
    let generator = MarkdownGenerator::new(options.markdown.clone());
    let raw_markdown = generator.generate(html);

    let pruned = PruningContentFilter::new(options.pruning_threshold).filter(html);
    let fit_markdown = generator.generate_fragment(&pruned);

    PageResult::Fetched {
        raw_markdown,
        fit_markdown,
    }
}
