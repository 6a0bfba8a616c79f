// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 初始化指标系统
///
/// 安装Prometheus导出器并注册爬取相关指标
pub fn init_metrics(listen_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = listen_addr.parse()?;

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return Ok(());
    }

    describe_counter!("crawl_runs_total", "Total number of crawl invocations by mode");
    describe_counter!("crawl_pages_total", "Total number of pages crawled by outcome");
    describe_histogram!(
        "crawl_batch_duration_seconds",
        "Duration of a parallel crawl batch in seconds"
    );
    describe_gauge!(
        "crawl_peak_memory_bytes",
        "Peak process memory observed during the last parallel crawl"
    );
    describe_counter!(
        "sitemap_fetch_failures_total",
        "Total number of sitemap documents that could not be fetched or parsed"
    );

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
