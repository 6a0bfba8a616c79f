// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crawldigest::config::settings::{EngineKind, Settings};
use crawldigest::domain::services::crawl_service::{CrawlService, CrawlServiceConfig};
use crawldigest::domain::services::sitemap_resolver::SitemapResolver;
use crawldigest::engines::browser_engine::BrowserEngine;
use crawldigest::engines::http_engine::HttpEngine;
use crawldigest::engines::traits::FetchEngine;
use crawldigest::infrastructure::metrics::init_metrics;
use crawldigest::infrastructure::observability::memory::SysinfoMemoryProbe;
use crawldigest::infrastructure::sitemap::HttpSitemapSource;
use crawldigest::presentation::routes;
use crawldigest::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting crawldigest...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Metrics exporter
    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr)?;
    }

    // 4. Engine and collaborators
    let engine: Arc<dyn FetchEngine> = match settings.crawler.engine {
        EngineKind::Browser => Arc::new(BrowserEngine::new(settings.browser.clone())),
        EngineKind::Http => Arc::new(HttpEngine),
    };
    info!("Using {} engine", engine.name());

    let source = HttpSitemapSource::new(Duration::from_secs(settings.sitemap.timeout_secs))?;
    let resolver = SitemapResolver::with_limits(
        Arc::new(source),
        settings.sitemap.max_depth,
        settings.sitemap.max_urls,
    );

    let service = Arc::new(CrawlService::new(
        engine,
        resolver,
        Arc::new(SysinfoMemoryProbe::new()),
        CrawlServiceConfig {
            run_options: settings.run_options(),
            max_concurrent: settings.crawler.max_concurrent,
            session_strategy: settings.crawler.session_strategy,
            batch_timeout: settings.batch_timeout(),
            default_mode: settings.crawler.default_mode,
        },
    ));

    // 5. Start HTTP server
    let app = routes::routes(service);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down crawldigest");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
