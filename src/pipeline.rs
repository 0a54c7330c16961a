use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::extract::details::{self, DetailFields};
use crate::extract::row::{self, RowFields};
use crate::extract::CompiledSelectors;
use crate::fetch::Fetch;
use crate::render::Render;
use crate::store::Record;
use crate::urls;

/// Totals for one full pass.
pub struct RunReport {
    pub records: Vec<Record>,
    pub pages_scraped: usize,
    pub pages_skipped: usize,
    pub detail_errors: usize,
}

/// Drive the full pass: pages strictly sequential, rows within a page
/// concurrent. The accumulator is appended to only between pages, after all
/// of a page's rows have settled.
pub async fn run(
    cfg: &ScrapeConfig,
    renderer: &dyn Render,
    fetcher: Arc<dyn Fetch>,
) -> Result<RunReport> {
    let selectors = Arc::new(CompiledSelectors::compile(&cfg.selectors)?);
    let base = urls::origin(&cfg.source)?;

    let mut report = RunReport {
        records: Vec::new(),
        pages_scraped: 0,
        pages_skipped: 0,
        detail_errors: 0,
    };

    for page in 0..=cfg.max_page {
        let url = urls::listing_url(&cfg.source, page)?;
        info!("Rendering page {}: {}", page, url);

        let html = match renderer.render(&url, &selectors.wait_for).await {
            Ok(html) => html,
            Err(e) if page == 0 => {
                // No marker element on the first page means the site is
                // unreachable or its markup changed.
                return Err(e.context("initial listing page did not render"));
            }
            Err(e) => {
                warn!("Page {} did not render, skipping: {}", page, e);
                report.pages_skipped += 1;
                continue;
            }
        };

        let (records, errors) = collect_page(
            &html,
            &base,
            cfg.concurrency,
            Arc::clone(&selectors),
            Arc::clone(&fetcher),
        )
        .await;
        info!(
            "Page {}: {} records ({} detail errors)",
            page,
            records.len(),
            errors
        );
        report.records.extend(records);
        report.detail_errors += errors;
        report.pages_scraped += 1;
    }

    Ok(report)
}

/// Extract every row of one rendered listing page. Detail fetches run
/// concurrently; a failed fetch degrades that row's optional fields and
/// leaves its siblings alone. Records arrive in completion order, not DOM
/// order.
async fn collect_page(
    html: &str,
    base: &Url,
    concurrency: usize,
    selectors: Arc<CompiledSelectors>,
    fetcher: Arc<dyn Fetch>,
) -> (Vec<Record>, usize) {
    let rows = row::listing_rows(html, &selectors, base);
    let concurrency = concurrency.max(1);

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let (tx, mut rx) = mpsc::channel::<(Record, bool)>(concurrency * 2);

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    for fields in rows {
        let sem = Arc::clone(&semaphore);
        let selectors = Arc::clone(&selectors);
        let fetcher = Arc::clone(&fetcher);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let (details, failed) = fetch_details(&*fetcher, &selectors, &fields).await;
            let _ = tx.send((row::build_record(fields, details), failed)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut records = Vec::new();
    let mut errors = 0;
    while let Some((record, failed)) = rx.recv().await {
        if failed {
            errors += 1;
        }
        records.push(record);
        pb.inc(1);
    }
    pb.finish_and_clear();

    (records, errors)
}

async fn fetch_details(
    fetcher: &dyn Fetch,
    selectors: &CompiledSelectors,
    fields: &RowFields,
) -> (DetailFields, bool) {
    match fetcher.fetch_text(&fields.detail_page_url).await {
        Ok(body) => (details::extract(&body, selectors, &fields.name), false),
        Err(e) => {
            warn!("Detail page fetch failed for {}: {}", fields.name, e);
            (DetailFields::unavailable(), true)
        }
    }
}
