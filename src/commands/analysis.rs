use anyhow::{Context, Result};
use std::path::Path;

use super::print_json;
use crate::api::MAX_BATCH_SIZE;
use crate::client::ApiClient;
use crate::models::{Pagination, StatsResponse};
use crate::utils::truncate_text;

const STATS_PAGE_SIZE: u32 = 100;

pub async fn analyze(client: &ApiClient, text: &str) -> Result<()> {
    let result = client
        .content()
        .analyze_text(text)
        .await
        .context("Analysis failed")?;

    print_json(&result)
}

/// Analyze a file with one text per line, in chunks the API accepts
pub async fn batch(client: &ApiClient, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let texts: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if texts.is_empty() {
        println!("No texts found in {}", file.display());
        return Ok(());
    }

    let content_api = client.content();
    for (index, chunk) in texts.chunks(MAX_BATCH_SIZE).enumerate() {
        tracing::info!(chunk = index, size = chunk.len(), "Submitting batch");
        let result = content_api
            .analyze_batch(chunk)
            .await
            .with_context(|| format!("Batch {} failed", index + 1))?;

        for (text, prediction) in chunk.iter().zip(&result.predictions) {
            println!(
                "{:<8} {:>5.1}%  {}",
                if prediction.is_scam { "SCAM" } else { "ok" },
                prediction.confidence * 100.0,
                truncate_text(text, 60)
            );
        }
    }

    Ok(())
}

pub async fn history(client: &ApiClient, pagination: Pagination) -> Result<()> {
    let history = client
        .content()
        .get_history(pagination)
        .await
        .context("Failed to load history")?;

    if history.checks.is_empty() {
        println!("No analyses yet");
        return Ok(());
    }

    println!("Analyses (page {}, {} total)", history.page, history.total);
    println!("================================");

    for check in &history.checks {
        let title = if check.title.is_empty() {
            &check.content
        } else {
            &check.title
        };
        println!(
            "#{:<6} {:<11} {:>5.1}  {}  {}",
            check.id,
            check.danger_level,
            check.danger_score,
            check.created_at.format("%Y-%m-%d %H:%M"),
            truncate_text(title, 50)
        );
    }

    Ok(())
}

/// Summarize the user's whole history by danger level
pub async fn stats(client: &ApiClient) -> Result<()> {
    let checks = client
        .content()
        .get_full_history(STATS_PAGE_SIZE)
        .await
        .context("Failed to load history for statistics")?;

    print_json(&StatsResponse::from_checks(&checks))
}
