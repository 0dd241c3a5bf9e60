//! `prodvec search`: embed a query and list the nearest products.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use prodvec_core::search::{SearchService, parse_metadata_filter};
use prodvec_types::record::SearchHit;

use crate::state::AppState;

pub async fn search(
    state: &AppState,
    query: &str,
    limit: usize,
    filters: &[String],
    json: bool,
) -> Result<()> {
    let filter = if filters.is_empty() {
        None
    } else {
        Some(parse_metadata_filter(filters).map_err(|e| anyhow!(e))?)
    };

    let service = SearchService::new(state.embedder()?, state.store().await?);

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Searching...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    };
    let hits = service.search(query, limit, filter).await;
    spinner.finish_and_clear();
    let hits = hits?;

    if json {
        let results: Vec<serde_json::Value> = hits
            .iter()
            .map(|hit| {
                serde_json::json!({
                    "id": hit.id,
                    "distance": hit.distance,
                    "similarity": hit.similarity(),
                    "metadata": hit.metadata,
                    "content": hit.content,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!();
        println!(
            "  {} No products matched '{}'",
            style("i").blue().bold(),
            style(query).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", render_table(&hits));
    println!();
    Ok(())
}

fn render_table(hits: &[SearchHit]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Similarity").fg(Color::White),
        Cell::new("Product").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);

    for hit in hits {
        let similarity = hit.similarity();
        let sim_color = if similarity >= 0.7 {
            Color::Green
        } else if similarity >= 0.4 {
            Color::Yellow
        } else {
            Color::Red
        };

        table.add_row(vec![
            Cell::new(format!("{similarity:.4}")).fg(sim_color),
            Cell::new(metadata_text(hit, "product_name")),
            Cell::new(metadata_text(hit, "category")),
            Cell::new(truncate(&hit.content, 60)),
        ]);
    }
    table
}

fn metadata_text(hit: &SearchHit, key: &str) -> String {
    match hit.metadata.get(key) {
        None | Some(serde_json::Value::Null) => "-".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn hit(metadata: serde_json::Value) -> SearchHit {
        SearchHit {
            id: Uuid::nil(),
            metadata,
            content: "Gold Credit Card".to_string(),
            distance: 0.2,
        }
    }

    #[test]
    fn metadata_text_handles_missing_and_typed_values() {
        let h = hit(serde_json::json!({
            "product_name": "Gold",
            "category": null,
            "product_id": 7
        }));
        assert_eq!(metadata_text(&h, "product_name"), "Gold");
        assert_eq!(metadata_text(&h, "category"), "-");
        assert_eq!(metadata_text(&h, "product_id"), "7");
        assert_eq!(metadata_text(&h, "tags"), "-");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn table_has_one_row_per_hit() {
        let hits = vec![hit(serde_json::json!({})), hit(serde_json::json!({}))];
        let table = render_table(&hits);
        assert_eq!(table.row_iter().count(), 2);
    }
}
