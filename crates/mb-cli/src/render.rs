//! Terminal rendering

use mb_core::{Catalog, Category, Labels, Language, MoodResult};
use mb_oracle::{Recommendation, RecommendationSource, shopping_search_url};
use mb_reels::MachineSnapshot;
use mb_state::UsageState;

const REEL_WIDTH: usize = 16;

/// Reel window line, one name per reel
pub fn reel_line(catalog: &Catalog, lang: Language, frame: [usize; 4]) -> String {
    let cells: Vec<String> = Category::ALL
        .iter()
        .map(|category| {
            let name = catalog
                .get(*category, frame[category.index()])
                .map(|item| item.display_name(lang))
                .unwrap_or("?");
            pad(name, REEL_WIDTH)
        })
        .collect();
    format!("| {} |", cells.join(" | "))
}

/// `energy: R / LIMIT`, or the admin notice
pub fn energy_line(labels: &Labels, usage: &UsageState, remaining: u32, limit: u32) -> String {
    if usage.admin_override {
        format!("{}: ∞ ({})", labels.energy, labels.admin_on)
    } else {
        format!("{}: {} / {}", labels.energy, remaining, limit)
    }
}

pub fn status_lines(labels: &Labels, snapshot: &MachineSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("{} · {}", labels.title, labels.subtitle),
        energy_line(labels, &snapshot.usage, snapshot.remaining, snapshot.limit),
        format!(
            "{} · {} {}",
            snapshot.usage.date,
            snapshot.language.code(),
            snapshot.language.native_name()
        ),
    ];
    if snapshot.usage.limit_reached {
        lines.push(format!("{}. {}", labels.out_of_energy, labels.recharge_needed));
    }
    lines
}

pub fn result_lines(labels: &Labels, result: &MoodResult) -> Vec<String> {
    let mut lines = vec![format!("── {} {}% ──", labels.result_harmony, result.score)];
    for (category, name) in Category::ALL.iter().zip(result.display_names()) {
        let image = result.selections.get(*category).image_or_placeholder();
        lines.push(format!("  {:<9} {}", category.tag(), name));
        lines.push(format!("  {:<9} {}", "", image));
    }
    lines.push(String::new());
    lines.push(format!("{}:", labels.commentary_title));
    lines.push(format!("  {}", result.commentary));
    lines
}

pub fn recommendation_lines(labels: &Labels, rec: &Recommendation) -> Vec<String> {
    let mut lines = vec![
        format!("{}: {} ({})", labels.lucky_item, rec.item_name, rec.price_label),
        format!("  {}", rec.rationale),
    ];
    if let Some(image) = &rec.image_url {
        lines.push(format!("  {}", image));
    }
    lines.push(format!(
        "{} {}",
        labels.shop_link,
        shopping_search_url(&rec.search_keyword)
    ));
    if rec.source != RecommendationSource::Service {
        log::debug!("[Render] Showing {:?} recommendation", rec.source);
    }
    lines
}

/// Pad by character count; truncates with an ellipsis when too long
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
