use crate::api::MultiScanResponse;
use crate::leaderboard::LeaderboardView;
use crate::models::{CardDetails, CollectionItem, DetectedCard, MatchCandidate, MatchVariant};
use crate::review::{CardDecision, MultiCardReview};

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

/// Catalog file names look like `Mr_Mime_base2_6.jpg`
fn display_file_name(card_name: &str) -> String {
    card_name.replace('_', " ").replace(".jpg", "")
}

pub fn format_collection(
    items: &[&CollectionItem],
    total_cards: usize,
    total_quantity: u64,
) -> String {
    let mut output = format!("{total_cards} unique cards, {total_quantity} total\n\n");
    if items.is_empty() {
        output.push_str("No cards match.\n");
        return output;
    }
    for item in items {
        let details = &item.card_details;
        output.push_str(&format!(
            "{:<12} {:<28} {:<22} {:<18} x{}\n",
            item.card_id,
            item.name(),
            or_dash(details.set_name.as_deref()),
            or_dash(details.rarity.as_deref()),
            item.quantity
        ));
    }
    output
}

fn push_card_details(output: &mut String, card: &CardDetails) {
    output.push_str(&format!("{}\n", or_dash(card.name.as_deref())));
    output.push_str(&format!(
        "  Set: {} #{}\n",
        or_dash(card.set_name.as_deref()),
        or_dash(card.number.as_deref())
    ));
    output.push_str(&format!("  Rarity: {}\n", or_dash(card.rarity.as_deref())));
    if let Some(supertype) = card.supertype.as_deref() {
        let subtypes = if card.subtypes.is_empty() {
            String::new()
        } else {
            format!(" - {}", card.subtypes.join(", "))
        };
        output.push_str(&format!("  {supertype}{subtypes}\n"));
    }
    if let Some(hp) = card.hp.as_deref() {
        output.push_str(&format!("  HP: {hp}\n"));
    }
    if !card.types.is_empty() {
        output.push_str(&format!("  Types: {}\n", card.types.join(", ")));
    }
    if let Some(from) = card.evolves_from.as_deref() {
        output.push_str(&format!("  Evolves from: {from}\n"));
    }
    if !card.national_pokedex_numbers.is_empty() {
        let numbers: Vec<String> = card
            .national_pokedex_numbers
            .iter()
            .map(|n| format!("#{n}"))
            .collect();
        output.push_str(&format!("  Pokédex: {}\n", numbers.join(", ")));
    }
    if let Some(url) = card.image_url() {
        output.push_str(&format!("  Image: {url}\n"));
    }
}

/// Full detail view of one owned card
pub fn format_item_details(item: &CollectionItem) -> String {
    let mut output = String::new();
    push_card_details(&mut output, &item.card_details);
    output.push_str(&format!("  Owned: {}\n", item.quantity));
    if let Some(scanned) = item.last_scanned() {
        output.push_str(&format!("  Last scanned: {}\n", scanned.format("%Y-%m-%d %H:%M")));
    }

    for ability in &item.ability_details {
        output.push_str(&format!(
            "  Ability: {} - {}\n",
            or_dash(ability.name.as_deref()),
            or_dash(ability.text.as_deref())
        ));
    }
    for attack in &item.attack_details {
        let cost = if attack.cost.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attack.cost.join(" "))
        };
        output.push_str(&format!(
            "  Attack: {}{} {}\n",
            attack.name,
            cost,
            attack.damage.as_deref().unwrap_or("")
        ));
        if let Some(text) = attack.text.as_deref().filter(|t| !t.is_empty()) {
            output.push_str(&format!("    {text}\n"));
        }
    }
    for weakness in &item.weakness_details {
        output.push_str(&format!("  Weakness: {} {}\n", weakness.kind, weakness.value));
    }
    for resistance in &item.resistance_details {
        output.push_str(&format!("  Resistance: {} {}\n", resistance.kind, resistance.value));
    }
    if !item.card_details.retreat_cost.is_empty() {
        output.push_str(&format!(
            "  Retreat: {}\n",
            item.card_details.retreat_cost.len()
        ));
    }
    if let Some(artist) = item.card_details.artist.as_deref() {
        output.push_str(&format!("  Illustrator: {artist}\n"));
    }
    if let Some(flavor) = item.card_details.flavor_text.as_deref() {
        output.push_str(&format!("  \"{flavor}\"\n"));
    }
    output
}

pub fn format_card(card: &CardDetails) -> String {
    let mut output = String::new();
    push_card_details(&mut output, card);
    output
}

/// "Is this your card?" prompt for a single-card candidate
pub fn format_candidate(
    candidate: &MatchCandidate,
    index: usize,
    total: usize,
    card: Option<&CardDetails>,
) -> String {
    let name = card
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| display_file_name(&candidate.card_name));
    let mut output = format!(
        "Is this your card? (match {} of {})\n  {}\n  Similarity: {:.1}%\n",
        index + 1,
        total,
        name,
        candidate.similarity * 100.0
    );
    if let Some(card_id) = candidate.card_id() {
        output.push_str(&format!("  Card ID: {card_id}\n"));
    }
    if let Some(card) = card {
        output.push_str(&format!(
            "  Set: {} #{}\n",
            or_dash(card.set_name.as_deref()),
            or_dash(card.number.as_deref())
        ));
        if let Some(url) = card.image_url() {
            output.push_str(&format!("  Image: {url}\n"));
        }
    }
    output
}

/// Detection summary shown before reviewing a multi-card scan
pub fn format_scan_overview(scan: &MultiScanResponse) -> String {
    let mut output = format!(
        "Detection Results\n  Detected: {}  Processed: {}  Failed: {}\n",
        scan.total_detected, scan.successfully_processed, scan.failed
    );
    for card in &scan.cards {
        output.push_str(&format!(
            "  Card {}: {} ({}) {:.1}%\n",
            card.card_number,
            card.card_name,
            card.card_id,
            card.similarity * 100.0
        ));
    }
    for failed in scan.failed_cards.iter().flatten() {
        output.push_str(&format!("  Card {}: failed - {}\n", failed.card_number, failed.error));
    }
    output
}

fn format_variant(card: &DetectedCard, variant: &MatchVariant, variant_index: usize) -> String {
    let name = variant
        .card_data
        .as_ref()
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| display_file_name(&variant.card_name));
    let mut output = format!(
        "  {} ({})\n  Set: {} #{}\n  Similarity: {:.1}%\n",
        name,
        variant.card_id,
        or_dash(Some(variant.set_name.as_str())),
        or_dash(Some(variant.card_number_in_set.as_str())),
        variant.similarity * 100.0
    );
    if card.variant_count() > 1 {
        output.push_str(&format!(
            "  Variant {} of {}\n",
            variant_index + 1,
            card.variant_count()
        ));
    }
    if let Some(info) = &card.ocr_info {
        output.push_str(&format!("{}\n", info.summary()));
    }
    output
}

/// The card currently under review in a multi-card scan
pub fn format_review_card(review: &MultiCardReview) -> String {
    let Some(card) = review.current_card() else {
        return String::new();
    };
    let summary = review.summary();
    let mut output = format!(
        "Review Card {}/{}\n  Added: {} • Skipped: {} • Remaining: {}\n",
        review.index() + 1,
        review.len(),
        summary.added,
        summary.skipped,
        summary.remaining()
    );
    match review.decision(review.index()) {
        CardDecision::Added => output.push_str("  ✓ Already Added\n"),
        CardDecision::Skipped => output.push_str("  Skipped\n"),
        CardDecision::Pending => {}
    }
    if let Some(variant) = review.current_variant() {
        output.push_str(&format_variant(card, &variant, review.variant_index()));
    }
    output
}

pub fn format_leaderboard(view: &LeaderboardView) -> String {
    let mut output = String::new();
    let items = view.current_items();
    if items.is_empty() {
        output.push_str("No collectors found.\n");
    }
    for (rank, entry) in items {
        let name = Some(entry.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Anonymous");
        output.push_str(&format!(
            "{:>3}. {:<24} {:>5} unique {:>6} total\n",
            rank, name, entry.unique_cards, entry.total_cards
        ));
    }
    output.push_str(&format!("Page {} of {}\n", view.page(), view.total_pages()));
    output
}
