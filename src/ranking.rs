//! Static rarity / evolution-stage / variant tier tables.
//!
//! Every lookup falls back to 0 for labels the tables don't know, so the
//! sort engine never has to handle a missing key.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref RARITY_TIERS: HashMap<&'static str, u32> = HashMap::from([
        ("Common", 1),
        ("Uncommon", 2),
        ("Rare", 3),
        ("Rare ACE", 3),
        ("Rare Prime", 3),
        ("Promo", 3),
        ("Rare BREAK", 4),
        ("Rare Holo", 4),
        ("Rare Holo EX", 4),
        ("Rare Holo GX", 4),
        ("Rare Holo LV.X", 4),
        ("Rare Holo Star", 4),
        ("Rare Holo V", 4),
        ("Rare Holo VMAX", 4),
        ("Amazing Rare", 5),
        ("LEGEND", 5),
        ("Ultra Rare", 5),
        ("Rare Ultra", 5),
        ("Rare Prism Star", 5),
        ("Secret Rare", 6),
        ("Rare Secret", 6),
        ("Rare Rainbow", 6),
        ("Rare Shining", 6),
        ("Rare Shiny", 6),
        ("Rare Shiny GX", 6),
        ("Rare MEGA", 6),
        ("Illustration Rare", 7),
        ("Double Rare", 7),
    ]);
    static ref STAGE_TIERS: HashMap<&'static str, u32> = HashMap::from([
        ("Baby", 0),
        ("Basic", 1),
        ("Stage 1", 2),
        ("Stage 2", 3),
        ("Level-Up", 4),
        ("Restored", 1),
    ]);
    static ref EX_TIERS: HashMap<&'static str, u32> = {
        let mut tiers = STAGE_TIERS.clone();
        tiers.extend([
            ("GX", 5),
            ("V", 6),
            ("VMAX", 7),
            ("BREAK", 8),
            ("LEGEND", 8),
            ("EX", 9),
            ("ex", 9),
            ("MEGA", 10),
        ]);
        tiers
    };
}

pub fn rarity_tier(label: &str) -> u32 {
    RARITY_TIERS.get(label).copied().unwrap_or(0)
}

pub fn stage_tier(label: &str) -> u32 {
    STAGE_TIERS.get(label).copied().unwrap_or(0)
}

pub fn ex_tier(label: &str) -> u32 {
    EX_TIERS.get(label).copied().unwrap_or(0)
}

/// True if the label names an evolution stage (including Baby, whose tier is 0)
pub fn is_stage_label(label: &str) -> bool {
    STAGE_TIERS.contains_key(label)
}

/// Tier of the first subtype that is a known stage label
pub fn first_stage_tier(subtypes: &[String]) -> u32 {
    subtypes
        .iter()
        .find(|s| is_stage_label(s))
        .map(|s| stage_tier(s))
        .unwrap_or(0)
}

/// Highest stage tier over all subtypes
pub fn max_stage_tier(subtypes: &[String]) -> u32 {
    subtypes.iter().map(|s| stage_tier(s)).max().unwrap_or(0)
}

/// Highest variant tier over all subtypes
pub fn max_ex_tier(subtypes: &[String]) -> u32 {
    subtypes.iter().map(|s| ex_tier(s)).max().unwrap_or(0)
}

/// `ex_tier * 100 + stage_tier`, so base forms order before their variants
pub fn composite_score(subtypes: &[String]) -> u32 {
    max_ex_tier(subtypes) * 100 + max_stage_tier(subtypes)
}
