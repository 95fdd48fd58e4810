use crate::models::CollectionItem;
use crate::ranking;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    /// Variant suffixes dropped when deriving a species from a card name
    static ref VARIANT_SUFFIX: Regex = Regex::new(
        r"(?i)\s+(?:EX|GX|MEGA|VMAX|VSTAR|V|LEGEND|BREAK|Prime|Star|Shining)\b"
    )
    .expect("variant suffix pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Set,
    Rarity,
    Quantity,
    Hp,
    Type,
    Damage,
    Stage,
    Ability,
    Ex,
    Family,
    Pokedex,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Name,
            SortKey::Set,
            SortKey::Rarity,
            SortKey::Quantity,
            SortKey::Hp,
            SortKey::Type,
            SortKey::Damage,
            SortKey::Stage,
            SortKey::Ability,
            SortKey::Ex,
            SortKey::Family,
            SortKey::Pokedex,
        ]
    }

    /// Lower-case label used on the command line and in saved settings
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Set => "set",
            SortKey::Rarity => "rarity",
            SortKey::Quantity => "quantity",
            SortKey::Hp => "hp",
            SortKey::Type => "type",
            SortKey::Damage => "damage",
            SortKey::Stage => "stage",
            SortKey::Ability => "ability",
            SortKey::Ex => "ex",
            SortKey::Family => "family",
            SortKey::Pokedex => "pokedex",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Set => "Set",
            SortKey::Rarity => "Rarity",
            SortKey::Quantity => "Quantity",
            SortKey::Hp => "HP",
            SortKey::Type => "Type",
            SortKey::Damage => "Damage",
            SortKey::Stage => "Stage",
            SortKey::Ability => "Ability",
            SortKey::Ex => "EX Tier",
            SortKey::Family => "Family",
            SortKey::Pokedex => "Pokedex",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::all()
            .iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Grouping id for a card's evolutionary line.
///
/// Pokédex-numbered families order before name-derived ones, so the two kinds
/// are never compared against each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FamilyKey {
    Pokedex(u32),
    Name(String),
}

pub fn family_key(item: &CollectionItem) -> FamilyKey {
    let card = &item.card_details;
    if let Some(number) = card.first_pokedex_number() {
        return FamilyKey::Pokedex(number);
    }
    if let Some(base) = card.evolves_from.as_deref().filter(|s| !s.is_empty()) {
        return FamilyKey::Name(base.to_lowercase());
    }
    FamilyKey::Name(species_name(card.name()))
}

/// Card name with variant suffixes (EX, GX, V, ...) removed, lower-cased
pub fn species_name(name: &str) -> String {
    VARIANT_SUFFIX.replace_all(name, "").trim().to_lowercase()
}

/// `parseInt`-style parse: optional sign and leading digits, anything else is 0
pub fn parse_leading_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn max_damage(item: &CollectionItem) -> i64 {
    item.attack_details
        .iter()
        .map(|attack| attack.damage.as_deref().map(parse_leading_int).unwrap_or(0))
        .fold(0, i64::max)
}

fn lower(value: Option<&str>) -> String {
    value.unwrap_or("").to_lowercase()
}

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Text(String),
    Number(i64),
    Family(FamilyKey, u32),
}

impl SortValue {
    fn of(item: &CollectionItem, key: SortKey) -> Self {
        let card = &item.card_details;
        match key {
            SortKey::Name => SortValue::Text(lower(card.name.as_deref())),
            SortKey::Set => SortValue::Text(lower(card.set_name.as_deref())),
            SortKey::Type => SortValue::Text(lower(card.types.first().map(String::as_str))),
            SortKey::Ability => SortValue::Text(lower(
                item.ability_details
                    .first()
                    .and_then(|ability| ability.name.as_deref()),
            )),
            SortKey::Rarity => SortValue::Number(
                ranking::rarity_tier(card.rarity.as_deref().unwrap_or("")) as i64,
            ),
            SortKey::Stage => SortValue::Number(ranking::first_stage_tier(&card.subtypes) as i64),
            SortKey::Ex => SortValue::Number(ranking::max_ex_tier(&card.subtypes) as i64),
            SortKey::Quantity => SortValue::Number(item.quantity as i64),
            SortKey::Hp => SortValue::Number(card.hp.as_deref().map(parse_leading_int).unwrap_or(0)),
            SortKey::Damage => SortValue::Number(max_damage(item)),
            SortKey::Pokedex => SortValue::Number(
                card.first_pokedex_number()
                    .map(i64::from)
                    .unwrap_or(i64::MAX),
            ),
            SortKey::Family => {
                SortValue::Family(family_key(item), ranking::composite_score(&card.subtypes))
            }
        }
    }

    fn compare(&self, other: &Self, order: SortOrder) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => order.apply(a.cmp(b)),
            (SortValue::Number(a), SortValue::Number(b)) => order.apply(a.cmp(b)),
            (SortValue::Family(fa, sa), SortValue::Family(fb, sb)) => {
                if fa == fb {
                    // Within a family the base form always leads
                    sa.cmp(sb)
                } else {
                    order.apply(fa.cmp(fb))
                }
            }
            _ => Ordering::Equal,
        }
    }
}

/// Items whose card name contains `query`, case-insensitively. A blank query
/// keeps everything.
pub fn filter_by_name<'a>(items: &'a [CollectionItem], query: &str) -> Vec<&'a CollectionItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&query))
        .collect()
}

/// Filter by name, then stable-sort by `key` in `order`. The input is not touched.
pub fn sorted_view<'a>(
    items: &'a [CollectionItem],
    key: SortKey,
    order: SortOrder,
    query: &str,
) -> Vec<&'a CollectionItem> {
    let mut keyed: Vec<(SortValue, &CollectionItem)> = filter_by_name(items, query)
        .into_iter()
        .map(|item| (SortValue::of(item, key), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b, order));

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Like [`sorted_view`], but takes the sort key as a label. Unknown labels
/// leave the filtered items in their original order.
pub fn sorted_view_by_label<'a>(
    items: &'a [CollectionItem],
    label: &str,
    order: SortOrder,
    query: &str,
) -> Vec<&'a CollectionItem> {
    match label.parse::<SortKey>() {
        Ok(key) => sorted_view(items, key, order, query),
        Err(e) => {
            log::debug!("{e}, keeping collection order");
            filter_by_name(items, query)
        }
    }
}

#[cfg(test)]
#[path = "sort_tests.rs"]
mod tests;
