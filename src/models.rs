use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Row ids and OCR fields arrive as either strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(StringOrNumber::into_string)
        .unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(StringOrNumber::into_string))
}

/// Catalog snapshot of a card, as joined into collection rows and returned
/// by the card lookup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub supertype: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub subtypes: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub hp: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub types: Vec<String>,
    #[serde(default)]
    pub evolves_from: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub retreat_cost: Vec<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub national_pokedex_numbers: Vec<u32>,
    #[serde(default)]
    pub image_small: Option<String>,
    #[serde(default)]
    pub image_large: Option<String>,
}

impl CardDetails {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Get the primary image URL (large, falling back to small)
    pub fn image_url(&self) -> Option<&str> {
        self.image_large
            .as_deref()
            .or(self.image_small.as_deref())
    }

    pub fn first_pokedex_number(&self) -> Option<u32> {
        self.national_pokedex_numbers.first().copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cost: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub damage: Option<String>,
    /// The catalog stores attack text as `description`
    #[serde(default, alias = "description")]
    pub text: Option<String>,
}

/// Weakness or resistance entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeModifier {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One owned card in a user's collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub card_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: u32,
    #[serde(default, alias = "acquired_at")]
    pub last_scanned_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub card_details: CardDetails,
    #[serde(default, deserialize_with = "nullable")]
    pub attack_details: Vec<Attack>,
    #[serde(default, deserialize_with = "nullable")]
    pub weakness_details: Vec<TypeModifier>,
    #[serde(default, deserialize_with = "nullable")]
    pub resistance_details: Vec<TypeModifier>,
    #[serde(default, deserialize_with = "nullable")]
    pub ability_details: Vec<Ability>,
}

impl CollectionItem {
    pub fn name(&self) -> &str {
        self.card_details.name()
    }

    /// Parse the scan timestamp; accepts RFC 3339 or a naive ISO timestamp (taken as UTC)
    pub fn last_scanned(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_scanned_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

/// Derive a catalog card id from a reference image file name.
///
/// Reference images are named `<anything>_<set>_<number>.jpg`; the id is
/// `<set>-<number>`.
pub fn card_id_from_filename(filename: &str) -> Option<String> {
    let parts: Vec<&str> = filename.split('_').collect();
    if parts.len() < 2 {
        return None;
    }
    let number = parts[parts.len() - 1].replace(".jpg", "");
    let set = parts[parts.len() - 2];
    if number.is_empty() || set.is_empty() {
        return None;
    }
    Some(format!("{set}-{number}"))
}

/// One ranked guess from the recognition service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(default)]
    pub rank: Option<u32>,
    pub card_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub card_path: String,
    pub similarity: f64,
}

impl MatchCandidate {
    pub fn card_id(&self) -> Option<String> {
        card_id_from_filename(&self.card_name)
    }
}

/// Text the recognition service read off the card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrInfo {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub hp: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub card_number: Option<String>,
}

impl OcrInfo {
    /// Summary shown on the OCR step of the scan process view
    pub fn summary(&self) -> String {
        fn or_missing(value: &Option<String>) -> &str {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or("Not detected")
        }
        format!(
            "Detected Card Information:\n  Name: {}\n  HP: {}\n  Card Number: {}",
            or_missing(&self.name),
            or_missing(&self.hp),
            or_missing(&self.card_number)
        )
    }
}

/// One ranked variant for a detected card in a multi-card scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchVariant {
    #[serde(default)]
    pub rank: u32,
    pub card_id: String,
    pub card_name: String,
    pub similarity: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub set_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub card_number_in_set: String,
    #[serde(default)]
    pub card_data: Option<CardDetails>,
}

/// A card found on a multi-card photo, with its best match and all ranked variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedCard {
    pub card_number: u32,
    #[serde(default)]
    pub detection_confidence: f64,
    pub card_id: String,
    pub card_name: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub set_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub card_number_in_set: String,
    #[serde(default, deserialize_with = "nullable")]
    pub cropped_image: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bbox: Vec<f64>,
    #[serde(default)]
    pub card_data: Option<CardDetails>,
    #[serde(default)]
    pub ocr_info: Option<OcrInfo>,
    #[serde(default, deserialize_with = "nullable")]
    pub all_matches: Vec<MatchVariant>,
}

impl DetectedCard {
    /// Number of variants the reviewer can cycle through (at least the best match)
    pub fn variant_count(&self) -> usize {
        self.all_matches.len().max(1)
    }

    /// The variant at `index`, falling back to the best match when the
    /// service sent no ranked list.
    pub fn variant(&self, index: usize) -> MatchVariant {
        match self.all_matches.get(index) {
            Some(variant) => variant.clone(),
            None => MatchVariant {
                rank: 1,
                card_id: self.card_id.clone(),
                card_name: self.card_name.clone(),
                similarity: self.similarity,
                set_name: self.set_name.clone(),
                card_number_in_set: self.card_number_in_set.clone(),
                card_data: self.card_data.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub unique_cards: u64,
    #[serde(default)]
    pub total_cards: u64,
}

/// Account row mirrored alongside the identity provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
