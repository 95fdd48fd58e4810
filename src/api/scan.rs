use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::response::read_envelope;
use super::ScannerApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{CardDetails, DetectedCard, MatchCandidate, OcrInfo};

/// Message used when a multi-card scan finds nothing usable
pub const NO_CARDS_DETECTED: &str = "No cards detected with sufficient confidence";

/// The recognition service's top pick for a single-card scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub card_id: String,
    pub card_name: String,
    #[serde(default)]
    pub card_path: Option<String>,
    pub similarity: f64,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
}

/// Intermediate images returned by the extra-info endpoint, as data URLs
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessImages {
    pub captured: String,
    pub bounding_box: String,
    pub cropped: String,
    pub ocr_annotated: String,
}

/// Single-card scan result (`/scan_card/` and `/scan_card_extra_info/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub card_info: Option<OcrInfo>,
    #[serde(default)]
    pub best_match: Option<BestMatch>,
    #[serde(default)]
    pub top_matches: Option<Vec<MatchCandidate>>,
    #[serde(default)]
    pub card_data: Option<CardDetails>,
    #[serde(default)]
    pub base_image: Option<String>,
    #[serde(default)]
    pub bbox_image: Option<String>,
    #[serde(default)]
    pub cropped_image: Option<String>,
    #[serde(default)]
    pub annotated_image: Option<String>,
}

impl ScanResponse {
    pub fn matches(&self) -> &[MatchCandidate] {
        self.top_matches.as_deref().unwrap_or(&[])
    }

    /// All four process images, if the response carried them
    pub fn process_images(&self) -> Option<ProcessImages> {
        Some(ProcessImages {
            captured: self.base_image.clone()?,
            bounding_box: self.bbox_image.clone()?,
            cropped: self.cropped_image.clone()?,
            ocr_annotated: self.annotated_image.clone()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailedCard {
    pub card_number: u32,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Multi-card scan result (`/scan_multiple_cards/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiScanResponse {
    #[serde(default)]
    pub total_detected: u32,
    #[serde(default)]
    pub successfully_processed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub detection_image: Option<String>,
    #[serde(default)]
    pub cards: Vec<DetectedCard>,
    #[serde(default)]
    pub failed_cards: Option<Vec<FailedCard>>,
}

#[derive(Debug, Deserialize)]
struct RawMultiScan {
    #[serde(default)]
    success: Option<bool>,
    #[serde(flatten)]
    scan: MultiScanResponse,
}

/// Catalog lookup result (`/card/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardLookup {
    pub card_data: CardDetails,
}

fn image_form(image: Vec<u8>, filename: &'static str) -> ApiResult<Form> {
    let part = Part::bytes(image)
        .file_name(filename)
        .mime_str("image/jpeg")?;
    Ok(Form::new().part("file", part))
}

impl ScannerApi {
    /// Upload a photo of one card. With `extra_info` the response also carries
    /// the intermediate detection images and OCR text.
    pub async fn scan_card(&self, image: Vec<u8>, extra_info: bool) -> ApiResult<ScanResponse> {
        let path = if extra_info {
            "/scan_card_extra_info/"
        } else {
            "/scan_card/"
        };
        log::info!("Scanning card image ({} bytes) via {}", image.len(), path);

        let response = self
            .post(path)
            .multipart(image_form(image, "card.jpg")?)
            .send()
            .await?;
        let scan: ScanResponse = read_envelope(response).await?;

        log::info!("Scan returned {} candidate(s)", scan.matches().len());
        Ok(scan)
    }

    /// Upload a photo with several cards (a binder page, a table spread).
    ///
    /// A response without any processed card is an error carrying the first
    /// failure reason.
    pub async fn scan_multiple_cards(&self, image: Vec<u8>) -> ApiResult<MultiScanResponse> {
        log::info!("Scanning multi-card image ({} bytes)", image.len());

        let response = self
            .post("/scan_multiple_cards/")
            .multipart(image_form(image, "cards.jpg")?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(super::response::status_error(response).await);
        }
        let raw: RawMultiScan = serde_json::from_str(&response.text().await?)?;

        if raw.success == Some(false) || raw.scan.cards.is_empty() {
            let reason = raw
                .scan
                .failed_cards
                .as_ref()
                .and_then(|failed| failed.first())
                .map(|f| f.error.clone())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| NO_CARDS_DETECTED.to_string());
            log::warn!("Multi-card scan found no usable cards: {}", reason);
            return Err(ApiError::Application(reason));
        }

        log::info!(
            "Detected {} card(s), {} processed, {} failed",
            raw.scan.total_detected,
            raw.scan.successfully_processed,
            raw.scan.failed
        );
        Ok(raw.scan)
    }

    /// Fetch the full catalog entry for a card id such as `base1-4`
    pub async fn get_card(&self, card_id: &str) -> ApiResult<CardDetails> {
        log::info!("Fetching card details for {}", card_id);
        let response = self.get(&format!("/card/{card_id}")).send().await?;
        let lookup: CardLookup = read_envelope(response).await?;
        Ok(lookup.card_data)
    }
}
