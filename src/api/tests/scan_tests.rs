//! Tests for the scan and catalog endpoints.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::api_with_mock;
use crate::api::NO_CARDS_DETECTED;
use crate::error::ApiError;

fn jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
}

// ── scan_card ────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_card_returns_ranked_matches() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_card/"))
        .and(header("User-Agent", "Pokemon-Scanner/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "card_info": { "name": "Charizard", "hp": 120, "card_number": "4/102" },
            "best_match": {
                "card_id": "base1-4",
                "card_name": "Charizard",
                "similarity": 0.93
            },
            "top_matches": [
                { "rank": 1, "card_name": "Charizard_base1_4.jpg", "card_path": "/db/Charizard_base1_4.jpg", "similarity": 0.93 },
                { "rank": 2, "card_name": "Charizard_base4_4.jpg", "card_path": "/db/Charizard_base4_4.jpg", "similarity": 0.81 }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scan = api.scan_card(jpeg(), false).await.unwrap();
    assert!(scan.process_images().is_none());
    assert_eq!(scan.matches().len(), 2);
    assert_eq!(scan.matches()[1].card_id().as_deref(), Some("base4-4"));
    assert_eq!(scan.best_match.unwrap().card_id, "base1-4");
    assert_eq!(scan.card_info.unwrap().hp.as_deref(), Some("120"));
}

#[tokio::test]
async fn scan_card_extra_info_carries_process_images() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_card_extra_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "top_matches": [],
            "base_image": "data:image/jpeg;base64,AAA",
            "bbox_image": "data:image/jpeg;base64,BBB",
            "cropped_image": "data:image/jpeg;base64,CCC",
            "annotated_image": "data:image/jpeg;base64,DDD"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scan = api.scan_card(jpeg(), true).await.unwrap();
    let images = scan.process_images().unwrap();
    assert_eq!(images.bounding_box, "data:image/jpeg;base64,BBB");
    assert_eq!(images.ocr_annotated, "data:image/jpeg;base64,DDD");
    assert!(scan.matches().is_empty());
}

#[tokio::test]
async fn scan_card_success_false_is_application_error() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_card/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "Could not detect a card in the image"
        })))
        .mount(&mock_server)
        .await;

    match api.scan_card(jpeg(), false).await {
        Err(ApiError::Application(message)) => {
            assert_eq!(message, "Could not detect a card in the image")
        }
        other => panic!("Expected ApiError::Application, got: {other:?}"),
    }
}

#[tokio::test]
async fn scan_card_server_error_is_http_status() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_card/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Internal server error",
            "details": "model not loaded"
        })))
        .mount(&mock_server)
        .await;

    match api.scan_card(jpeg(), false).await {
        Err(ApiError::HttpStatus { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Internal server error: model not loaded");
        }
        other => panic!("Expected ApiError::HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn scan_card_unreachable_is_transport_error() {
    let api = api_with_mock("http://127.0.0.1:1");
    let err = api.scan_card(jpeg(), false).await.unwrap_err();
    assert!(err.is_transport());
}

// ── scan_multiple_cards ──────────────────────────────────────────────

#[tokio::test]
async fn scan_multiple_cards_returns_detected_cards() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_multiple_cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "total_detected": 3,
            "successfully_processed": 2,
            "failed": 1,
            "detection_image": "data:image/jpeg;base64,XYZ",
            "cards": [
                {
                    "card_number": 1,
                    "detection_confidence": 0.97,
                    "card_id": "base1-58",
                    "card_name": "Pikachu",
                    "similarity": 0.91,
                    "set_name": "Base",
                    "card_number_in_set": 58,
                    "bbox": [10.0, 20.0, 110.0, 160.0],
                    "all_matches": [
                        { "rank": 1, "card_id": "base1-58", "card_name": "Pikachu", "similarity": 0.91 },
                        { "rank": 2, "card_id": "basep-1", "card_name": "Pikachu", "similarity": 0.84 }
                    ]
                },
                {
                    "card_number": 2,
                    "card_id": "base1-4",
                    "card_name": "Charizard",
                    "similarity": 0.88
                }
            ],
            "failed_cards": [
                { "card_number": 3, "error": "Low similarity", "confidence": 0.4 }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scan = api.scan_multiple_cards(jpeg()).await.unwrap();
    assert_eq!(scan.total_detected, 3);
    assert_eq!(scan.cards.len(), 2);
    assert_eq!(scan.cards[0].variant_count(), 2);
    assert_eq!(scan.cards[0].card_number_in_set, "58");
    assert_eq!(scan.cards[1].variant_count(), 1);
    assert_eq!(scan.failed_cards.unwrap()[0].error, "Low similarity");
}

#[tokio::test]
async fn scan_multiple_cards_without_cards_reports_first_failure() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_multiple_cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "total_detected": 1,
            "cards": [],
            "failed_cards": [
                { "card_number": 1, "error": "Card too blurry", "confidence": 0.2 }
            ]
        })))
        .mount(&mock_server)
        .await;

    match api.scan_multiple_cards(jpeg()).await {
        Err(ApiError::Application(message)) => assert_eq!(message, "Card too blurry"),
        other => panic!("Expected ApiError::Application, got: {other:?}"),
    }
}

#[tokio::test]
async fn scan_multiple_cards_empty_uses_default_message() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/scan_multiple_cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "total_detected": 0,
            "cards": []
        })))
        .mount(&mock_server)
        .await;

    match api.scan_multiple_cards(jpeg()).await {
        Err(ApiError::Application(message)) => assert_eq!(message, NO_CARDS_DETECTED),
        other => panic!("Expected ApiError::Application, got: {other:?}"),
    }
}

// ── get_card ─────────────────────────────────────────────────────────

#[tokio::test]
async fn get_card_returns_catalog_entry() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/card/base1-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "card_data": {
                "id": "base1-4",
                "name": "Charizard",
                "hp": "120",
                "types": ["Fire"],
                "subtypes": ["Stage 2"],
                "evolves_from": "Charmeleon",
                "rarity": "Rare Holo",
                "national_pokedex_numbers": [6],
                "image_large": "https://images.example.com/base1/4_hires.png"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let card = api.get_card("base1-4").await.unwrap();
    assert_eq!(card.name(), "Charizard");
    assert_eq!(card.first_pokedex_number(), Some(6));
    assert_eq!(
        card.image_url(),
        Some("https://images.example.com/base1/4_hires.png")
    );
}

#[tokio::test]
async fn get_card_without_payload_is_malformed() {
    let mock_server = MockServer::start().await;
    let api = api_with_mock(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/card/base1-999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .mount(&mock_server)
        .await;

    assert!(matches!(
        api.get_card("base1-999").await,
        Err(ApiError::Malformed(_))
    ));
}
