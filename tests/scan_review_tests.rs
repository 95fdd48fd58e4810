//! Integration tests driving the scan review flows against a mocked scanner API.

use pokemon_scanner::review::multi::{MultiPhase, ReviewStep, ReviewSummary};
use pokemon_scanner::review::single::{SingleOutcome, SingleView};
use pokemon_scanner::{
    add_accepted, capture_once, ApiError, FileCapture, MultiCardReview, ScannerApi, Session,
    SingleCardReview,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "6f1c2a9e-3b1d-4c7a-9f2e-0a1b2c3d4e5f";

fn photo() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.jpg");
    std::fs::write(&file, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    (dir, file)
}

#[tokio::test]
async fn single_scan_reject_then_accept_adds_second_candidate() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan_card/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "top_matches": [
                { "rank": 1, "card_name": "Charizard_base1_4.jpg", "similarity": 0.9 },
                { "rank": 2, "card_name": "Charmeleon_base1_24.jpg", "similarity": 0.65 },
                { "rank": 3, "card_name": "Charizard_base4_4.jpg", "similarity": 0.71 }
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add_to_collection/"))
        .and(body_partial_json(serde_json::json!({ "card_id": "base4-4", "quantity": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "action": "added",
            "quantity": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = ScannerApi::new(mock_server.uri());
    let (_dir, file) = photo();
    let image = capture_once(FileCapture::new(&file)).unwrap();

    let mut review = SingleCardReview::new(false);
    let scan = api.scan_card(image, false).await.unwrap();
    review.receive(scan.matches());
    assert_eq!(review.candidates().len(), 2);

    review.reject();
    let accepted = review.accept().unwrap();
    assert_eq!(
        review.view(),
        &SingleView::Finished(SingleOutcome::Accepted(accepted.clone()))
    );

    let card_id = accepted.card_id().unwrap();
    let notice = add_accepted(&api, Some(&Session::new(USER_ID)), &card_id).await;
    assert_eq!(
        notice.message,
        "Card added to your collection! You now have 1 of this card."
    );
}

#[tokio::test]
async fn single_scan_failure_finishes_with_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan_card_extra_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "No card detected"
        })))
        .mount(&mock_server)
        .await;

    let api = ScannerApi::new(mock_server.uri());
    let mut review = SingleCardReview::new(true);
    match api.scan_card(vec![0xFF, 0xD8], true).await {
        Ok(scan) => {
            review.receive(scan.matches());
        }
        Err(e) => review.fail(e.to_string()),
    }
    assert_eq!(
        review.view(),
        &SingleView::Finished(SingleOutcome::Failed("No card detected".to_string()))
    );
}

#[tokio::test]
async fn multi_scan_failed_write_keeps_card_current() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan_multiple_cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "total_detected": 2,
            "successfully_processed": 2,
            "failed": 0,
            "cards": [
                {
                    "card_number": 1,
                    "card_id": "base1-58",
                    "card_name": "Pikachu",
                    "similarity": 0.91,
                    "all_matches": [
                        { "rank": 1, "card_id": "base1-58", "card_name": "Pikachu", "similarity": 0.91 },
                        { "rank": 2, "card_id": "basep-1", "card_name": "Pikachu", "similarity": 0.8 }
                    ]
                },
                { "card_number": 2, "card_id": "base1-4", "card_name": "Charizard", "similarity": 0.88 }
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add_to_collection/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let api = ScannerApi::new(mock_server.uri());
    let session = Session::new(USER_ID);
    let scan = api.scan_multiple_cards(vec![0xFF, 0xD8]).await.unwrap();
    let mut review = MultiCardReview::new(scan.cards, true);

    assert_eq!(review.phase(), MultiPhase::Overview);
    review.start_reviewing();

    assert_eq!(review.skip(), Some(ReviewStep::NextVariant));
    let variant = review.current_variant().unwrap();
    assert_eq!(variant.card_id, "basep-1");

    let notice = add_accepted(&api, Some(&session), &variant.card_id).await;
    assert!(notice.is_error());
    // Not accepted: the same card and variant stay on screen
    assert_eq!(review.index(), 0);
    assert_eq!(review.current_variant().unwrap().card_id, "basep-1");

    assert_eq!(review.skip(), Some(ReviewStep::NextCard));
    assert_eq!(
        review.skip(),
        Some(ReviewStep::Finished(ReviewSummary {
            added: 0,
            skipped: 2,
            total: 2
        }))
    );
}

#[tokio::test]
async fn multi_scan_with_nothing_detected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan_multiple_cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "total_detected": 0,
            "cards": []
        })))
        .mount(&mock_server)
        .await;

    let api = ScannerApi::new(mock_server.uri());
    match api.scan_multiple_cards(vec![0xFF, 0xD8]).await {
        Err(ApiError::Application(message)) => {
            assert_eq!(message, "No cards detected with sufficient confidence")
        }
        other => panic!("Expected ApiError::Application, got: {other:?}"),
    }
}
