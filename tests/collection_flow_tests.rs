//! Integration tests for loading, sorting and editing a collection against a
//! mocked scanner API.

use pokemon_scanner::collection::sort::{family_key, FamilyKey};
use pokemon_scanner::collection::{DeletePress, ManualClock};
use pokemon_scanner::{
    ApiError, CollectionResponse, CollectionState, ScannerApi, Session, SortKey, SortOrder,
    ValidationError,
};
use std::path::PathBuf;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "6f1c2a9e-3b1d-4c7a-9f2e-0a1b2c3d4e5f";

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn collection_body() -> serde_json::Value {
    let content = std::fs::read_to_string(fixtures_path().join("collection.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

async fn mount_collection(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/user_collection/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection_body()))
        .mount(mock_server)
        .await;
}

fn names(items: &[&pokemon_scanner::CollectionItem]) -> Vec<String> {
    items.iter().map(|i| i.name().to_string()).collect()
}

mod sorting {
    use super::*;

    #[tokio::test]
    async fn loads_and_sorts_by_pokedex() {
        let mock_server = MockServer::start().await;
        mount_collection(&mock_server).await;
        let api = ScannerApi::new(mock_server.uri());

        let state = CollectionState::from_response(api.user_collection(USER_ID).await.unwrap());
        assert_eq!(state.total_cards(), 6);
        assert_eq!(state.total_quantity(), 13);

        let view = state.view(SortKey::Pokedex, SortOrder::Ascending, "");
        assert_eq!(
            names(&view),
            vec!["Charmander", "Charmeleon", "Charizard", "Charizard EX", "Pikachu", "Rare Candy"]
        );
    }

    #[tokio::test]
    async fn family_groups_line_and_orders_by_composite_score() {
        let mock_server = MockServer::start().await;
        mount_collection(&mock_server).await;
        let api = ScannerApi::new(mock_server.uri());
        let state = CollectionState::from_response(api.user_collection(USER_ID).await.unwrap());

        let view = state.view(SortKey::Family, SortOrder::Ascending, "");
        let charizard_positions: Vec<usize> = view
            .iter()
            .enumerate()
            .filter(|(_, item)| family_key(item) == FamilyKey::Pokedex(6))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(charizard_positions.len(), 2);
        assert_eq!(charizard_positions[1], charizard_positions[0] + 1);
        // Stage 2 (303) before Basic EX (901)
        assert_eq!(view[charizard_positions[0]].name(), "Charizard");
        assert_eq!(view[charizard_positions[1]].name(), "Charizard EX");
    }

    #[tokio::test]
    async fn search_then_damage_descending() {
        let mock_server = MockServer::start().await;
        mount_collection(&mock_server).await;
        let api = ScannerApi::new(mock_server.uri());
        let state = CollectionState::from_response(api.user_collection(USER_ID).await.unwrap());

        let view = state.view(SortKey::Damage, SortOrder::Descending, " char ");
        assert_eq!(
            names(&view),
            vec!["Charizard EX", "Charizard", "Charmander", "Charmeleon"]
        );
    }
}

mod editing {
    use super::*;

    #[tokio::test]
    async fn armed_delete_then_server_failure_keeps_local_removal() {
        let mock_server = MockServer::start().await;
        mount_collection(&mock_server).await;
        Mock::given(method("POST"))
            .and(path("/delete_card/"))
            .and(query_param("card_id", "base1-58"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Failed to delete card"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ScannerApi::new(mock_server.uri());
        let clock = ManualClock::new();
        let response: CollectionResponse = api.user_collection(USER_ID).await.unwrap();
        let mut state = CollectionState::with_clock(response, clock.clone());
        let session = Session::new(USER_ID);

        assert!(state.open("base1-58"));
        assert_eq!(state.press_delete("base1-58"), DeletePress::Armed);
        clock.advance(Duration::from_secs(2));
        assert_eq!(
            state.press_delete("base1-58"),
            DeletePress::Confirmed("base1-58".to_string())
        );

        let outcome = state.delete_card(&api, Some(&session), "base1-58").await;
        assert!(outcome.notice.is_error());
        assert_eq!(state.total_cards(), 5);
        assert_eq!(state.total_quantity(), 9);
        assert!(state.selected().is_none());
    }

    #[tokio::test]
    async fn quantity_update_round_trip() {
        let mock_server = MockServer::start().await;
        mount_collection(&mock_server).await;
        Mock::given(method("POST"))
            .and(path("/update_quantity/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "new_quantity": 0
            })))
            .mount(&mock_server)
            .await;

        let api = ScannerApi::new(mock_server.uri());
        let mut state = CollectionState::from_response(api.user_collection(USER_ID).await.unwrap());
        let session = Session::new(USER_ID);

        state.open("base1-46");
        state
            .update_quantity(&api, &session, "base1-46", 0)
            .await
            .unwrap();
        assert_eq!(state.selected().unwrap().quantity, 0);
        assert_eq!(state.total_quantity(), 10);
    }

    #[test]
    fn negative_quantity_never_reaches_the_network() {
        let api = ScannerApi::new("http://127.0.0.1:1");
        let mut state = CollectionState::new(Vec::new());
        let session = Session::new(USER_ID);

        let result = tokio_test::block_on(state.update_quantity(&api, &session, "base1-4", -3));
        assert!(matches!(
            result,
            Err(ApiError::Validation(ValidationError::NegativeQuantity(-3)))
        ));
    }
}
