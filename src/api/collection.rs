use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::{read_envelope, read_user_envelope};
use super::ScannerApi;
use crate::error::{ApiError, ApiResult};
use crate::models::CollectionItem;
use crate::validation::validate_user_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAction {
    /// First copy of this card in the collection
    Added,
    /// Quantity of an owned card went up
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub action: AddAction,
    /// Quantity owned after the write
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
struct AddToCollectionRequest<'a> {
    card_id: &'a str,
    username: &'a str,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct AddToCollectionBody {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    new_quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
struct UpdateQuantityRequest<'a> {
    user_id: &'a str,
    card_id: &'a str,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct UpdateQuantityBody {
    #[serde(default)]
    new_quantity: Option<u32>,
}

/// Result of listing a user's collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub total_cards: usize,
    #[serde(default)]
    pub collection: Vec<CollectionItem>,
}

#[derive(Debug, Deserialize)]
struct ProfileStatusBody {
    is_public: bool,
}

#[derive(Debug, Deserialize)]
struct VisibilityToggleBody {
    new_is_public_status: bool,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    #[serde(default)]
    message: Option<String>,
}

impl ScannerApi {
    /// Add `quantity` copies of a card to the user's collection
    pub async fn add_to_collection(
        &self,
        user_id: &str,
        card_id: &str,
        quantity: u32,
    ) -> ApiResult<AddOutcome> {
        log::info!("Adding {} x {} to collection of {}", quantity, card_id, user_id);

        let response = self
            .post("/add_to_collection/")
            .json(&AddToCollectionRequest {
                card_id,
                username: user_id,
                quantity,
            })
            .send()
            .await?;
        let body: AddToCollectionBody = read_envelope(response).await?;

        let action = match body.action.as_deref() {
            Some("updated") => AddAction::Updated,
            _ => AddAction::Added,
        };
        let quantity = body
            .new_quantity
            .or(body.quantity)
            .ok_or(ApiError::MissingField("quantity"))?;
        Ok(AddOutcome { action, quantity })
    }

    /// Set the owned quantity of a card
    pub async fn update_quantity(
        &self,
        user_id: &str,
        card_id: &str,
        quantity: u32,
    ) -> ApiResult<u32> {
        log::info!("Setting quantity of {} to {} for {}", card_id, quantity, user_id);

        let response = self
            .post("/update_quantity/")
            .json(&UpdateQuantityRequest {
                user_id,
                card_id,
                quantity,
            })
            .send()
            .await?;
        let body: UpdateQuantityBody = read_envelope(response).await?;
        Ok(body.new_quantity.unwrap_or(quantity))
    }

    /// Remove a card from the user's collection
    pub async fn delete_card(&self, user_id: &str, card_id: &str) -> ApiResult<()> {
        log::info!("Deleting {} from collection of {}", card_id, user_id);

        let response = self
            .post("/delete_card/")
            .query(&[("user_id", user_id), ("card_id", card_id)])
            .send()
            .await?;
        let body: DeleteBody = read_envelope(response).await?;
        if let Some(message) = body.message {
            log::debug!("Delete response: {}", message);
        }
        Ok(())
    }

    /// List a user's collection. 403 means the collection is private, 404
    /// that the user does not exist.
    pub async fn user_collection(&self, user_id: &str) -> ApiResult<CollectionResponse> {
        validate_user_id(user_id)?;
        log::info!("Fetching collection of {}", user_id);

        let response = self
            .get(&format!("/user_collection/{user_id}"))
            .send()
            .await?;
        match response.status() {
            StatusCode::FORBIDDEN => return Err(ApiError::PrivateCollection),
            StatusCode::NOT_FOUND => return Err(ApiError::UserNotFound),
            _ => {}
        }
        let collection: CollectionResponse = read_envelope(response).await?;

        log::info!(
            "Loaded {} collection entries ({} reported)",
            collection.collection.len(),
            collection.total_cards
        );
        Ok(collection)
    }

    /// Whether the user's collection is visible to others
    pub async fn profile_status(&self, user_id: &str) -> ApiResult<bool> {
        let response = self
            .get(&format!("/profile_status/{user_id}"))
            .send()
            .await?;
        let body: ProfileStatusBody = read_user_envelope(response).await?;
        Ok(body.is_public)
    }

    /// Flip the collection's visibility; returns the new public flag
    pub async fn toggle_visibility(&self, user_id: &str) -> ApiResult<bool> {
        log::info!("Toggling collection visibility for {}", user_id);
        let response = self
            .get(&format!("/make_collection_opposite/{user_id}"))
            .send()
            .await?;
        let body: VisibilityToggleBody = read_user_envelope(response).await?;
        Ok(body.new_is_public_status)
    }
}
