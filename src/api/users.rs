use serde::{Deserialize, Serialize};

use super::response::{read_envelope, read_user_envelope};
use super::ScannerApi;
use crate::error::ApiResult;
use crate::models::{LeaderboardEntry, UserRecord};

/// Bookkeeping record sent after the identity provider created the account
#[derive(Clone, Serialize)]
pub struct NewUser {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct LeaderboardBody {
    #[serde(default)]
    leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

impl ScannerApi {
    /// Public collections ranked by unique cards
    pub async fn leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        log::info!("Fetching leaderboard");
        let response = self.get("/leaderboard/").send().await?;
        let body: LeaderboardBody = read_envelope(response).await?;
        log::info!("Leaderboard has {} entries", body.leaderboard.len());
        Ok(body.leaderboard)
    }

    /// Mirror a newly registered account into the bookkeeping table
    pub async fn add_user(&self, user: &NewUser) -> ApiResult<()> {
        log::info!("Adding user {} to bookkeeping table", user.user_id);
        let response = self.post("/add_user/").json(user).send().await?;
        let body: MessageBody = read_envelope(response).await?;
        if let Some(message) = body.message {
            log::debug!("add_user: {}", message);
        }
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> ApiResult<UserRecord> {
        let response = self.get(&format!("/user/{user_id}")).send().await?;
        let body: UserBody = read_user_envelope(response).await?;
        Ok(body.user)
    }
}
