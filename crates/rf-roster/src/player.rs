//! Player records from the player API

use serde::{Deserialize, Serialize};

use rf_reel::RosterItem;

/// One entry of the ranked player list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub nickname: String,
    #[serde(default)]
    pub rank_name: Option<String>,
    #[serde(default)]
    pub player_status: Option<String>,
    #[serde(default)]
    pub dota_rank: Option<String>,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub score_result: Option<f64>,
}

impl Player {
    /// Roster item for this player with the given weight
    pub fn to_roster_item(&self, probability: f64) -> RosterItem {
        RosterItem::new(self.id.to_string(), &self.nickname, &self.avatar_url, probability)
    }
}
