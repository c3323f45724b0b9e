//! Roster provider - fixture players or the ranked player API

use std::ops::Range;
use std::time::Duration;

use log::{debug, error};

use rf_reel::{Roster, RosterItem};

use crate::error::SourceError;
use crate::player::Player;
use crate::source::SourceKind;

/// Player API endpoint used when none is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/players";

/// Ranked positions that make it onto the reel (places 4 to 10)
pub const DEFAULT_RANK_WINDOW: Range<usize> = 3..10;

const FIXTURE_PLAYERS: [(&str, &str); 7] = [
    ("test1", "TestUser1"),
    ("test2", "MockPlayer"),
    ("test3", "StaticCat"),
    ("test4", "DataDog"),
    ("test5", "DevOne"),
    ("test6", "TestUser2"),
    ("test7", "FinalMock"),
];

/// Built-in test roster: seven players, equal weights
pub fn fixture_roster() -> Roster {
    Roster::uniform(
        FIXTURE_PLAYERS
            .iter()
            .map(|(id, nickname)| {
                let avatar = format!("https://picsum.photos/seed/{}/56/56", id);
                RosterItem::new(*id, *nickname, avatar, 0.0)
            })
            .collect(),
    )
}

/// Players inside `window` as an equally weighted roster.
///
/// A window reaching past the list is cut short; an empty result is an
/// empty roster.
pub fn players_to_roster(players: &[Player], window: Range<usize>) -> Roster {
    let end = window.end.min(players.len());
    let start = window.start.min(end);
    Roster::uniform(
        players[start..end]
            .iter()
            .map(|player| player.to_roster_item(1.0))
            .collect(),
    )
}

/// Decode a JSON player list
pub fn decode_players(body: &[u8]) -> Result<Vec<Player>, SourceError> {
    serde_json::from_slice(body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Loads rosters from either source
pub struct RosterProvider {
    api_url: String,
    rank_window: Range<usize>,
    client: reqwest::Client,
}

impl RosterProvider {
    /// Provider for the default endpoint
    pub fn new() -> Result<Self, SourceError> {
        RosterProviderBuilder::new().build()
    }

    pub fn builder() -> RosterProviderBuilder {
        RosterProviderBuilder::new()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn rank_window(&self) -> Range<usize> {
        self.rank_window.clone()
    }

    /// Load a roster from `kind`
    pub async fn get_roster(&self, kind: SourceKind) -> Result<Roster, SourceError> {
        match kind {
            SourceKind::Fixture => Ok(fixture_roster()),
            SourceKind::Api => {
                let players = self.fetch_players().await?;
                let roster = players_to_roster(&players, self.rank_window.clone());
                debug!(
                    "[Roster] {} players fetched, {} on the reel",
                    players.len(),
                    roster.len()
                );
                Ok(roster)
            }
        }
    }

    /// Like [`get_roster`](Self::get_roster), but a failed load is an empty roster
    pub async fn load(&self, kind: SourceKind) -> Roster {
        match self.get_roster(kind).await {
            Ok(roster) => roster,
            Err(e) => {
                error!("[Roster] Loading {} roster failed: {}", kind, e);
                Roster::default()
            }
        }
    }

    /// Fetch the full ranked player list
    pub async fn fetch_players(&self) -> Result<Vec<Player>, SourceError> {
        debug!("[Roster] GET {}", self.api_url);
        let response = self.client.get(&self.api_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_players(&body)
    }
}

/// Roster provider builder
pub struct RosterProviderBuilder {
    api_url: String,
    rank_window: Range<usize>,
    timeout: Duration,
    client: Option<reqwest::Client>,
}

impl RosterProviderBuilder {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            rank_window: DEFAULT_RANK_WINDOW,
            timeout: Duration::from_secs(5),
            client: None,
        }
    }

    /// Player API endpoint
    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    /// Ranked positions taken from the player list
    pub fn rank_window(mut self, window: Range<usize>) -> Self {
        self.rank_window = window;
        self
    }

    /// Request timeout (ignored with a custom client)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured HTTP client
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<RosterProvider, SourceError> {
        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder().timeout(self.timeout).build()?,
        };

        Ok(RosterProvider {
            api_url: self.api_url,
            rank_window: self.rank_window,
            client,
        })
    }
}

impl Default for RosterProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn players(count: i64) -> Vec<Player> {
        (1..=count)
            .map(|id| Player {
                id,
                nickname: format!("Player{}", id),
                rank_name: Some("Legend".into()),
                player_status: Some("active".into()),
                dota_rank: Some(format!("Rank{}", id)),
                avatar_url: format!("https://cdn.test/{}.png", id),
                total_score: Some(1000.0 - id as f64),
                score_result: None,
            })
            .collect()
    }

    /// Serve one HTTP response on a local port, return the URL
    async fn serve_once(status: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api/players", addr)
    }

    fn local_provider(url: &str) -> RosterProvider {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        RosterProvider::builder().api_url(url).client(client).build().unwrap()
    }

    #[test]
    fn test_fixture_roster() {
        let roster = fixture_roster();
        assert_eq!(roster.len(), 7);
        assert!(roster.is_normalized(1e-9));
        assert_eq!(roster.get(0).unwrap().label, "TestUser1");
        assert_eq!(roster.get(6).unwrap().id, "test7");
        assert_eq!(
            roster.get(3).unwrap().avatar_url,
            "https://picsum.photos/seed/test4/56/56"
        );
    }

    #[test]
    fn test_players_to_roster_takes_rank_window() {
        let roster = players_to_roster(&players(12), DEFAULT_RANK_WINDOW);
        let ids: Vec<&str> = roster.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "5", "6", "7", "8", "9", "10"]);
        assert!(roster.is_normalized(1e-9));
        assert_eq!(roster.get(0).unwrap().label, "Player4");
        assert_eq!(roster.get(0).unwrap().avatar_url, "https://cdn.test/4.png");
    }

    #[test]
    fn test_players_to_roster_short_list() {
        let roster = players_to_roster(&players(5), DEFAULT_RANK_WINDOW);
        assert_eq!(roster.len(), 2);
        assert!((roster.get(0).unwrap().probability - 0.5).abs() < 1e-12);

        assert!(players_to_roster(&players(3), DEFAULT_RANK_WINDOW).is_empty());
        assert!(players_to_roster(&[], DEFAULT_RANK_WINDOW).is_empty());
    }

    #[test]
    fn test_decode_players() {
        let body = br#"[
            {"id": 42, "nickname": "Zed", "rank_name": "Immortal", "player_status": "online",
             "dota_rank": "Immortal", "avatar_url": "https://cdn.test/42.png", "total_score": 9001, "score_result": 12.5},
            {"id": 43, "nickname": "Ann"}
        ]"#;
        let players = decode_players(body).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, 42);
        assert_eq!(players[0].total_score, Some(9001.0));
        assert_eq!(players[0].dota_rank.as_deref(), Some("Immortal"));
        assert_eq!(players[1].avatar_url, "");
        assert_eq!(players[1].rank_name, None);

        assert!(matches!(
            decode_players(b"{\"players\": []}"),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_text_rank_to_roster() {
        let body = br#"[
            {"id": 1, "nickname": "A", "rank_name": "Herald", "player_status": "online", "dota_rank": "Herald 1", "avatar_url": "a.png", "total_score": 10, "score_result": 1},
            {"id": 2, "nickname": "B", "rank_name": "Guardian", "player_status": "online", "dota_rank": "Guardian 3", "avatar_url": "b.png", "total_score": 9, "score_result": 2},
            {"id": 3, "nickname": "C", "rank_name": "Crusader", "player_status": "away", "dota_rank": "Crusader 5", "avatar_url": "c.png", "total_score": 8, "score_result": 3},
            {"id": 4, "nickname": "D", "rank_name": "Immortal", "player_status": "online", "dota_rank": "Immortal", "avatar_url": "d.png", "total_score": 7, "score_result": 4}
        ]"#;
        let players = decode_players(body).unwrap();
        assert_eq!(players[3].dota_rank.as_deref(), Some("Immortal"));

        let roster = players_to_roster(&players, DEFAULT_RANK_WINDOW);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(0).unwrap().id, "4");
    }

    #[test]
    fn test_builder_defaults() {
        let provider = RosterProvider::new().unwrap();
        assert_eq!(provider.api_url(), DEFAULT_API_URL);
        assert_eq!(provider.rank_window(), 3..10);

        let provider = RosterProvider::builder()
            .api_url("http://players.test/top")
            .rank_window(0..5)
            .timeout(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(provider.api_url(), "http://players.test/top");
        assert_eq!(provider.rank_window(), 0..5);
    }

    #[tokio::test]
    async fn test_fixture_source_needs_no_network() {
        let provider = RosterProvider::builder()
            .api_url("http://127.0.0.1:9/unreachable")
            .build()
            .unwrap();
        let roster = provider.get_roster(SourceKind::Fixture).await.unwrap();
        assert_eq!(roster, fixture_roster());
    }

    #[tokio::test]
    async fn test_api_source() {
        let body = serde_json::to_string(&players(10)).unwrap();
        let url = serve_once("200 OK", body).await;

        let roster = local_provider(&url).get_roster(SourceKind::Api).await.unwrap();
        assert_eq!(roster.len(), 7);
        assert_eq!(roster.index_of("4"), Some(0));
        assert_eq!(roster.index_of("10"), Some(6));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let url = serve_once("503 Service Unavailable", String::new()).await;

        let result = local_provider(&url).get_roster(SourceKind::Api).await;
        assert!(matches!(result, Err(SourceError::Status(503))));
    }

    #[tokio::test]
    async fn test_failed_load_is_empty_roster() {
        let url = serve_once("200 OK", "not json".to_string()).await;

        let roster = local_provider(&url).load(SourceKind::Api).await;
        assert!(roster.is_empty());
    }
}
