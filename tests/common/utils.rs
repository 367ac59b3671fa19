#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use matchcenter_backend::run;
use matchcenter_backend::auth::jwt::generate_token;
use matchcenter_backend::config::jwt::JwtSettings;
use matchcenter_backend::config::settings::{get_config, get_jwt_settings};
use matchcenter_backend::db::{InMemoryMatchStore, MatchStore};
use matchcenter_backend::models::match_events::{MatchFeedEvent, NotificationTarget};
use matchcenter_backend::models::player::Player;
use matchcenter_backend::models::user::UserRole;
use matchcenter_backend::services::{BroadcastPublisher, LiveMatchService, PublishError};
use matchcenter_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

/// Keeps every published broadcast so tests can inspect what fans would see.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(NotificationTarget, MatchFeedEvent)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(NotificationTarget, MatchFeedEvent)> {
        self.published.lock().unwrap().clone()
    }

    pub fn broadcasts_for(&self, match_id: Uuid) -> Vec<String> {
        self.published()
            .into_iter()
            .filter(|(_, event)| event.match_id() == match_id)
            .map(|(_, event)| event.broadcast().to_string())
            .collect()
    }
}

#[async_trait]
impl BroadcastPublisher for RecordingPublisher {
    async fn publish(&self, target: &NotificationTarget, event: &MatchFeedEvent) -> Result<(), PublishError> {
        self.published.lock().unwrap().push((target.clone(), event.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryMatchStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub jwt_settings: JwtSettings,
    /// Active roster seeded before the server starts
    pub roster: Vec<Player>,
}

impl TestApp {
    pub fn token(&self, role: UserRole) -> String {
        let username = format!("{}_{}", role, &Uuid::new_v4().to_string()[..8]);
        generate_token(&self.jwt_settings, Uuid::new_v4(), &username, role)
            .expect("Failed to generate token")
    }

    pub fn admin_token(&self) -> String {
        self.token(UserRole::Admin)
    }

    pub fn fan_token(&self) -> String {
        self.token(UserRole::Fan)
    }
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let configuration = get_config().expect("Failed to read configuration.");
    let jwt_settings = get_jwt_settings(&configuration);

    let store = Arc::new(InMemoryMatchStore::new());
    let roster = vec![
        Player::new("Wanjiru", Some(1), "GK"),
        Player::new("Kamau", Some(4), "DF"),
        Player::new("Otieno", Some(9), "FW"),
        Player::new("Njoroge", Some(14), "MF"),
        Player::new("Mutua", Some(20), "FW"),
    ];
    for player in &roster {
        store.upsert_player(player).await.expect("Failed to seed roster");
    }

    let publisher = Arc::new(RecordingPublisher::default());
    let service = LiveMatchService::new(
        store.clone(),
        publisher.clone(),
        &configuration.match_center,
    );

    let server = run(listener, service, jwt_settings.clone())
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        publisher,
        jwt_settings,
        roster,
    }
}

/// Create "Nkoroi FC vs Rivals" and return its id.
pub async fn create_test_match(app: &TestApp, token: &str) -> Uuid {
    let response = Client::new()
        .post(&format!("{}/matches", app.address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "home_team": "Nkoroi FC",
            "away_team": "Rivals",
            "venue": "Nkoroi Grounds",
            "match_date": "2026-03-14T15:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to create match.");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse match response");
    let id = body["data"]["match"]["id"].as_str().expect("Missing match id");
    Uuid::parse_str(id).expect("Invalid match id")
}

pub async fn set_lineup(app: &TestApp, token: &str, match_id: Uuid, players: &[Player]) {
    let ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();
    let response = Client::new()
        .put(&format!("{}/matches/{}/lineup", app.address, match_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "player_ids": ids }))
        .send()
        .await
        .expect("Failed to set lineup.");
    assert!(response.status().is_success());
}

/// POST without a body to a match sub-route, returning status and JSON body
pub async fn post_action(app: &TestApp, token: &str, match_id: Uuid, action: &str) -> (u16, Value) {
    let response = Client::new()
        .post(&format!("{}/matches/{}/{}", app.address, match_id, action))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

pub async fn post_json(app: &TestApp, token: &str, match_id: Uuid, action: &str, body: Value) -> (u16, Value) {
    let response = Client::new()
        .post(&format!("{}/matches/{}/{}", app.address, match_id, action))
        .header("Authorization", format!("Bearer {}", token))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request.");
    let status = response.status().as_u16();
    (status, response.json().await.unwrap_or(Value::Null))
}

pub async fn get_match(app: &TestApp, token: &str, match_id: Uuid) -> Value {
    let response = Client::new()
        .get(&format!("{}/matches/{}", app.address, match_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch match.");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse match");
    body["data"].clone()
}
