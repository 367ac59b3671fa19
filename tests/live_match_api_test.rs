use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::utils::{create_test_match, get_match, post_action, post_json, set_lineup, spawn_app};

#[tokio::test]
async fn test_match_routes_require_authentication() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/matches", test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(&format!("{}/matches", test_app.address))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_full_match_day_for_nkoroi_fc() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let scorer = test_app.roster[2].clone();

    let match_id = create_test_match(&test_app, &token).await;
    set_lineup(&test_app, &token, match_id, &test_app.roster[..3]).await;

    let (status, body) = post_action(&test_app, &token, match_id, "start").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["status"], "live");
    assert_eq!(body["data"]["match"]["current_minute"], 0);
    assert_eq!(body["data"]["event"]["event_type"], "kickoff");

    let (status, body) = post_json(
        &test_app,
        &token,
        match_id,
        "goals",
        json!({ "team": "Nkoroi FC", "player_id": scorer.id }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["home_score"], 1);
    assert_eq!(body["data"]["event"]["player_name"], "Otieno");
    assert!(body["data"]["broadcast"].as_str().unwrap().contains("GOAL"));

    let (status, body) = post_action(&test_app, &token, match_id, "end").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["status"], "finished");
    let events = body["data"]["match"]["events"].as_array().unwrap();
    let fulltime: Vec<&Value> = events.iter().filter(|e| e["event_type"] == "fulltime").collect();
    assert_eq!(fulltime.len(), 1);
    assert!(fulltime[0]["description"].as_str().unwrap().contains("1-0"));

    // announcement, kickoff, goal, full-time
    let broadcasts = test_app.publisher.broadcasts_for(match_id);
    assert_eq!(broadcasts.len(), 4);
    assert!(broadcasts[0].contains("MATCH DAY"));
    assert!(broadcasts[3].contains("Nkoroi FC 1-0 Rivals"));

    let response = Client::new()
        .get(&format!("{}/matches/{}/summary?context=finished", test_app.address, match_id))
        .header("Authorization", format!("Bearer {}", test_app.fan_token()))
        .send()
        .await
        .expect("Failed to fetch summary.");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    let text = body["data"]["text"].as_str().unwrap();
    assert!(text.contains("1-0"));
    assert!(text.contains("Nkoroi FC win!"));
}

#[tokio::test]
async fn test_fan_is_read_only() {
    let test_app = spawn_app().await;
    let admin = test_app.admin_token();
    let fan = test_app.fan_token();

    let match_id = create_test_match(&test_app, &admin).await;
    post_action(&test_app, &admin, match_id, "start").await;
    let before = get_match(&test_app, &fan, match_id).await;

    let (status, body) = post_json(&test_app, &fan, match_id, "goals", json!({ "team": "Rivals" })).await;
    assert_eq!(status, 403);
    assert_eq!(body["success"], false);

    let (status, _) = post_action(&test_app, &fan, match_id, "end").await;
    assert_eq!(status, 403);
    let (status, _) = post_action(&test_app, &fan, match_id, "minute/increment").await;
    assert_eq!(status, 403);

    let response = Client::new()
        .post(&format!("{}/matches", test_app.address))
        .header("Authorization", format!("Bearer {}", fan))
        .json(&json!({
            "home_team": "Nkoroi FC",
            "away_team": "Rivals",
            "match_date": "2026-03-14T15:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 403);

    let after = get_match(&test_app, &fan, match_id).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_goal_without_scorer_is_deferred_until_attributed() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let match_id = create_test_match(&test_app, &token).await;
    set_lineup(&test_app, &token, match_id, &test_app.roster[..3]).await;
    post_action(&test_app, &token, match_id, "start").await;

    let (status, body) = post_json(&test_app, &token, match_id, "goals", json!({ "team": "Nkoroi FC" })).await;
    assert_eq!(status, 422);
    assert_eq!(body["success"], false);

    let current = get_match(&test_app, &token, match_id).await;
    assert_eq!(current["home_score"], 0);
    assert_eq!(current["events"].as_array().unwrap().len(), 1);

    let (status, body) = post_json(
        &test_app,
        &token,
        match_id,
        "goals",
        json!({ "team": "Nkoroi FC", "player_id": test_app.roster[1].id }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["home_score"], 1);
}

#[tokio::test]
async fn test_card_and_incident_need_a_player_for_nkoroi_fc() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let match_id = create_test_match(&test_app, &token).await;
    set_lineup(&test_app, &token, match_id, &test_app.roster[..3]).await;
    post_action(&test_app, &token, match_id, "start").await;

    let (status, body) = post_json(&test_app, &token, match_id, "cards", json!({ "team": "Nkoroi FC", "color": "yellow" })).await;
    assert_eq!(status, 422);
    assert_eq!(body["success"], false);

    let (status, _) = post_json(&test_app, &token, match_id, "incidents", json!({ "kind": "injury", "team": "Nkoroi FC" })).await;
    assert_eq!(status, 422);

    let current = get_match(&test_app, &token, match_id).await;
    assert_eq!(current["events"].as_array().unwrap().len(), 1);

    let (status, body) = post_json(
        &test_app,
        &token,
        match_id,
        "cards",
        json!({ "team": "Nkoroi FC", "color": "yellow", "player_id": test_app.roster[1].id }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["event"]["player_name"], "Kamau");
}

#[tokio::test]
async fn test_undo_last_goal() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let client = Client::new();
    let match_id = create_test_match(&test_app, &token).await;
    post_action(&test_app, &token, match_id, "start").await;

    let undo = || {
        client
            .delete(&format!("{}/matches/{}/goals/last", test_app.address, match_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
    };

    let response = undo().await.expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 409);

    post_json(&test_app, &token, match_id, "goals", json!({ "team": "Rivals" })).await;
    let response = undo().await.expect("Failed to execute request.");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["match"]["away_score"], 0);
    assert!(body["data"]["event"].is_null());
}

#[tokio::test]
async fn test_two_step_substitution() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let client = Client::new();
    let match_id = create_test_match(&test_app, &token).await;
    set_lineup(&test_app, &token, match_id, &test_app.roster[..3]).await;
    post_action(&test_app, &token, match_id, "start").await;

    let outgoing = &test_app.roster[1];
    let response = client
        .get(&format!(
            "{}/matches/{}/substitutions/candidates?player_out={}",
            test_app.address, match_id, outgoing.id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to fetch candidates.");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    let outgoing_ids: Vec<&str> = body["data"]["outgoing"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    let incoming_ids: Vec<&str> = body["data"]["incoming"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(outgoing_ids.len(), 3);
    assert_eq!(incoming_ids.len(), 2);
    assert!(incoming_ids.iter().all(|id| !outgoing_ids.contains(id)));

    let incoming = Uuid::parse_str(incoming_ids[0]).unwrap();
    let (status, body) = post_json(
        &test_app,
        &token,
        match_id,
        "substitutions",
        json!({ "team": "Nkoroi FC", "player_out_id": outgoing.id, "player_in_id": incoming }),
    )
    .await;
    assert_eq!(status, 200);
    let lineup: Vec<String> = body["data"]["match"]["lineup"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert!(lineup.contains(&incoming.to_string()));
    assert!(!lineup.contains(&outgoing.id.to_string()));
    assert_eq!(body["data"]["event"]["event_type"], "substitution");
}

#[tokio::test]
async fn test_minute_updates_stay_in_bounds() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let client = Client::new();
    let match_id = create_test_match(&test_app, &token).await;
    post_action(&test_app, &token, match_id, "start").await;

    for (minute, expected) in [(-1, 400), (121, 400), (0, 200), (120, 200)] {
        let response = client
            .put(&format!("{}/matches/{}/minute", test_app.address, match_id))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "minute": minute }))
            .send()
            .await
            .expect("Failed to set minute.");
        assert_eq!(response.status().as_u16(), expected, "minute {}", minute);
    }

    let (status, body) = post_action(&test_app, &token, match_id, "minute/increment").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["current_minute"], 120);

    client
        .put(&format!("{}/matches/{}/minute", test_app.address, match_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "minute": 0 }))
        .send()
        .await
        .expect("Failed to set minute.");
    let (status, body) = post_action(&test_app, &token, match_id, "minute/decrement").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["match"]["current_minute"], 0);
}

#[tokio::test]
async fn test_events_before_kickoff_are_rejected() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let match_id = create_test_match(&test_app, &token).await;

    let (status, _) = post_action(&test_app, &token, match_id, "end").await;
    assert_eq!(status, 409);
    let (status, _) = post_json(&test_app, &token, match_id, "cards", json!({ "team": "Rivals", "color": "yellow" })).await;
    assert_eq!(status, 409);

    post_action(&test_app, &token, match_id, "start").await;
    let (status, _) = post_action(&test_app, &token, match_id, "start").await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn test_incidents_and_unknown_match() {
    let test_app = spawn_app().await;
    let token = test_app.admin_token();
    let match_id = create_test_match(&test_app, &token).await;
    post_action(&test_app, &token, match_id, "start").await;

    for kind in ["injury", "penalty", "corner"] {
        let (status, body) = post_json(&test_app, &token, match_id, "incidents", json!({ "kind": kind, "team": "Rivals" })).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["event"]["event_type"], kind);
    }

    let (status, _) = post_json(&test_app, &token, match_id, "incidents", json!({ "kind": "corner", "team": "Strangers" })).await;
    assert_eq!(status, 400);

    let (status, _) = post_action(&test_app, &token, Uuid::new_v4(), "start").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_roster_management() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/players", test_app.address))
        .header("Authorization", format!("Bearer {}", test_app.fan_token()))
        .json(&json!({ "name": "Chebet", "jersey_number": 7, "position": "MF" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .post(&format!("{}/players", test_app.address))
        .header("Authorization", format!("Bearer {}", test_app.admin_token()))
        .json(&json!({ "name": "Chebet", "jersey_number": 7, "position": "MF" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let response = client
        .get(&format!("{}/players", test_app.address))
        .header("Authorization", format!("Bearer {}", test_app.fan_token()))
        .send()
        .await
        .expect("Failed to execute request.");
    let body: Value = response.json().await.unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Wanjiru", "Kamau", "Chebet", "Otieno", "Njoroge", "Mutua"]);
}
