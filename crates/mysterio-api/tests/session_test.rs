//! Integration tests for game sessions over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

const SESSIONS: &str = "/api/v1/sessions";

async fn create_session(app: &axum::Router, player_count: usize, difficulty: &str) -> Value {
    let (status, json) = common::post_json(
        app.clone(),
        SESSIONS,
        None,
        &json!({ "player_count": player_count, "difficulty": difficulty }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json
}

fn player(session: &Value, seat: usize) -> String {
    session["players"][seat]["player_id"]
        .as_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn test_three_player_easy_game_round_trip() {
    let app = common::build_test_app();

    // POST /api/v1/sessions
    let session = create_session(&app, 3, "easy").await;
    let id = session["session_id"].as_str().unwrap().to_owned();
    let (a, b, c) = (player(&session, 0), player(&session, 1), player(&session, 2));
    assert_eq!(session["owner_player_id"], a.as_str());
    assert_eq!(session["current_phase"], "introduction");
    assert_eq!(session["duration_minutes"], 60);

    // Owner advances until voting.
    let mut phase = session["current_phase"].as_str().unwrap().to_owned();
    while phase != "voting" {
        let (status, json) =
            common::post_as(app.clone(), &format!("{SESSIONS}/{id}/phase/advance"), &a).await;
        assert_eq!(status, StatusCode::OK);
        phase = json["phase"].as_str().unwrap().to_owned();
    }

    // GET phase view in voting offers the vote action.
    let (status, view) =
        common::get_json(app.clone(), &format!("{SESSIONS}/{id}/phase"), Some(&c)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["available_actions"], json!(["vote"]));

    // A -> B and C -> B.
    for voter in [&a, &c] {
        let (status, _) = common::post_json(
            app.clone(),
            &format!("{SESSIONS}/{id}/votes"),
            Some(voter),
            &json!({ "target_player_id": b }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // Result is not available yet.
    let (status, json) = common::get_json(app.clone(), &format!("{SESSIONS}/{id}/result"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "game_not_finished");

    // Advance to the last phase.
    let (status, json) =
        common::post_as(app.clone(), &format!("{SESSIONS}/{id}/phase/advance"), &a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "reveal");

    // GET result
    let (status, result) = common::get_json(app, &format!("{SESSIONS}/{id}/result"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["winner_id"], b.as_str());
    let mut expected_tally = serde_json::Map::new();
    expected_tally.insert(b.clone(), json!(2));
    assert_eq!(result["vote_tally"], Value::Object(expected_tally));
    assert_eq!(result["total_votes"], 2);
    assert_eq!(result["player_names"][a.as_str()], "Alex Crawford");
    assert!(result["truth"].as_str().unwrap().contains("Alex Crawford"));
}

#[tokio::test]
async fn test_second_vote_returns_409_already_voted() {
    let app = common::build_test_app();
    let session = create_session(&app, 2, "easy").await;
    let id = session["session_id"].as_str().unwrap().to_owned();
    let (a, b) = (player(&session, 0), player(&session, 1));
    for _ in 0..3 {
        common::post_as(app.clone(), &format!("{SESSIONS}/{id}/phase/advance"), &a).await;
    }

    let vote = |target: &str| json!({ "target_player_id": target });
    let (first, _) =
        common::post_json(app.clone(), &format!("{SESSIONS}/{id}/votes"), Some(&b), &vote(&a)).await;
    let (second, json) =
        common::post_json(app, &format!("{SESSIONS}/{id}/votes"), Some(&b), &vote(&b)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(json["error"], "already_voted");
}

#[tokio::test]
async fn test_vote_for_stranger_returns_400_invalid_target() {
    let app = common::build_test_app();
    let session = create_session(&app, 2, "easy").await;
    let id = session["session_id"].as_str().unwrap().to_owned();
    let a = player(&session, 0);
    for _ in 0..3 {
        common::post_as(app.clone(), &format!("{SESSIONS}/{id}/phase/advance"), &a).await;
    }

    let (status, json) = common::post_json(
        app,
        &format!("{SESSIONS}/{id}/votes"),
        Some(&a),
        &json!({ "target_player_id": uuid::Uuid::new_v4() }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_target");
}

#[tokio::test]
async fn test_phase_view_is_role_scoped() {
    let app = common::build_test_app();
    let session = create_session(&app, 3, "medium").await;
    let id = session["session_id"].as_str().unwrap().to_owned();
    let (a, b) = (player(&session, 0), player(&session, 1));

    let (_, owner_view) =
        common::get_json(app.clone(), &format!("{SESSIONS}/{id}/phase"), Some(&a)).await;
    let (_, guest_view) = common::get_json(app, &format!("{SESSIONS}/{id}/phase"), Some(&b)).await;

    assert_eq!(owner_view["role"]["role_id"], "partner");
    assert_eq!(guest_view["role"]["role_id"], "secretary");
    assert_ne!(owner_view["hints"], guest_view["hints"]);
    assert_eq!(owner_view["description"], guest_view["description"]);
    assert_eq!(owner_view["available_actions"], json!(["advance_phase"]));
    assert_eq!(guest_view["available_actions"], json!([]));
    assert!(!owner_view["secrets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_join_then_session_summary_lists_new_player() {
    let app = common::build_test_app();
    let session = create_session(&app, 2, "hard").await;
    let id = session["session_id"].as_str().unwrap().to_owned();

    let (status, joined) =
        common::post_json(app.clone(), &format!("{SESSIONS}/{id}/players"), None, &json!({})).await;
    let (_, summary) = common::get_json(app, &format!("{SESSIONS}/{id}"), None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(joined["role_id"], "rival");
    assert_eq!(summary["players"].as_array().unwrap().len(), 3);
    assert_eq!(summary["players"][2]["player_id"], joined["player_id"]);
    assert_eq!(summary["phase_count"], 7);
}

#[tokio::test]
async fn test_unknown_session_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::new_v4();

    let (status, json) = common::get_json(app, &format!("{SESSIONS}/{id}"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "session_not_found");
}
