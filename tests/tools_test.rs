mod common;

use serde_json::{Value, json};
use spotify_mcp::{
    mcp::{
        INVALID_PARAMS, McpServer, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
        resources::{AVAILABLE_DEVICES, CURRENT_USER},
    },
    spotify::{SpotifyClient, transport::Method},
};

use common::{FakeTransport, device_json, playing_json, track_json};

fn server(fake: FakeTransport) -> McpServer<FakeTransport> {
    McpServer::new(SpotifyClient::new(fake))
}

async fn request(server: &McpServer<FakeTransport>, method: &str, params: Value) -> Value {
    let line = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
    server.handle_line(&line.to_string()).await.unwrap()
}

async fn call(server: &McpServer<FakeTransport>, name: &str, arguments: Value) -> (bool, String) {
    let response = request(
        server,
        "tools/call",
        json!({ "name": name, "arguments": arguments }),
    )
    .await;
    let result = &response["result"];
    (
        result["isError"].as_bool().unwrap(),
        result["content"][0]["text"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_initialize() {
    let server = server(FakeTransport::new());

    let response = request(&server, "initialize", json!({})).await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert!(response["result"]["capabilities"]["prompts"].is_object());
    assert_eq!(response["result"]["serverInfo"]["name"], "spotify-mcp");
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let server = server(FakeTransport::new());

    let reply = server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_protocol_errors() {
    let server = server(FakeTransport::new());

    let response = request(&server, "sampling/createMessage", json!({})).await;
    assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);

    let response = server.handle_line("{not json").await.unwrap();
    assert_eq!(response["error"]["code"], PARSE_ERROR);
    assert!(response["id"].is_null());

    let response = request(&server, "tools/call", json!({ "arguments": {} })).await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
}

#[tokio::test]
async fn test_tools_list() {
    let server = server(FakeTransport::new());

    let response = request(&server, "tools/list", json!({})).await;
    let tools = response["result"]["tools"].as_array().unwrap();

    assert_eq!(tools.len(), 8);
    for tool in tools {
        assert!(tool["name"].as_str().unwrap().starts_with("Spotify"));
        assert!(tool["inputSchema"].is_object());
    }

    let playback = tools.iter().find(|t| t["name"] == "SpotifyPlayback").unwrap();
    let schema = playback["inputSchema"].to_string();
    assert!(schema.contains("action"));
    assert!(schema.contains("num_skips"));
}

#[tokio::test]
async fn test_playback_get_without_track() {
    let server = server(FakeTransport::new());

    let (is_error, text) = call(&server, "SpotifyPlayback", json!({ "action": "get" })).await;

    assert!(!is_error);
    assert_eq!(text, "No track playing.");
}

#[tokio::test]
async fn test_playback_get_returns_track_json() {
    let fake = FakeTransport::new().on(
        Method::Get,
        "/me/player/currently-playing",
        playing_json(track_json("t1", "Never Gonna Give You Up", &["Rick Astley"]), true),
    );
    let server = server(fake);

    let (is_error, text) = call(&server, "SpotifyPlayback", json!({ "action": "get" })).await;

    assert!(!is_error);
    let track: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(track["artist"], "Rick Astley");
    assert_eq!(track["is_playing"], true);
}

#[tokio::test]
async fn test_unknown_action_is_validation_error() {
    let server = server(FakeTransport::new());

    let (is_error, text) = call(&server, "SpotifyPlayback", json!({ "action": "rewind" })).await;

    assert!(is_error);
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["error"]["code"], "validation_error");
    assert!(report["error"]["suggestion"].is_string());
}

#[tokio::test]
async fn test_unknown_tool() {
    let server = server(FakeTransport::new());

    let (is_error, text) = call(&server, "SpotifyDance", json!({})).await;

    assert!(is_error);
    assert!(text.contains("unknown tool: SpotifyDance"));
}

#[tokio::test]
async fn test_missing_required_field_for_action() {
    let server = server(FakeTransport::new());

    let (is_error, text) = call(&server, "SpotifyQueue", json!({ "action": "add" })).await;

    assert!(is_error);
    assert!(text.contains("track_id is required for add action"));
}

#[tokio::test]
async fn test_provider_failure_carries_status() {
    let fake = FakeTransport::new()
        .devices(json!([device_json("A", true)]))
        .fail(Method::Post, "/me/player/next", 403, "Player command failed: Premium required");
    let server = server(fake);

    let (is_error, text) = call(&server, "SpotifyPlayback", json!({ "action": "skip" })).await;

    assert!(is_error);
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["error"]["code"], "premium_required");
    assert_eq!(report["error"]["details"]["http_status"], 403);
}

#[tokio::test]
async fn test_search_tool() {
    let fake = FakeTransport::new().on(
        Method::Get,
        "/search",
        json!({ "tracks": { "items": [track_json("t1", "Never Gonna Give You Up", &["Rick Astley"])] } }),
    );
    let server = server(fake);

    let (is_error, text) = call(&server, "SpotifySearch", json!({ "query": "rick" })).await;

    assert!(!is_error);
    let results: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(results["tracks"][0]["name"], "Never Gonna Give You Up");

    let sent = server.client().transport().sent(Method::Get, "/search");
    assert_eq!(sent[0].query_value("type"), Some("track"));
    assert_eq!(sent[0].query_value("limit"), Some("10"));
}

#[tokio::test]
async fn test_get_info_not_found_text() {
    let server = server(FakeTransport::new());

    let (is_error, text) = call(
        &server,
        "SpotifyGetInfo",
        json!({ "item_id": "nope", "qtype": "album" }),
    )
    .await;

    assert!(!is_error);
    assert_eq!(text, "No album found with id nope.");
}

#[tokio::test]
async fn test_playlist_items_add() {
    let fake = FakeTransport::new().on(
        Method::Post,
        "/playlists/pl1/tracks",
        json!({ "snapshot_id": "snap-1" }),
    );
    let server = server(fake);

    let (is_error, text) = call(
        &server,
        "SpotifyPlaylistItems",
        json!({ "action": "add", "playlist_id": "pl1", "uris": ["a", "b"] }),
    )
    .await;

    assert!(!is_error);
    assert_eq!(text, "Added 2 tracks to playlist. Snapshot ID: snap-1");
}

#[tokio::test]
async fn test_playlist_create_uses_current_user() {
    let fake = FakeTransport::new()
        .on(Method::Get, "/me", json!({ "id": "ada" }))
        .on(
            Method::Post,
            "/users/ada/playlists",
            json!({ "id": "pl9", "name": "Fresh", "owner": { "id": "ada" } }),
        );
    let server = server(fake);

    let (is_error, text) = call(
        &server,
        "SpotifyPlaylistManage",
        json!({ "action": "create", "name": "Fresh" }),
    )
    .await;

    assert!(!is_error);
    let playlist: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(playlist["id"], "pl9");
}

#[tokio::test]
async fn test_resources() {
    let fake = FakeTransport::new()
        .devices(json!([device_json("A", true)]))
        .on(Method::Get, "/me", json!({ "id": "ada", "display_name": "Ada" }));
    let server = server(fake);

    let response = request(&server, "resources/list", json!({})).await;
    assert_eq!(response["result"]["resources"].as_array().unwrap().len(), 4);
    assert_eq!(response["result"]["resources"][0]["mimeType"], "application/json");

    let response = request(&server, "resources/read", json!({ "uri": AVAILABLE_DEVICES })).await;
    let content = &response["result"]["contents"][0];
    assert_eq!(content["uri"], AVAILABLE_DEVICES);
    let devices: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(devices["devices"][0]["id"], "A");

    let response = request(&server, "resources/read", json!({ "uri": CURRENT_USER })).await;
    let text = response["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.contains("\"ada\""));

    let response = request(&server, "resources/read", json!({ "uri": "spotify://nope" })).await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
}

async fn prompt_text(server: &McpServer<FakeTransport>, name: &str, arguments: Value) -> (String, String) {
    let response = request(server, "prompts/get", json!({ "name": name, "arguments": arguments })).await;
    let result = &response["result"];
    assert_eq!(result["messages"].as_array().unwrap().len(), 1);
    assert_eq!(result["messages"][0]["role"], "user");
    assert_eq!(result["messages"][0]["content"]["type"], "text");
    (
        result["description"].as_str().unwrap().to_string(),
        result["messages"][0]["content"]["text"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_prompts_list() {
    let server = server(FakeTransport::new());

    let response = request(&server, "prompts/list", json!({})).await;
    let prompts = response["result"]["prompts"].as_array().unwrap();

    let names: Vec<_> = prompts.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "create_mood_playlist",
            "discover_similar_music",
            "party_playlist_generator",
            "workout_playlist_builder",
            "focus_music_curator",
        ]
    );
    for prompt in prompts {
        assert!(!prompt["description"].as_str().unwrap().is_empty());
        assert!(prompt["arguments"].is_array());
    }
}

#[tokio::test]
async fn test_mood_playlist_prompt() {
    let server = server(FakeTransport::new());

    let (description, text) = prompt_text(
        &server,
        "create_mood_playlist",
        json!({ "mood": "energetic", "genre": "rock", "decade": "2000s" }),
    )
    .await;
    assert!(description.contains("energetic"));
    assert!(text.contains("with rock music from the 2000s"));
    assert!(text.contains("SpotifySearch"));
    assert!(text.contains("1.") && text.contains("2.") && text.contains("3."));

    let (_, text) = prompt_text(&server, "create_mood_playlist", json!({ "mood": "chill" })).await;
    assert!(text.contains("Chill Vibes"));
    assert!(text.contains("Genre variety"));
}

#[tokio::test]
async fn test_prompt_defaults_without_arguments() {
    let server = server(FakeTransport::new());

    let response = request(&server, "prompts/get", json!({ "name": "create_mood_playlist" })).await;
    let text = response["result"]["messages"][0]["content"]["text"].as_str().unwrap();

    assert!(text.contains("happy"));
}

#[tokio::test]
async fn test_curation_prompts() {
    let server = server(FakeTransport::new());

    let (description, text) = prompt_text(
        &server,
        "discover_similar_music",
        json!({ "reference": "Taylor Swift", "discovery_level": "deep_cuts" }),
    )
    .await;
    assert!(description.contains("Taylor Swift"));
    assert!(text.contains("deep_cuts"));
    assert!(text.contains("lesser-known tracks"));

    let (_, text) = prompt_text(
        &server,
        "party_playlist_generator",
        json!({ "party_type": "dance_party", "duration_hours": "4" }),
    )
    .await;
    assert!(text.contains("4 hours"));
    assert!(text.contains("60 tracks"));
    assert!(text.contains("Dance Party Mix"));

    let (_, text) = prompt_text(
        &server,
        "workout_playlist_builder",
        json!({ "workout_type": "cardio", "intensity": "high" }),
    )
    .await;
    assert!(text.contains("120-140"));
    assert!(text.contains("Cardio Power - High"));

    let (_, text) = prompt_text(
        &server,
        "focus_music_curator",
        json!({ "focus_type": "coding", "noise_level": "minimal" }),
    )
    .await;
    assert!(text.contains("Deep Focus - Coding"));
    assert!(text.contains("instrumental"));
}

#[tokio::test]
async fn test_prompt_errors() {
    let server = server(FakeTransport::new());

    let response = request(&server, "prompts/get", json!({ "name": "unknown_prompt" })).await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);

    let response = request(
        &server,
        "prompts/get",
        json!({ "name": "party_playlist_generator", "arguments": { "duration_hours": "all night" } }),
    )
    .await;
    assert_eq!(response["error"]["code"], INVALID_PARAMS);
    assert!(response["error"]["message"].as_str().unwrap().contains("duration_hours"));
}

#[tokio::test]
async fn test_serve_answers_each_request_line() {
    let server = server(FakeTransport::new());
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        "\n",
    );
    let mut output = Vec::new();

    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["id"], 2);
    assert_eq!(lines[1]["result"], json!({}));
}
