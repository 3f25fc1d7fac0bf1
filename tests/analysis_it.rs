#![cfg(feature = "reqwest")]

mod common;

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;

fn analysis(id: &str) -> serde_json::Value {
	json!({
		"id": id,
		"fixture_id": 1035,
		"home_team": "Arsenal",
		"away_team": "Chelsea",
		"league_name": "Premier League",
		"match_date": "2026-10-17T15:00:00Z",
		"predictions": { "home": 0.48, "draw": 0.27, "away": 0.25 },
		"predicted_outcome": "home",
		"confidence_score": 0.68,
		"summary": "Arsenal are stronger at home.",
		"key_factors": ["Home form"],
		"scenarios": [
			{ "name": "Early goal", "probability": 0.4, "description": "Arsenal score first." }
		],
		"value_bet": {
			"outcome": "home",
			"ai_probability": 0.48,
			"market_odds": 2.3,
			"value_percentage": 10.4,
			"is_value": true
		},
		"created_at": "2026-10-16T09:00:00Z"
	})
}

#[tokio::test]
async fn team_search_and_fixtures_carry_their_query() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let search = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(api_path("/football/teams/search"))
				.query_param("name", "Arsenal")
				.header("authorization", "Bearer A");
			then.status(200).json_body(json!([{
				"team": { "id": 42, "name": "Arsenal", "logo": "ars.png" },
				"venue": { "id": 494, "name": "Emirates Stadium", "city": "London" }
			}]));
		})
		.await;
	let fixtures = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(api_path("/football/fixtures"))
				.query_param("team", "42")
				.query_param("next", "5");
			then.status(200).json_body(json!({
				"fixtures": [{ "fixture": { "id": 1035 } }, { "fixture": { "id": 1036 } }]
			}));
		})
		.await;
	let teams = harness.gateway.search_teams("Arsenal").await?;

	assert_eq!(teams.len(), 1);
	assert_eq!(teams[0].team.id, 42);
	assert_eq!(
		teams[0].venue.as_ref().and_then(|venue| venue.city.as_deref()),
		Some("London")
	);

	let upcoming = harness.gateway.upcoming_fixtures(teams[0].team.id).await?;

	assert_eq!(upcoming.len(), 2);
	assert_eq!(upcoming[1]["fixture"]["id"], 1036);

	search.assert_calls_async(1).await;
	fixtures.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn match_and_duel_analyses_post_their_targets() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let by_fixture = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(api_path("/analyze/match"))
				.header("authorization", "Bearer A")
				.json_body(json!({ "fixture_id": 1035 }));
			then.status(200).json_body(analysis("a1"));
		})
		.await;
	let duel = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(api_path("/analyze/custom"))
				.json_body(json!({ "home_team_id": 42, "away_team_id": 49 }));
			then.status(200).json_body(analysis("a2"));
		})
		.await;
	let first = harness.gateway.analyze_match(1035).await?;

	assert_eq!(first.id, "a1");
	assert_eq!(first.predicted_outcome, "home");
	assert!(first.value_bet.as_ref().is_some_and(|bet| bet.is_value));
	assert_eq!(first.scenarios[0].name, "Early goal");
	assert_eq!(harness.gateway.analyze_duel(42, 49).await?.id, "a2");

	by_fixture.assert_calls_async(1).await;
	duel.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn analysis_history_and_detail_are_fetched() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let history = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(api_path("/analyze/history"))
				.query_param("limit", "20")
				.query_param("offset", "0");
			then.status(200).json_body(json!([{
				"id": "a1",
				"home_team": "Arsenal",
				"away_team": "Chelsea",
				"league_name": "Premier League",
				"match_date": "2026-10-17T15:00:00Z",
				"predicted_outcome": "home",
				"confidence_score": 0.68,
				"was_correct": null,
				"created_at": "2026-10-16T09:00:00Z"
			}]));
		})
		.await;
	let detail = server
		.mock_async(|when, then| {
			when.method(GET).path(api_path("/analyze/a1"));
			then.status(200).json_body(analysis("a1"));
		})
		.await;
	let items = harness.gateway.analysis_history(20, 0).await?;

	assert_eq!(items.len(), 1);
	assert_eq!(items[0].was_correct, None);

	let full = harness.gateway.analysis(&items[0].id).await?;

	assert_eq!(full.key_factors, vec!["Home form".to_owned()]);
	assert_eq!(full.predictions.home, 0.48);

	history.assert_calls_async(1).await;
	detail.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn chat_messages_are_sent_and_listed() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let send = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(api_path("/analyze/a1/chat"))
				.header("authorization", "Bearer A")
				.json_body(json!({ "content": "Who keeps a clean sheet?" }));
			then.status(200).json_body(json!({
				"id": "m2",
				"role": "assistant",
				"content": "Arsenal, most likely.",
				"created_at": "2026-10-16T09:05:00Z"
			}));
		})
		.await;
	let history = server
		.mock_async(|when, then| {
			when.method(GET).path(api_path("/analyze/a1/chat/history"));
			then.status(200).json_body(json!({
				"analysis_id": "a1",
				"messages": [
					{ "id": "m1", "role": "user", "content": "Who keeps a clean sheet?" },
					{ "id": "m2", "role": "assistant", "content": "Arsenal, most likely." }
				]
			}));
		})
		.await;
	let reply = harness.gateway.send_chat_message("a1", "Who keeps a clean sheet?").await?;

	assert_eq!(reply.role, "assistant");

	let messages = harness.gateway.chat_history("a1").await?;

	assert_eq!(messages.len(), 2);
	assert_eq!(messages[0].role, "user");
	assert_eq!(messages[1].content, reply.content);

	send.assert_calls_async(1).await;
	history.assert_calls_async(1).await;

	Ok(())
}
