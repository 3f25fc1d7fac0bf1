//! Match analysis calls: team search, upcoming fixtures, and the analysis history.

// self
use crate::{
	_prelude::*,
	gateway::{ApiRequest, Gateway},
	http::HttpTransport,
};

/// Number of upcoming fixtures requested per team.
pub const UPCOMING_FIXTURES: u32 = 5;

/// Team identity as returned by the football search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
	/// Provider team identifier.
	pub id: i64,
	/// Team name.
	pub name: String,
	/// Crest location.
	#[serde(default)]
	pub logo: String,
}

/// Home ground of a team, when the provider knows it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Venue {
	/// Provider venue identifier.
	pub id: Option<i64>,
	/// Stadium name.
	pub name: Option<String>,
	/// City.
	pub city: Option<String>,
}

/// One team search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSearchResult {
	/// Matched team.
	pub team: Team,
	/// Home ground.
	#[serde(default)]
	pub venue: Option<Venue>,
}

/// Outcome probabilities of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
	/// Home win.
	pub home: f64,
	/// Draw.
	pub draw: f64,
	/// Away win.
	pub away: f64,
}

/// A named way the match could unfold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
	/// Short label.
	pub name: String,
	/// Estimated probability.
	pub probability: f64,
	/// Narrative.
	#[serde(default)]
	pub description: String,
}

/// Model probability compared with the market price of one outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
	/// Outcome label.
	pub outcome: String,
	/// Model probability.
	pub ai_probability: f64,
	/// Bookmaker odds.
	pub market_odds: f64,
	/// Edge over the market, in percent.
	pub value_percentage: f64,
	/// Whether the edge is large enough to count as value.
	pub is_value: bool,
}

/// Full analysis of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
	/// Analysis identifier.
	pub id: String,
	/// Fixture the analysis covers.
	pub fixture_id: i64,
	/// Home side.
	pub home_team: String,
	/// Away side.
	pub away_team: String,
	/// Competition.
	#[serde(default)]
	pub league_name: String,
	/// Kick-off, as sent by the server.
	pub match_date: String,
	/// Outcome probabilities.
	pub predictions: Prediction,
	/// Most likely outcome.
	pub predicted_outcome: String,
	/// Model confidence.
	pub confidence_score: f64,
	/// Headline summary.
	#[serde(default)]
	pub summary: String,
	/// Factors that drove the prediction.
	#[serde(default)]
	pub key_factors: Vec<String>,
	/// Alternative scenarios.
	#[serde(default)]
	pub scenarios: Vec<Scenario>,
	/// Value pick, if the market misprices an outcome.
	#[serde(default)]
	pub value_bet: Option<ValueBet>,
	/// Final result, once played.
	#[serde(default)]
	pub actual_result: Option<String>,
	/// Whether the prediction held.
	#[serde(default)]
	pub was_correct: Option<bool>,
	/// Creation timestamp.
	#[serde(default)]
	pub created_at: String,
}

/// Analysis summary as returned by the history endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisListItem {
	/// Analysis identifier.
	pub id: String,
	/// Home side.
	pub home_team: String,
	/// Away side.
	pub away_team: String,
	/// Competition.
	#[serde(default)]
	pub league_name: String,
	/// Kick-off.
	#[serde(default)]
	pub match_date: String,
	/// Most likely outcome.
	#[serde(default)]
	pub predicted_outcome: String,
	/// Model confidence.
	#[serde(default)]
	pub confidence_score: f64,
	/// Whether the prediction held, once played.
	#[serde(default)]
	pub was_correct: Option<bool>,
	/// Creation timestamp.
	#[serde(default)]
	pub created_at: String,
}

// Some deployments wrap the hits in `{ "teams": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TeamSearchReply {
	Wrapped { teams: Vec<TeamSearchResult> },
	Bare(Vec<TeamSearchResult>),
}

#[derive(Deserialize)]
struct FixturesEnvelope {
	#[serde(default)]
	fixtures: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct MatchAnalysisRequest {
	fixture_id: i64,
}

#[derive(Serialize)]
struct DuelAnalysisRequest {
	home_team_id: i64,
	away_team_id: i64,
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Searches teams by name.
	pub async fn search_teams(&self, name: &str) -> Result<Vec<TeamSearchResult>> {
		let request = ApiRequest::get("/football/teams/search").query("name", name);
		let teams = match self.send_json::<TeamSearchReply>(request).await? {
			TeamSearchReply::Wrapped { teams } | TeamSearchReply::Bare(teams) => teams,
		};

		Ok(teams)
	}

	/// Lists the next [`UPCOMING_FIXTURES`] fixtures of a team as raw provider objects.
	pub async fn upcoming_fixtures(&self, team_id: i64) -> Result<Vec<serde_json::Value>> {
		let request = ApiRequest::get("/football/fixtures")
			.query("team", team_id)
			.query("next", UPCOMING_FIXTURES);

		Ok(self.send_json::<FixturesEnvelope>(request).await?.fixtures)
	}

	/// Analyzes a scheduled fixture.
	pub async fn analyze_match(&self, fixture_id: i64) -> Result<MatchAnalysis> {
		let request =
			ApiRequest::post("/analyze/match").try_json(&MatchAnalysisRequest { fixture_id })?;

		self.send_json(request).await
	}

	/// Analyzes a hypothetical meeting of two teams.
	pub async fn analyze_duel(
		&self,
		home_team_id: i64,
		away_team_id: i64,
	) -> Result<MatchAnalysis> {
		let request = ApiRequest::post("/analyze/custom")
			.try_json(&DuelAnalysisRequest { home_team_id, away_team_id })?;

		self.send_json(request).await
	}

	/// Lists past analyses, newest first.
	pub async fn analysis_history(
		&self,
		limit: u32,
		offset: u32,
	) -> Result<Vec<AnalysisListItem>> {
		let request =
			ApiRequest::get("/analyze/history").query("limit", limit).query("offset", offset);

		self.send_json(request).await
	}

	/// Fetches one analysis.
	pub async fn analysis(&self, id: &str) -> Result<MatchAnalysis> {
		self.send_json(ApiRequest::get(format!("/analyze/{id}"))).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn team_search_accepts_both_reply_shapes() {
		let hit = r#"{"team":{"id":33,"name":"Manchester United","logo":"mu.png"}}"#;
		let bare: TeamSearchReply =
			serde_json::from_str(&format!("[{hit}]")).expect("Bare list should decode.");
		let wrapped: TeamSearchReply = serde_json::from_str(&format!(r#"{{"teams":[{hit}]}}"#))
			.expect("Wrapped list should decode.");

		for reply in [bare, wrapped] {
			let (TeamSearchReply::Wrapped { teams } | TeamSearchReply::Bare(teams)) = reply;

			assert_eq!(teams.len(), 1);
			assert_eq!(teams[0].team.id, 33);
			assert_eq!(teams[0].venue, None);
		}
	}

	#[test]
	fn analyses_without_value_bets_decode() {
		let analysis: MatchAnalysis = serde_json::from_value(serde_json::json!({
			"id": "a1",
			"fixture_id": 1035,
			"home_team": "Arsenal",
			"away_team": "Chelsea",
			"match_date": "2026-10-17T15:00:00Z",
			"predictions": { "home": 0.5, "draw": 0.3, "away": 0.2 },
			"predicted_outcome": "home",
			"confidence_score": 0.7
		}))
		.expect("Sparse analysis should decode.");

		assert_eq!(analysis.value_bet, None);
		assert!(analysis.scenarios.is_empty());
		assert_eq!(analysis.predictions.draw, 0.3);
	}
}
