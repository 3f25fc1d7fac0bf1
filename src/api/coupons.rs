//! Coupon and fixture-odds calls routed through the refreshing gateway.

// self
use crate::{
	_prelude::*,
	gateway::{ApiRequest, Gateway},
	http::HttpTransport,
	odds::{self, FixtureOdds, ParsedOdds, Priced},
};

/// One leg of a coupon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouponSelection {
	/// Server-side identifier, absent before the coupon is created.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Fixture the selection is placed on.
	pub fixture_id: i64,
	/// Home side.
	pub home_team: String,
	/// Away side.
	pub away_team: String,
	/// Kick-off, as sent by the server.
	pub match_date: String,
	/// Pick label, e.g. `1`, `X`, `Over 2.5`.
	pub selection_type: String,
	/// Decimal odds of the pick.
	pub odds: f64,
	/// Bookmaker-implied probability.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub implied_probability: Option<f64>,
	/// Model probability.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ai_probability: Option<f64>,
	/// Model edge over the bookmaker.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub edge: Option<f64>,
	/// Settled result, once known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<String>,
}
impl CouponSelection {
	/// Creates a selection that has not been analyzed yet.
	pub fn new(
		fixture_id: i64,
		home_team: impl Into<String>,
		away_team: impl Into<String>,
		match_date: impl Into<String>,
		selection_type: impl Into<String>,
		odds: f64,
	) -> Self {
		Self {
			id: None,
			fixture_id,
			home_team: home_team.into(),
			away_team: away_team.into(),
			match_date: match_date.into(),
			selection_type: selection_type.into(),
			odds,
			implied_probability: None,
			ai_probability: None,
			edge: None,
			result: None,
		}
	}
}
impl Priced for CouponSelection {
	fn odds(&self) -> f64 {
		self.odds
	}
}

/// Body of `POST /coupons/create`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponCreate {
	/// Legs of the coupon.
	pub selections: Vec<CouponSelection>,
}
impl CouponCreate {
	/// Combined odds of every leg.
	pub fn total_odds(&self) -> f64 {
		odds::total_odds(&self.selections)
	}
}

/// Per-selection commentary from the analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionInsight {
	/// Match label.
	pub r#match: String,
	/// Commentary.
	pub insight: String,
}

/// Analysis attached to a coupon.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponAnalysis {
	/// Probability of every leg landing.
	pub overall_probability: f64,
	/// Risk score.
	pub risk_score: f64,
	/// Least likely leg.
	pub weakest_link: String,
	/// How well the legs fit together.
	pub coherence_score: f64,
	/// Short recommendation.
	pub recommendation: String,
	/// Long-form analysis.
	pub detailed_analysis: String,
	/// Per-selection notes.
	pub selection_insights: Vec<SelectionInsight>,
}

/// Full coupon as returned by the detail and create endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
	/// Coupon identifier.
	pub id: String,
	/// Owner.
	#[serde(default)]
	pub user_id: String,
	/// Origin, e.g. `user_created` or `daily_safe`.
	#[serde(default)]
	pub coupon_type: String,
	/// Legs.
	#[serde(default)]
	pub selections: Vec<CouponSelection>,
	/// Combined odds.
	#[serde(default)]
	pub total_odds: f64,
	/// Stake, if recorded.
	#[serde(default)]
	pub stake: Option<f64>,
	/// Potential payout, if a stake is recorded.
	#[serde(default)]
	pub potential_win: Option<f64>,
	/// Estimated probability of success.
	#[serde(default)]
	pub success_probability: f64,
	/// Risk bucket (`low` .. `extreme`).
	#[serde(default)]
	pub risk_level: String,
	/// Headline recommendation.
	#[serde(default)]
	pub ai_recommendation: String,
	/// Weak legs called out by the analysis.
	#[serde(default)]
	pub weak_points: Vec<String>,
	/// Detailed analysis, when computed.
	#[serde(default)]
	pub ai_analysis: Option<CouponAnalysis>,
	/// Settlement status.
	#[serde(default)]
	pub status: String,
	/// Legs won so far.
	#[serde(default)]
	pub matches_won: u32,
	/// Legs lost so far.
	#[serde(default)]
	pub matches_lost: u32,
	/// Creation timestamp.
	#[serde(default)]
	pub created_at: String,
	/// Settlement timestamp.
	#[serde(default)]
	pub resolved_at: Option<String>,
}

/// Coupon summary as returned by the listing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CouponListItem {
	/// Coupon identifier.
	pub id: String,
	/// Origin.
	#[serde(default)]
	pub coupon_type: String,
	/// Combined odds.
	#[serde(default)]
	pub total_odds: f64,
	/// Estimated probability of success.
	#[serde(default)]
	pub success_probability: f64,
	/// Risk bucket.
	#[serde(default)]
	pub risk_level: String,
	/// Settlement status.
	#[serde(default)]
	pub status: String,
	/// Number of legs.
	#[serde(default)]
	pub selections_count: u32,
	/// Creation timestamp.
	#[serde(default)]
	pub created_at: String,
}

#[derive(Deserialize)]
struct FixtureOddsEnvelope {
	#[serde(default)]
	odds: Vec<FixtureOdds>,
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Submits a coupon for analysis.
	pub async fn create_coupon(&self, coupon: &CouponCreate) -> Result<Coupon> {
		self.send_json(ApiRequest::post("/coupons/create").try_json(coupon)?).await
	}

	/// Fetches today's generated coupons as list summaries.
	pub async fn daily_coupons(&self) -> Result<Vec<CouponListItem>> {
		self.send_json(ApiRequest::get("/coupons/daily")).await
	}

	/// Lists the user's coupons, newest first.
	pub async fn list_coupons(&self, limit: u32, offset: u32) -> Result<Vec<CouponListItem>> {
		let request = ApiRequest::get("/coupons/").query("limit", limit).query("offset", offset);

		self.send_json(request).await
	}

	/// Fetches one coupon.
	pub async fn coupon(&self, id: &str) -> Result<Coupon> {
		self.send_json(ApiRequest::get(format!("/coupons/{id}"))).await
	}

	/// Deletes one coupon.
	pub async fn delete_coupon(&self, id: &str) -> Result<()> {
		self.send(ApiRequest::delete(format!("/coupons/{id}"))).await.map(drop)
	}

	/// Re-runs the analysis of one coupon.
	pub async fn reanalyze_coupon(&self, id: &str) -> Result<Coupon> {
		self.send_json(ApiRequest::put(format!("/coupons/{id}/reanalyze"))).await
	}

	/// Fetches bookmaker odds for a fixture and reduces them to [`ParsedOdds`].
	///
	/// Returns `Ok(None)` when no bookmaker quotes the fixture.
	pub async fn fixture_odds(&self, fixture_id: i64) -> Result<Option<ParsedOdds>> {
		let envelope = self
			.send_json::<FixtureOddsEnvelope>(ApiRequest::get(format!(
				"/football/fixtures/{fixture_id}/odds"
			)))
			.await?;

		Ok(odds::parse_fixture_odds(&envelope.odds))
	}
}
