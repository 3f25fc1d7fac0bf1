//! Bookmaker odds parsing and coupon odds aggregation.
//!
//! Raw fixture odds arrive as bookmaker → bet market → `{value, odd}` entries with odds encoded
//! as strings. Only the first bookmaker of the first entry is consulted. Every market price
//! falls back to a fixed default when the bookmaker omits it or sends an unusable value.

// self
use crate::_prelude::*;

/// Fallback price applied to a selection whose odds are unusable.
pub const DEFAULT_SELECTION_ODDS: f64 = 1.5;

const MATCH_WINNER: &str = "Match Winner";
const GOALS_OVER_UNDER: &str = "Goals Over/Under";
const BOTH_TEAMS_SCORE: &str = "Both Teams Score";

/// One `{value, odd}` pair within a bet market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OddValue {
	/// Outcome label, e.g. `Home` or `Over 2.5`.
	pub value: String,
	/// Decimal odds as sent by the bookmaker.
	#[serde(deserialize_with = "odd_as_string")]
	pub odd: String,
}

/// Bet market offered by a bookmaker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bet {
	/// Market identifier.
	#[serde(default)]
	pub id: i64,
	/// Market name, e.g. `Match Winner`.
	pub name: String,
	/// Priced outcomes.
	#[serde(default)]
	pub values: Vec<OddValue>,
}

/// Bookmaker with its markets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
	/// Bookmaker identifier.
	#[serde(default)]
	pub id: i64,
	/// Bookmaker name.
	#[serde(default)]
	pub name: String,
	/// Offered markets.
	#[serde(default)]
	pub bets: Vec<Bet>,
}

/// Odds entry for a fixture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureOdds {
	/// Bookmakers quoting the fixture.
	#[serde(default)]
	pub bookmakers: Vec<Bookmaker>,
}

/// Simplified prices for the markets the coupon builder offers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedOdds {
	/// Home win.
	pub home: f64,
	/// Draw.
	pub draw: f64,
	/// Away win.
	pub away: f64,
	/// Over 2.5 goals.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub over25: Option<f64>,
	/// Under 2.5 goals.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub under25: Option<f64>,
	/// Both teams score.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub btts_yes: Option<f64>,
	/// At least one team fails to score.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub btts_no: Option<f64>,
}
impl ParsedOdds {
	/// Home price used when none is quoted.
	pub const DEFAULT_HOME: f64 = 1.5;
	/// Draw price used when none is quoted.
	pub const DEFAULT_DRAW: f64 = 3.5;
	/// Away price used when none is quoted.
	pub const DEFAULT_AWAY: f64 = 5.0;

	/// Returns the 1X2 price for a pick (`1`, `X`, or `2`).
	pub fn for_pick(&self, pick: &str) -> Option<f64> {
		match pick.trim() {
			"1" => Some(sanitize(self.home, Self::DEFAULT_HOME)),
			"X" | "x" => Some(sanitize(self.draw, Self::DEFAULT_DRAW)),
			"2" => Some(sanitize(self.away, Self::DEFAULT_AWAY)),
			_ => None,
		}
	}
}
impl Default for ParsedOdds {
	fn default() -> Self {
		Self {
			home: Self::DEFAULT_HOME,
			draw: Self::DEFAULT_DRAW,
			away: Self::DEFAULT_AWAY,
			over25: None,
			under25: None,
			btts_yes: None,
			btts_no: None,
		}
	}
}

/// Anything carrying a decimal price that contributes to a coupon's total odds.
pub trait Priced {
	/// Decimal odds of the selection.
	fn odds(&self) -> f64;
}
impl Priced for f64 {
	fn odds(&self) -> f64 {
		*self
	}
}

/// Parses a bookmaker price, falling back to `default` when it is not a positive finite number.
///
/// Only the leading decimal number is read, so trailing noise such as `2.10x` or `1.95 (est)`
/// still yields a price.
pub fn parse_odd(raw: &str, default: f64) -> f64 {
	leading_number(raw).map(|v| sanitize(v, default)).unwrap_or(default)
}

/// Longest prefix of `raw` (after leading whitespace) that reads as a decimal number.
fn leading_number(raw: &str) -> Option<f64> {
	let raw = raw.trim_start();
	let bytes = raw.as_bytes();
	let digits_from = |mut i: usize| {
		while bytes.get(i).is_some_and(u8::is_ascii_digit) {
			i += 1;
		}

		i
	};
	let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
	let int_end = digits_from(end);
	let mut mantissa = int_end > end;

	end = int_end;

	if bytes.get(end) == Some(&b'.') {
		let frac_end = digits_from(end + 1);

		if frac_end > end + 1 || mantissa {
			mantissa = true;
			end = frac_end;
		}
	}
	if !mantissa {
		return None;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
		let exp_end = digits_from(end + 1 + sign);

		if exp_end > end + 1 + sign {
			end = exp_end;
		}
	}

	raw[..end].parse().ok()
}

/// Extracts [`ParsedOdds`] from the first bookmaker of the first entry.
///
/// Returns `None` when no bookmaker is present.
pub fn parse_fixture_odds(entries: &[FixtureOdds]) -> Option<ParsedOdds> {
	let bookmaker = entries.first()?.bookmakers.first()?;
	let mut parsed = ParsedOdds::default();

	for bet in &bookmaker.bets {
		match bet.name.as_str() {
			MATCH_WINNER =>
				for v in &bet.values {
					match v.value.as_str() {
						"Home" => parsed.home = parse_odd(&v.odd, ParsedOdds::DEFAULT_HOME),
						"Draw" => parsed.draw = parse_odd(&v.odd, ParsedOdds::DEFAULT_DRAW),
						"Away" => parsed.away = parse_odd(&v.odd, ParsedOdds::DEFAULT_AWAY),
						_ => {},
					}
				},
			GOALS_OVER_UNDER =>
				for v in &bet.values {
					match v.value.as_str() {
						"Over 2.5" => parsed.over25 = Some(parse_odd(&v.odd, 1.8)),
						"Under 2.5" => parsed.under25 = Some(parse_odd(&v.odd, 2.0)),
						_ => {},
					}
				},
			BOTH_TEAMS_SCORE =>
				for v in &bet.values {
					match v.value.as_str() {
						"Yes" => parsed.btts_yes = Some(parse_odd(&v.odd, 1.8)),
						"No" => parsed.btts_no = Some(parse_odd(&v.odd, 2.0)),
						_ => {},
					}
				},
			_ => {},
		}
	}

	Some(parsed)
}

/// Multiplies the selections' odds; unusable prices count as [`DEFAULT_SELECTION_ODDS`].
pub fn total_odds<'a, P, I>(selections: I) -> f64
where
	P: 'a + ?Sized + Priced,
	I: IntoIterator<Item = &'a P>,
{
	selections.into_iter().map(|s| sanitize(s.odds(), DEFAULT_SELECTION_ODDS)).product()
}

fn sanitize(value: f64, default: f64) -> f64 {
	if value.is_finite() && value > 0.0 { value } else { default }
}

fn odd_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	match serde_json::Value::deserialize(deserializer)? {
		serde_json::Value::String(s) => Ok(s),
		serde_json::Value::Null => Ok(String::new()),
		other => Ok(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixture() -> Vec<FixtureOdds> {
		serde_json::from_str(
			r#"[{"bookmakers":[{"id":8,"name":"Bet365","bets":[
				{"id":1,"name":"Match Winner","values":[
					{"value":"Home","odd":"2.10"},{"value":"Draw","odd":"abc"},
					{"value":"Away","odd":3.4}]},
				{"id":5,"name":"Goals Over/Under","values":[
					{"value":"Over 1.5","odd":"1.20"},{"value":"Over 2.5","odd":"1.95"},
					{"value":"Under 2.5","odd":"-1"}]},
				{"id":8,"name":"Both Teams Score","values":[{"value":"Yes","odd":"1.70"}]}
			]},{"id":9,"name":"Ignored","bets":[]}]}]"#,
		)
		.expect("Odds fixture should decode.")
	}

	#[test]
	fn parses_first_bookmaker_with_per_market_defaults() {
		let parsed = parse_fixture_odds(&fixture()).expect("Fixture has a bookmaker.");

		assert_eq!(parsed.home, 2.10);
		assert_eq!(parsed.draw, ParsedOdds::DEFAULT_DRAW);
		assert_eq!(parsed.away, 3.4);
		assert_eq!(parsed.over25, Some(1.95));
		assert_eq!(parsed.under25, Some(2.0));
		assert_eq!(parsed.btts_yes, Some(1.70));
		assert_eq!(parsed.btts_no, None);
	}

	#[test]
	fn prices_are_read_from_the_leading_number() {
		assert_eq!(parse_odd("2.10x", 1.5), 2.10);
		assert_eq!(parse_odd(" 1.95 (est)", 1.5), 1.95);
		assert_eq!(parse_odd("3.", 1.5), 3.0);
		assert_eq!(parse_odd(".5", 1.5), 0.5);
		assert_eq!(parse_odd("1e1", 1.5), 10.0);
		assert_eq!(parse_odd("2e", 1.5), 2.0);
		assert_eq!(parse_odd("-2.0", 1.5), 1.5);
		assert_eq!(parse_odd("abc", 3.5), 3.5);
		assert_eq!(parse_odd(".", 3.5), 3.5);
		assert_eq!(parse_odd("", 3.5), 3.5);
	}

	#[test]
	fn missing_bookmakers_yield_none() {
		assert_eq!(parse_fixture_odds(&[]), None);
		assert_eq!(parse_fixture_odds(&[FixtureOdds::default()]), None);
	}

	#[test]
	fn picks_map_to_one_x_two_prices() {
		let parsed = ParsedOdds { home: 1.8, draw: f64::NAN, ..ParsedOdds::default() };

		assert_eq!(parsed.for_pick("1"), Some(1.8));
		assert_eq!(parsed.for_pick("X"), Some(ParsedOdds::DEFAULT_DRAW));
		assert_eq!(parsed.for_pick("2"), Some(ParsedOdds::DEFAULT_AWAY));
		assert_eq!(parsed.for_pick("BTTS"), None);
	}

	#[test]
	fn total_odds_multiplies_and_sanitizes() {
		let legs = [2.0, f64::NAN, 1.5, 0.0];
		let total = total_odds(&legs);

		assert!((total - 2.0 * 1.5 * 1.5 * 1.5).abs() < 1e-9);
		assert_eq!(total_odds::<f64, _>(&[]), 1.0);
	}
}
