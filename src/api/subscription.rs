//! Subscription plans, checkout, and billing portal calls.

// self
use crate::{
	_prelude::*,
	gateway::{ApiRequest, Gateway},
	http::HttpTransport,
};

/// Payment provider used when a checkout does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "stripe";

/// Price of every plan in the caller's currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPricing {
	/// Monthly starter plan.
	pub starter: f64,
	/// Monthly pro plan.
	pub pro: f64,
	/// One-off lifetime plan.
	pub lifetime: f64,
}

/// Localized pricing, resolved by the backend from the caller's country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
	/// ISO currency code.
	pub currency: String,
	/// Currency symbol.
	pub symbol: String,
	/// Plan prices.
	pub plans: PlanPricing,
	/// Country the prices were resolved for.
	#[serde(default)]
	pub country_code: String,
}

/// Body of `POST /subscription/checkout`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
	/// `starter`, `pro`, or `lifetime`.
	pub plan_type: String,
	/// Payment provider.
	pub payment_method: String,
	/// Where the provider sends the user after paying.
	pub success_url: String,
	/// Where the provider sends the user after backing out.
	pub cancel_url: String,
}
impl CheckoutRequest {
	/// Creates a checkout for `plan_type` paid through [`DEFAULT_PAYMENT_METHOD`].
	pub fn new(
		plan_type: impl Into<String>,
		success_url: impl Into<String>,
		cancel_url: impl Into<String>,
	) -> Self {
		Self {
			plan_type: plan_type.into(),
			payment_method: DEFAULT_PAYMENT_METHOD.into(),
			success_url: success_url.into(),
			cancel_url: cancel_url.into(),
		}
	}

	/// Overrides the payment provider.
	pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
		self.payment_method = payment_method.into();

		self
	}
}

/// Hosted page the user must be sent to, for checkout or the billing portal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
	/// Provider-hosted URL.
	pub checkout_url: String,
}

/// Current plan of the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
	/// Plan label.
	pub plan: String,
	/// End of the paid period, if the plan expires.
	#[serde(default)]
	pub expires_at: Option<String>,
	/// Whether the plan is currently active.
	#[serde(default = "active_by_default")]
	pub is_active: bool,
}

/// Backend acknowledgement of a cancellation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
	/// Resulting subscription status.
	pub status: String,
	/// Human-readable confirmation.
	#[serde(default)]
	pub message: String,
}

fn active_by_default() -> bool {
	true
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches plan prices localized for the caller.
	pub async fn pricing(&self) -> Result<Pricing> {
		self.send_json(ApiRequest::get("/subscription/pricing")).await
	}

	/// Opens a payment checkout and returns the page to send the user to.
	pub async fn create_checkout(&self, checkout: &CheckoutRequest) -> Result<CheckoutSession> {
		self.send_json(ApiRequest::post("/subscription/checkout").try_json(checkout)?).await
	}

	/// Fetches the user's current plan.
	pub async fn subscription_status(&self) -> Result<SubscriptionStatus> {
		self.send_json(ApiRequest::get("/subscription/status")).await
	}

	/// Opens the provider's billing portal.
	pub async fn create_portal_session(&self) -> Result<CheckoutSession> {
		self.send_json(ApiRequest::post("/subscription/portal")).await
	}

	/// Cancels the subscription at the end of the paid period.
	pub async fn cancel_subscription(&self) -> Result<CancelOutcome> {
		self.send_json(ApiRequest::post("/subscription/cancel")).await
	}
}
