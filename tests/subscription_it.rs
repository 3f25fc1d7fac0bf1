#![cfg(feature = "reqwest")]

mod common;

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use authgate::api::CheckoutRequest;
use common::*;

#[tokio::test]
async fn pricing_and_status_are_read() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let pricing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(api_path("/subscription/pricing"))
				.header("authorization", "Bearer A");
			then.status(200).json_body(json!({
				"currency": "XOF",
				"symbol": "FCFA",
				"plans": { "starter": 3000.0, "pro": 6500.0, "lifetime": 60000.0 },
				"country_code": "SN"
			}));
		})
		.await;
	let status = server
		.mock_async(|when, then| {
			when.method(GET).path(api_path("/subscription/status"));
			then.status(200).json_body(json!({
				"plan": "pro",
				"expires_at": "2026-11-16T00:00:00Z",
				"is_active": true
			}));
		})
		.await;
	let prices = harness.gateway.pricing().await?;

	assert_eq!(prices.currency, "XOF");
	assert_eq!(prices.plans.pro, 6500.0);

	let current = harness.gateway.subscription_status().await?;

	assert_eq!(current.plan, "pro");
	assert_eq!(current.expires_at.as_deref(), Some("2026-11-16T00:00:00Z"));

	pricing.assert_calls_async(1).await;
	status.assert_calls_async(1).await;

	Ok(())
}

#[tokio::test]
async fn checkout_portal_and_cancel_are_posted() -> Result<()> {
	let server = MockServer::start_async().await;
	let harness = signed_in(&server);
	let checkout = server
		.mock_async(|when, then| {
			when.method(POST).path(api_path("/subscription/checkout")).json_body(json!({
				"plan_type": "lifetime",
				"payment_method": "stripe",
				"success_url": "https://app.example/success",
				"cancel_url": "https://app.example/pricing"
			}));
			then.status(200).json_body(json!({ "checkout_url": "https://pay.example/cs_1" }));
		})
		.await;
	let portal = server
		.mock_async(|when, then| {
			when.method(POST).path(api_path("/subscription/portal"));
			then.status(200).json_body(json!({ "checkout_url": "https://pay.example/portal" }));
		})
		.await;
	let cancel = server
		.mock_async(|when, then| {
			when.method(POST).path(api_path("/subscription/cancel"));
			then.status(200).json_body(json!({
				"status": "canceled",
				"message": "Subscription ends at period end."
			}));
		})
		.await;
	let session = harness
		.gateway
		.create_checkout(&CheckoutRequest::new(
			"lifetime",
			"https://app.example/success",
			"https://app.example/pricing",
		))
		.await?;

	assert_eq!(session.checkout_url, "https://pay.example/cs_1");
	assert_eq!(
		harness.gateway.create_portal_session().await?.checkout_url,
		"https://pay.example/portal"
	);
	assert_eq!(harness.gateway.cancel_subscription().await?.status, "canceled");

	checkout.assert_calls_async(1).await;
	portal.assert_calls_async(1).await;
	cancel.assert_calls_async(1).await;

	Ok(())
}
