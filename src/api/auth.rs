//! Account calls: login, registration, verification, password recovery, profile, and logout.
//!
//! Every path here lives under the authentication-route marker, so a `401` from these calls is
//! surfaced to the caller instead of triggering a refresh.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	gateway::{ApiRequest, Gateway},
	http::HttpTransport,
};

/// Authenticated user as returned by `/auth/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// User identifier.
	pub id: String,
	/// Login e-mail.
	pub email: String,
	/// Display name.
	#[serde(default)]
	pub full_name: String,
	/// Subscription tier label.
	#[serde(default)]
	pub subscription: String,
	/// Avatar location, if set.
	#[serde(default)]
	pub avatar_url: Option<String>,
	/// Whether the e-mail address was verified.
	#[serde(default)]
	pub is_verified: bool,
	/// Betting profile (e.g. `balanced`).
	#[serde(default)]
	pub profile_type: String,
	/// Analyses consumed today.
	#[serde(default)]
	pub daily_analyses_used: Option<u32>,
	/// Daily analysis allowance.
	#[serde(default)]
	pub analyses_limit: Option<u32>,
}

/// Partial profile update sent to `PUT /auth/me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub full_name: Option<String>,
	/// New avatar location.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	/// New betting profile.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub profile_type: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
	email: &'a str,
	password: &'a str,
	full_name: &'a str,
}

#[derive(Serialize)]
struct OtpVerification<'a> {
	email: &'a str,
	otp_code: &'a str,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
	email: &'a str,
}

#[derive(Serialize)]
struct PasswordReset<'a> {
	email: &'a str,
	otp_code: &'a str,
	new_password: &'a str,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
	current_password: &'a str,
	new_password: &'a str,
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges e-mail and password for a credential pair and persists it.
	pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
		let request =
			ApiRequest::post("/auth/login").form([("username", email), ("password", password)]);
		let pair = self.send_json::<TokenPair>(request).await?;

		self.session().persist(&pair).await?;

		Ok(pair)
	}

	/// Creates an account, then logs in with the same credentials.
	pub async fn register(
		&self,
		email: &str,
		password: &str,
		full_name: &str,
	) -> Result<TokenPair> {
		let request = ApiRequest::post("/auth/register")
			.try_json(&RegisterRequest { email, password, full_name })?;

		self.send(request).await?;
		self.login(email, password).await
	}

	/// Confirms the one-time code mailed at registration and returns the verified profile.
	pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<UserProfile> {
		let request =
			ApiRequest::post("/auth/verify-otp").try_json(&OtpVerification { email, otp_code })?;

		self.send_json(request).await
	}

	/// Asks the backend to mail a fresh one-time code.
	pub async fn resend_otp(&self, email: &str) -> Result<()> {
		self.send(ApiRequest::post("/auth/resend-otp").query("email", email)).await.map(drop)
	}

	/// Starts the forgotten-password flow; the backend mails a reset code.
	pub async fn request_password_reset(&self, email: &str) -> Result<()> {
		let request = ApiRequest::post("/auth/forgot-password/request")
			.try_json(&PasswordResetRequest { email })?;

		self.send(request).await.map(drop)
	}

	/// Sets a new password using the mailed reset code.
	pub async fn reset_password(
		&self,
		email: &str,
		otp_code: &str,
		new_password: &str,
	) -> Result<()> {
		let request = ApiRequest::post("/auth/forgot-password/reset")
			.try_json(&PasswordReset { email, otp_code, new_password })?;

		self.send(request).await.map(drop)
	}

	/// Fetches the authenticated user's profile.
	pub async fn current_user(&self) -> Result<UserProfile> {
		self.send_json(ApiRequest::get("/auth/me")).await
	}

	/// Applies a partial profile update and returns the updated profile.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile> {
		let request = ApiRequest::put("/auth/me").try_json(update)?;

		self.send_json(request).await
	}

	/// Changes the account password.
	pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
		let request = ApiRequest::put("/auth/me/password")
			.try_json(&PasswordChange { current_password, new_password })?;

		self.send(request).await.map(drop)
	}

	/// Clears the session and sends the navigator to the login route.
	pub async fn logout(&self) {
		self.end_session(&"signed out").await;
	}
}
