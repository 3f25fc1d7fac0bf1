//! Follow-up questions about an analysis.

// self
use crate::{
	_prelude::*,
	gateway::{ApiRequest, Gateway},
	http::HttpTransport,
};

/// One turn of the conversation attached to an analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	/// Message identifier.
	pub id: String,
	/// Author, `user` or `assistant`.
	pub role: String,
	/// Message text.
	pub content: String,
	/// Creation timestamp.
	#[serde(default)]
	pub created_at: String,
}

#[derive(Serialize)]
struct ChatMessageCreate<'a> {
	content: &'a str,
}

#[derive(Deserialize)]
struct ChatHistory {
	#[serde(default)]
	messages: Vec<ChatMessage>,
}

impl<T> Gateway<T>
where
	T: ?Sized + HttpTransport,
{
	/// Asks a question about an analysis and returns the assistant's reply.
	pub async fn send_chat_message(&self, analysis_id: &str, content: &str) -> Result<ChatMessage> {
		let request = ApiRequest::post(format!("/analyze/{analysis_id}/chat"))
			.try_json(&ChatMessageCreate { content })?;

		self.send_json(request).await
	}

	/// Fetches the conversation of an analysis, oldest first.
	pub async fn chat_history(&self, analysis_id: &str) -> Result<Vec<ChatMessage>> {
		let request = ApiRequest::get(format!("/analyze/{analysis_id}/chat/history"));

		Ok(self.send_json::<ChatHistory>(request).await?.messages)
	}
}
