//! The external posting collaborator.
//!
//! [`Poster`] is the seam between the scheduler check and the platform API.
//! The real implementation signs requests with OAuth 1.0a user context and
//! posts to the X v2 `tweets` endpoint; the dry-run implementation only
//! logs.

use crate::{Error, Result};
use std::{cell::OnceCell, fmt, time::Duration};
use tracing::{debug, info};

const ENDPOINT: &str = "https://api.twitter.com/2/tweets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Receipt for a successful post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
	/// Platform identifier of the created post, when the platform reports one
	pub id: Option<String>,
}

/// Anything that can deliver a line of content to the outside world.
pub trait Poster {
	/// Deliver one item.
	///
	/// # Errors
	///
	/// Returns an error if delivery fails; the caller must not advance its
	/// cursor in that case.
	fn post(&self, text: &str) -> Result<Receipt>;
}

/// Dry-run collaborator: logs a preview and touches nothing.
#[derive(Debug, Default)]
pub struct DryRun;

impl Poster for DryRun {
	fn post(&self, text: &str) -> Result<Receipt> {
		let preview: String = text.chars().take(60).collect();
		info!("[dry-run] would post: {preview}");
		Ok(Receipt { id: None })
	}
}

/// OAuth 1.0a user-context credentials, opaque to everything but the signer.
#[derive(Clone)]
pub struct Credentials {
	pub consumer_key: String,
	pub consumer_secret: String,
	pub access_token: String,
	pub access_secret: String,
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Never print secrets
		f.debug_struct("Credentials")
			.field("consumer_key", &self.consumer_key)
			.finish_non_exhaustive()
	}
}

/// The real collaborator: a blocking client for the X v2 `tweets` endpoint.
#[derive(Debug)]
pub struct XPoster {
	credentials: Credentials,
	client: reqwest::blocking::Client,
}

impl XPoster {
	/// Build a client with the given credentials.
	///
	/// # Errors
	///
	/// Returns an error if the underlying HTTP client cannot be constructed.
	pub fn new(credentials: Credentials) -> Result<Self> {
		let client = reqwest::blocking::Client::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()?;
		Ok(Self {
			credentials,
			client,
		})
	}
}

impl Poster for XPoster {
	fn post(&self, text: &str) -> Result<Receipt> {
		let authorization = oauth1::authorization_header("POST", ENDPOINT, &self.credentials);
		let response = self
			.client
			.post(ENDPOINT)
			.header(reqwest::header::AUTHORIZATION, authorization)
			.json(&serde_json::json!({ "text": text }))
			.send()?;

		let status = response.status();
		let body = response.text()?;
		if !status.is_success() {
			return Err(Error::PostRejected {
				status: status.as_u16(),
				body,
			});
		}

		let id = serde_json::from_str::<serde_json::Value>(&body)
			.ok()
			.and_then(|value| value["data"]["id"].as_str().map(str::to_string));
		debug!(?id, "Post accepted");
		Ok(Receipt { id })
	}
}

/// Builds its inner collaborator on first use, so a run that never posts
/// never pays for construction — and never needs credentials in the
/// environment.
pub struct Deferred<P, F>
where
	P: Poster,
	F: Fn() -> Result<P>,
{
	build: F,
	inner: OnceCell<P>,
}

impl<P, F> Deferred<P, F>
where
	P: Poster,
	F: Fn() -> Result<P>,
{
	pub fn new(build: F) -> Self {
		Self {
			build,
			inner: OnceCell::new(),
		}
	}
}

impl<P, F> Poster for Deferred<P, F>
where
	P: Poster,
	F: Fn() -> Result<P>,
{
	fn post(&self, text: &str) -> Result<Receipt> {
		if self.inner.get().is_none() {
			let built = (self.build)()?;
			// set cannot fail, the cell was just checked empty
			let _ = self.inner.set(built);
		}
		// unwrap is safe, the cell was filled above
		self.inner.get().unwrap().post(text)
	}
}

/// OAuth 1.0a HMAC-SHA1 request signing, per RFC 5849.
mod oauth1 {
	use super::Credentials;
	use base64::{engine::general_purpose::STANDARD, Engine as _};
	use hmac::{Hmac, Mac};
	use rand::{distributions::Alphanumeric, Rng};
	use sha1::Sha1;

	/// Build the `Authorization: OAuth …` header value for one request with
	/// a fresh nonce and timestamp.
	pub(super) fn authorization_header(
		method: &str,
		url: &str,
		credentials: &Credentials,
	) -> String {
		let nonce: String = rand::thread_rng()
			.sample_iter(&Alphanumeric)
			.take(32)
			.map(char::from)
			.collect();
		let timestamp = jiff::Timestamp::now().as_second().to_string();
		header_with(method, url, credentials, &nonce, &timestamp)
	}

	fn header_with(
		method: &str,
		url: &str,
		credentials: &Credentials,
		nonce: &str,
		timestamp: &str,
	) -> String {
		let mut params: Vec<(String, String)> = [
			("oauth_consumer_key", credentials.consumer_key.as_str()),
			("oauth_nonce", nonce),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", timestamp),
			("oauth_token", credentials.access_token.as_str()),
			("oauth_version", "1.0"),
		]
		.iter()
		.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
		.collect();

		let signature = sign(
			method,
			url,
			&params,
			&credentials.consumer_secret,
			&credentials.access_secret,
		);
		params.push(("oauth_signature".to_string(), signature));
		params.sort();

		let fields = params
			.iter()
			.map(|(k, v)| format!("{}=\"{}\"", percent(k), percent(v)))
			.collect::<Vec<String>>()
			.join(", ");
		format!("OAuth {fields}")
	}

	/// Compute the base-64 HMAC-SHA1 signature over the signature base
	/// string.  `params` holds every parameter that participates in
	/// signing; for a JSON-body request that is the oauth_* set alone.
	pub(super) fn sign(
		method: &str,
		url: &str,
		params: &[(String, String)],
		consumer_secret: &str,
		token_secret: &str,
	) -> String {
		let mut pairs: Vec<(String, String)> = params
			.iter()
			.map(|(k, v)| (percent(k), percent(v)))
			.collect();
		pairs.sort();
		let param_string = pairs
			.iter()
			.map(|(k, v)| format!("{k}={v}"))
			.collect::<Vec<String>>()
			.join("&");
		let base = format!("{}&{}&{}", method, percent(url), percent(&param_string));
		let key = format!("{}&{}", percent(consumer_secret), percent(token_secret));

		// unwrap is safe, HMAC accepts keys of any length
		let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).unwrap();
		mac.update(base.as_bytes());
		STANDARD.encode(mac.finalize().into_bytes())
	}

	/// RFC 3986 percent encoding; everything but unreserved characters is
	/// escaped, as OAuth requires.
	fn percent(raw: &str) -> String {
		urlencoding::encode(raw).into_owned()
	}

}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	#[test]
	fn test_dry_run_reports_no_id() {
		let receipt = DryRun.post("hello").unwrap();
		assert_eq!(receipt.id, None);
	}

	#[test]
	fn test_deferred_does_not_build_until_a_post_happens() {
		let builds = Cell::new(0);
		let deferred = Deferred::new(|| -> Result<DryRun> {
			builds.set(builds.get() + 1);
			Ok(DryRun)
		});
		assert_eq!(builds.get(), 0);

		deferred.post("one").unwrap();
		deferred.post("two").unwrap();
		// Built once, then reused
		assert_eq!(builds.get(), 1);
	}

	#[test]
	fn test_deferred_surfaces_the_build_error_at_post_time() {
		let deferred = Deferred::new(|| -> Result<DryRun> {
			Err(Error::MissingEnv("TW_CONSUMER_KEY"))
		});
		let err = deferred.post("hello").unwrap_err();
		assert_eq!(
			err.to_string(),
			"Missing environment variable TW_CONSUMER_KEY"
		);
	}

	#[test]
	fn test_credentials_debug_redacts_secrets() {
		let credentials = Credentials {
			consumer_key: "public".to_string(),
			consumer_secret: "secret-one".to_string(),
			access_token: "secret-two".to_string(),
			access_secret: "secret-three".to_string(),
		};
		let output = format!("{credentials:?}");
		assert!(output.contains("public"));
		assert!(!output.contains("secret-one"));
		assert!(!output.contains("secret-two"));
		assert!(!output.contains("secret-three"));
	}
}
