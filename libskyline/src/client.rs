//! XRPC client for the Bluesky service
//!
//! One thin request/response wrapper per endpoint the tools need: session
//! creation, timeline fetch, record creation, and post search. Responses
//! cross into typed records via [`crate::feed`]; callers never see raw JSON.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Credentials;
use crate::error::{ApiError, Result};
use crate::feed::{self, FeedPage};
use crate::stream::FeedSource;

/// An authenticated session: bearer token plus the account's DID. Obtained
/// once at startup and held for the process lifetime (no refresh).
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    pub did: String,
}

pub struct XrpcClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TimelineResponse {
    feed: Vec<Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    posts: Vec<Value>,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

fn request_error(err: reqwest::Error, context: &str) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(format!("{}: {}", context, err))
    } else {
        ApiError::Network(format!("{}: {}", context, err))
    }
}

impl XrpcClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session: None,
        }
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.base_url.trim_end_matches('/'), method)
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| ApiError::Authentication("not authenticated".to_string()).into())
    }

    /// DID of the authenticated account.
    pub fn did(&self) -> Result<&str> {
        Ok(&self.session()?.did)
    }

    /// Exchange credentials for a session token.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let response = self
            .http
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&LoginRequest {
                identifier: &credentials.identifier,
                password: credentials.app_password.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| request_error(e, "login"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Authentication(format!(
                "login failed with status {}; check your handle and app password",
                status.as_u16()
            ))
            .into());
        }

        let session: Session = response
            .json()
            .await
            .map_err(|e| ApiError::Authentication(format!("malformed session response: {}", e)))?;

        debug!(did = %session.did, "session created");
        self.session = Some(session);
        Ok(())
    }

    async fn get(
        &self,
        method: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<reqwest::Response> {
        let session = self.session()?;

        let response = self
            .http
            .get(self.xrpc_url(method))
            .bearer_auth(&session.access_jwt)
            .query(query)
            .send()
            .await
            .map_err(|e| request_error(e, context))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: context.to_string(),
            }
            .into());
        }

        Ok(response)
    }

    /// Fetch the most recent timeline page, newest-first.
    ///
    /// Malformed elements are dropped at this boundary; the returned page
    /// only contains well-typed records.
    pub async fn get_timeline(&self, limit: u32) -> Result<FeedPage> {
        let response = self
            .get(
                "app.bsky.feed.getTimeline",
                &[("limit", limit.to_string())],
                "fetch timeline",
            )
            .await?;

        let body: TimelineResponse = response
            .json()
            .await
            .map_err(|e| request_error(e, "fetch timeline"))?;

        Ok(feed::decode_timeline(&body.feed))
    }

    /// Search posts by keyword.
    pub async fn search_posts(&self, query: &str, limit: u32) -> Result<FeedPage> {
        let response = self
            .get(
                "app.bsky.feed.searchPosts",
                &[("q", query.to_string()), ("limit", limit.to_string())],
                "search posts",
            )
            .await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| request_error(e, "search posts"))?;

        Ok(feed::decode_search_results(&body.posts))
    }

    /// Create a new post and return its AT URI.
    pub async fn create_post(&self, text: &str) -> Result<String> {
        let session = self.session()?;

        let payload = json!({
            "repo": session.did,
            "collection": "app.bsky.feed.post",
            "record": {
                "$type": "app.bsky.feed.post",
                "text": text,
                "createdAt": chrono::Utc::now().to_rfc3339(),
            }
        });

        let response = self
            .http
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&payload)
            .send()
            .await
            .map_err(|e| request_error(e, "create post"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: "create post".to_string(),
            }
            .into());
        }

        let body: CreateRecordResponse = response
            .json()
            .await
            .map_err(|e| request_error(e, "create post"))?;

        debug!(uri = %body.uri, "post created");
        Ok(body.uri)
    }
}

/// A logged-in client bound to a page size, pollable by the stream engine.
pub struct TimelineSource {
    client: XrpcClient,
    limit: u32,
}

impl TimelineSource {
    pub fn new(client: XrpcClient, limit: u32) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl FeedSource for TimelineSource {
    async fn fetch_page(&self) -> Result<FeedPage> {
        self.client.get_timeline(self.limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkylineError;

    #[test]
    fn test_xrpc_url() {
        let client = XrpcClient::new("https://bsky.social");
        assert_eq!(
            client.xrpc_url("app.bsky.feed.getTimeline"),
            "https://bsky.social/xrpc/app.bsky.feed.getTimeline"
        );
    }

    #[test]
    fn test_xrpc_url_trailing_slash() {
        let client = XrpcClient::new("https://pds.example.com/");
        assert_eq!(
            client.xrpc_url("com.atproto.server.createSession"),
            "https://pds.example.com/xrpc/com.atproto.server.createSession"
        );
    }

    #[test]
    fn test_unauthenticated_session_is_error() {
        let client = XrpcClient::new("https://bsky.social");
        match client.did() {
            Err(SkylineError::Api(ApiError::Authentication(msg))) => {
                assert_eq!(msg, "not authenticated");
            }
            other => panic!("expected authentication error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_timeline_requires_session() {
        let client = XrpcClient::new("https://bsky.social");
        let result = client.get_timeline(10).await;
        assert!(matches!(
            result,
            Err(SkylineError::Api(ApiError::Authentication(_)))
        ));
    }

    #[test]
    fn test_session_deserializes_wire_names() {
        let session: Session =
            serde_json::from_str(r#"{"accessJwt": "jwt-token", "did": "did:plc:abc"}"#).unwrap();
        assert_eq!(session.access_jwt, "jwt-token");
        assert_eq!(session.did, "did:plc:abc");
    }
}
