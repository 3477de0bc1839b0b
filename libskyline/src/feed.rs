//! Typed feed records and the decoding boundary
//!
//! The timeline and search endpoints return loosely structured JSON. This
//! module decodes each element into a [`PostRecord`] at the client boundary,
//! so the stream engine and the presenters never see untyped data. A record
//! missing required fields fails decoding on its own; the page around it
//! survives (see [`decode_timeline`]).

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, Result};

/// One page of feed records, newest-first, as returned by a single fetch.
pub type FeedPage = Vec<PostRecord>;

/// The fields one poll cycle needs from a feed element.
///
/// `uri` is stable and comparable across cycles for the same underlying
/// post; for reshares it is the identity the dedup ledger keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub uri: String,
    /// True when the element re-surfaces another post (carries a `reason`)
    pub reshare: bool,
    pub author: String,
    pub handle: String,
    pub text: String,
}

#[derive(Deserialize)]
struct FeedElement {
    post: PostView,
    #[serde(default)]
    reason: Option<Value>,
}

#[derive(Deserialize)]
struct PostView {
    uri: String,
    author: Author,
    record: RecordBody,
}

#[derive(Deserialize)]
struct Author {
    handle: String,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct RecordBody {
    text: String,
}

impl PostRecord {
    fn from_view(view: PostView, reshare: bool) -> Self {
        Self {
            uri: view.uri,
            reshare,
            author: view.author.display_name.unwrap_or_default(),
            handle: view.author.handle,
            text: view.record.text,
        }
    }
}

/// Decode one timeline element (post nested under `post`, reshares marked
/// by the presence of `reason`).
pub fn decode_feed_element(value: &Value) -> Result<PostRecord> {
    let element: FeedElement = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::MalformedRecord(e.to_string()))?;
    let reshare = element.reason.is_some();
    Ok(PostRecord::from_view(element.post, reshare))
}

/// Decode one search result (post fields at the top level, never a reshare).
pub fn decode_search_element(value: &Value) -> Result<PostRecord> {
    let view: PostView = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::MalformedRecord(e.to_string()))?;
    Ok(PostRecord::from_view(view, false))
}

/// Decode a timeline page, skipping malformed elements.
///
/// Recovery is per record: a bad element is logged and dropped, the rest of
/// the page is kept in order.
pub fn decode_timeline(elements: &[Value]) -> FeedPage {
    decode_page(elements, decode_feed_element)
}

/// Decode a search result page, skipping malformed elements.
pub fn decode_search_results(elements: &[Value]) -> FeedPage {
    decode_page(elements, decode_search_element)
}

fn decode_page(elements: &[Value], decode: fn(&Value) -> Result<PostRecord>) -> FeedPage {
    elements
        .iter()
        .filter_map(|element| match decode(element) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("skipping malformed record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed_element(uri: &str) -> Value {
        json!({
            "post": {
                "uri": uri,
                "cid": "bafy123",
                "author": {
                    "did": "did:plc:abc",
                    "handle": "alice.test",
                    "displayName": "Alice"
                },
                "record": {
                    "$type": "app.bsky.feed.post",
                    "text": "hello world",
                    "createdAt": "2024-05-01T12:00:00Z"
                }
            }
        })
    }

    #[test]
    fn test_decode_plain_post() {
        let record = decode_feed_element(&feed_element("at://did:plc:abc/app.bsky.feed.post/1"))
            .unwrap();
        assert_eq!(record.uri, "at://did:plc:abc/app.bsky.feed.post/1");
        assert!(!record.reshare);
        assert_eq!(record.author, "Alice");
        assert_eq!(record.handle, "alice.test");
        assert_eq!(record.text, "hello world");
    }

    #[test]
    fn test_decode_reshare_marked_by_reason() {
        let mut element = feed_element("at://did:plc:abc/app.bsky.feed.post/2");
        element["reason"] = json!({
            "$type": "app.bsky.feed.defs#reasonRepost",
            "by": { "did": "did:plc:xyz", "handle": "bob.test" }
        });
        let record = decode_feed_element(&element).unwrap();
        assert!(record.reshare);
    }

    #[test]
    fn test_decode_missing_display_name_falls_back_to_empty() {
        let mut element = feed_element("at://x/app.bsky.feed.post/3");
        element["post"]["author"]
            .as_object_mut()
            .unwrap()
            .remove("displayName");
        let record = decode_feed_element(&element).unwrap();
        assert_eq!(record.author, "");
        assert_eq!(record.handle, "alice.test");
    }

    #[test]
    fn test_decode_missing_uri_is_malformed() {
        let mut element = feed_element("at://x/app.bsky.feed.post/4");
        element["post"].as_object_mut().unwrap().remove("uri");
        let err = decode_feed_element(&element).unwrap_err();
        assert!(format!("{}", err).contains("Malformed feed record"));
    }

    #[test]
    fn test_decode_missing_record_is_malformed() {
        let mut element = feed_element("at://x/app.bsky.feed.post/5");
        element["post"].as_object_mut().unwrap().remove("record");
        assert!(decode_feed_element(&element).is_err());
    }

    #[test]
    fn test_decode_timeline_skips_bad_elements() {
        let elements = vec![
            feed_element("at://x/app.bsky.feed.post/a"),
            json!({ "post": { "uri": "at://broken" } }),
            feed_element("at://x/app.bsky.feed.post/b"),
        ];
        let page = decode_timeline(&elements);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].uri, "at://x/app.bsky.feed.post/a");
        assert_eq!(page[1].uri, "at://x/app.bsky.feed.post/b");
    }

    #[test]
    fn test_decode_search_element_top_level_shape() {
        let element = json!({
            "uri": "at://did:plc:abc/app.bsky.feed.post/9",
            "author": { "handle": "carol.test", "displayName": "Carol" },
            "record": { "text": "found me" }
        });
        let record = decode_search_element(&element).unwrap();
        assert_eq!(record.uri, "at://did:plc:abc/app.bsky.feed.post/9");
        assert!(!record.reshare);
        assert_eq!(record.author, "Carol");
        assert_eq!(record.text, "found me");
    }
}
