//! Brightcove CMS video resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Custom field holding the brand a video belongs to.
const BRAND_FIELD: &str = "brand";

/// A video as returned by the CMS API.
///
/// This is a subset of the full resource, containing only the fields the report uses.
///
/// See: <https://apis.support.brightcove.com/cms/references/reference.html#tag/Videos>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// The id Brightcove uses to uniquely identify the video.
    pub id: String,
    /// The video title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account-defined metadata, an object keyed by the internal names of the custom fields.
    ///
    /// Values are normally strings, but list-type fields and unset fields can show up as
    /// other JSON values, and videos without custom fields may carry `null` or an empty
    /// list here, so the raw value is kept.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub custom_fields: Value,
}

impl Video {
    /// Value of the `brand` custom field, if the video has one.
    pub fn brand(&self) -> Option<Cow<'_, str>> {
        match self.custom_fields.get(BRAND_FIELD)? {
            Value::Null => None,
            Value::String(brand) => Some(Cow::Borrowed(brand.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Interprets the body of the video listing endpoint.
///
/// The endpoint answers with a JSON array of videos. Anything else (typically an error
/// object) is rejected with a description of what arrived instead. Elements of the array
/// that are not usable videos are logged and skipped.
pub(crate) fn parse_listing(body: Value) -> Result<Vec<Video>, String> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            return Err(format!(
                "expected a list of videos, got {}",
                json_kind(&other)
            ));
        }
    };

    let mut videos = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Video>(item) {
            Ok(video) => videos.push(video),
            Err(e) => tracing::warn!(index, error = %e, "skipping unusable video in listing"),
        }
    }
    Ok(videos)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
