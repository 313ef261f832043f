//! Share-URL encoding
//!
//! The QR code carries a link of the form
//!
//! ```text
//! <base>?params=<percent-encoded base64 of the JSON share record>
//! ```
//!
//! The JSON record always has the same six keys in the same order, with
//! unset fields as empty strings, so equal selections give byte-identical
//! URLs.

use crate::error::{DecodeError, EncodingError};
use crate::selection::Selection;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ccc_catalog::CascadeLevel;
use serde::{Deserialize, Serialize};
use url::Url;

/// Query parameter carrying the token
pub const PARAMS_KEY: &str = "params";

/// Flat record embedded in the share URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareParams {
    /// Operation id
    pub operation: String,
    /// Lead observer id
    pub lead_observer: String,
    /// Control id
    pub risk_selected: String,
    /// Control framework id
    pub control_framework_selected: String,
    /// Operating context id
    pub operating_contexts: String,
    /// Equipment id
    pub equipment_selected: String,
}

impl ShareParams {
    /// Flatten a selection, mapping unset fields to `""`
    #[must_use]
    pub fn from_selection(selection: &Selection) -> Self {
        let level = |l: CascadeLevel| selection.get(l).unwrap_or_default().to_string();
        Self {
            operation: level(CascadeLevel::Operation),
            lead_observer: selection.lead_observer().unwrap_or_default().to_string(),
            risk_selected: level(CascadeLevel::Control),
            control_framework_selected: level(CascadeLevel::ControlFramework),
            operating_contexts: level(CascadeLevel::OperatingContext),
            equipment_selected: level(CascadeLevel::Equipment),
        }
    }

    /// Base64 token of the JSON record, before percent-encoding
    ///
    /// # Errors
    /// [`EncodingError::Serialize`] if the record cannot be serialized.
    pub fn to_token(&self) -> Result<String, EncodingError> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Parse a base64 token back into the record
    ///
    /// # Errors
    /// [`DecodeError`] for bad base64, non-UTF-8 bytes or a non-record JSON.
    pub fn from_token(token: &str) -> Result<Self, DecodeError> {
        let bytes = STANDARD.decode(token.trim())?;
        let json = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Builds share URLs on a fixed base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEncoder {
    base_url: String,
}

impl ShareEncoder {
    /// Create encoder for `base_url`
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Base the URLs are built on
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Share URL for the current selection
    ///
    /// # Errors
    /// Surfaces [`EncodingError`] rather than emitting a partial URL.
    pub fn encode(&self, selection: &Selection) -> Result<String, EncodingError> {
        self.encode_params(&ShareParams::from_selection(selection))
    }

    /// Share URL for an explicit record
    ///
    /// # Errors
    /// Surfaces [`EncodingError`] rather than emitting a partial URL.
    pub fn encode_params(&self, params: &ShareParams) -> Result<String, EncodingError> {
        let token = params.to_token()?;
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{separator}{PARAMS_KEY}={}",
            self.base_url,
            urlencoding::encode(&token)
        );
        tracing::debug!(%url, "share url generated");
        Ok(url)
    }
}

/// Recover the share record from a full share URL
///
/// # Errors
/// [`DecodeError::InvalidUrl`] for unparsable input,
/// [`DecodeError::MissingParams`] when there is no `params` query parameter,
/// or any token decoding failure.
pub fn decode_url(share_url: &str) -> Result<ShareParams, DecodeError> {
    let url = Url::parse(share_url.trim())?;
    let token = url
        .query_pairs()
        .find(|(key, _)| key == PARAMS_KEY)
        .map(|(_, value)| value.into_owned())
        .ok_or(DecodeError::MissingParams)?;
    ShareParams::from_token(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{reduce, Action};
    use ccc_catalog::builtin;
    use pretty_assertions::assert_eq;

    const BASE: &str = "http://example.test/";

    fn nmkm_vehicle() -> ShareParams {
        ShareParams {
            operation: "NMKM".into(),
            risk_selected: "30000000".into(),
            ..ShareParams::default()
        }
    }

    #[test]
    fn json_key_order_is_fixed() {
        let json = serde_json::to_string(&nmkm_vehicle()).unwrap();
        assert_eq!(
            json,
            r#"{"operation":"NMKM","leadObserver":"","riskSelected":"30000000","controlFrameworkSelected":"","operatingContexts":"","equipmentSelected":""}"#
        );
    }

    #[test]
    fn empty_selection_keeps_every_key() {
        let params = ShareParams::from_selection(&Selection::new());
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 6);
        assert!(value.as_object().unwrap().values().all(|v| v == ""));
    }

    #[test]
    fn url_is_percent_encoded_base64() {
        let url = ShareEncoder::new(BASE).encode_params(&nmkm_vehicle()).unwrap();
        let token = nmkm_vehicle().to_token().unwrap();
        let prefix = "http://example.test/?params=";
        assert!(url.starts_with(prefix));
        let tail = &url[prefix.len()..];
        assert!(!tail.contains(['+', '/', '=']));
        assert_eq!(urlencoding::decode(tail).unwrap(), token);
    }

    #[test]
    fn encode_then_decode_recovers_record() {
        let url = ShareEncoder::new(BASE).encode_params(&nmkm_vehicle()).unwrap();
        assert_eq!(decode_url(&url).unwrap(), nmkm_vehicle());
    }

    #[test]
    fn encoding_is_deterministic() {
        let c = builtin();
        let s = reduce(Selection::new(), &Action::level(CascadeLevel::Operation, "NMKM"), c);
        let encoder = ShareEncoder::new(BASE);
        assert_eq!(encoder.encode(&s).unwrap(), encoder.encode(&s.clone()).unwrap());
    }

    #[test]
    fn base_with_query_appends() {
        let url = ShareEncoder::new("http://example.test/?v=2")
            .encode_params(&ShareParams::default())
            .unwrap();
        assert!(url.starts_with("http://example.test/?v=2&params="));
        assert_eq!(decode_url(&url).unwrap(), ShareParams::default());
    }

    #[test]
    fn decode_failures() {
        assert!(matches!(decode_url("not a url"), Err(DecodeError::InvalidUrl(_))));
        assert!(matches!(
            decode_url("http://example.test/?other=1"),
            Err(DecodeError::MissingParams)
        ));
        assert!(matches!(
            ShareParams::from_token("***"),
            Err(DecodeError::Base64(_))
        ));
        let not_json = STANDARD.encode("hello");
        assert!(matches!(
            ShareParams::from_token(&not_json),
            Err(DecodeError::Json(_))
        ));
    }
}
