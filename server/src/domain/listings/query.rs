//! Upstream query description and URL rendering

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Newest listings first
pub const ORDER_BY_MODIFIED_DESC: &str = "ModificationTimestamp desc";

/// Sub-resource carrying listing photos
pub const EXPAND_MEDIA: &str = "Media";

/// One request against the OData property resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Rendered `$filter`, unencoded
    pub filter: Option<String>,
    pub order_by: String,
    pub top: u32,
    pub expand: String,
}

impl ListingQuery {
    pub fn new(filter: Option<String>, top: u32) -> Self {
        Self {
            filter,
            order_by: ORDER_BY_MODIFIED_DESC.to_string(),
            top,
            expand: EXPAND_MEDIA.to_string(),
        }
    }

    /// Query string with every value percent-encoded once
    pub fn to_query_string(&self) -> String {
        let mut out = format!(
            "$orderby={}&$top={}&$expand={}",
            encode(&self.order_by),
            self.top,
            encode(&self.expand)
        );
        if let Some(filter) = &self.filter {
            out.push_str("&$filter=");
            out.push_str(&encode(filter));
        }
        out
    }

    /// Full request URL against `base_url`
    pub fn to_url(&self, base_url: &str) -> String {
        let sep = if base_url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", base_url, sep, self.to_query_string())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
