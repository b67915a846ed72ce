use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{ASPECT_RATIO_SQUARE, FRAME_TITLE, FRAME_VERSION, MAX_FRAME_BUTTONS},
    error::{AppError, Result},
    utils::escape_markup,
};

/// Body a frame client POSTs when a button is pressed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameActionPayload {
    #[serde(default)]
    pub untrusted_data: UntrustedData,
    #[serde(default)]
    pub trusted_data: Option<TrustedData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntrustedData {
    pub fid: Option<u64>,
    pub input_text: Option<String>,
    pub state: Option<String>,
    pub transaction_id: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedData {
    pub message_bytes: String,
}

impl FrameActionPayload {
    /// GET requests and initial embeds carry no body.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid frame payload: {}", e)))
    }

    pub fn input_text(&self) -> Option<&str> {
        non_empty(self.untrusted_data.input_text.as_deref())
    }

    pub fn fid(&self) -> Option<u64> {
        self.untrusted_data.fid
    }

    pub fn connected_address(&self) -> Option<&str> {
        non_empty(self.untrusted_data.address.as_deref())
    }

    pub fn message_bytes(&self) -> Option<&str> {
        self.trusted_data
            .as_ref()
            .and_then(|trusted| non_empty(Some(trusted.message_bytes.as_str())))
    }

    /// Hash of the submitted transaction, falling back to the value carried by a Refresh button.
    pub fn transaction_hash(&self) -> Option<&str> {
        non_empty(self.untrusted_data.transaction_id.as_deref())
            .or_else(|| non_empty(self.untrusted_data.state.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameButton {
    Post { label: String, target: String },
    Link { label: String, href: String },
    Transaction {
        label: String,
        target: String,
        post_url: String,
    },
}

impl FrameButton {
    pub fn post(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Post {
            label: label.into(),
            target: target.into(),
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    pub fn transaction(
        label: impl Into<String>,
        target: impl Into<String>,
        post_url: impl Into<String>,
    ) -> Self {
        Self::Transaction {
            label: label.into(),
            target: target.into(),
            post_url: post_url.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Post { label, .. } | Self::Link { label, .. } | Self::Transaction { label, .. } => {
                label
            }
        }
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Post { .. } => "post",
            Self::Link { .. } => "link",
            Self::Transaction { .. } => "tx",
        }
    }

    fn target(&self) -> &str {
        match self {
            Self::Post { target, .. } | Self::Transaction { target, .. } => target,
            Self::Link { href, .. } => href,
        }
    }
}

/// One rendered screen: image, optional text input and up to four buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameScreen {
    pub image: String,
    pub aspect_ratio: &'static str,
    pub input_placeholder: Option<String>,
    pub buttons: Vec<FrameButton>,
    pub state: Option<String>,
}

impl FrameScreen {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            aspect_ratio: ASPECT_RATIO_SQUARE,
            input_placeholder: None,
            buttons: Vec::new(),
            state: None,
        }
    }

    pub fn aspect_ratio(mut self, ratio: &'static str) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn text_input(mut self, placeholder: impl Into<String>) -> Self {
        self.input_placeholder = Some(placeholder.into());
        self
    }

    pub fn button(mut self, button: FrameButton) -> Self {
        if self.buttons.len() >= MAX_FRAME_BUTTONS {
            tracing::warn!("Dropping frame button '{}': limit reached", button.label());
            return self;
        }
        self.buttons.push(button);
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn render_html(&self) -> String {
        let mut tags: Vec<(String, String)> = vec![
            ("og:title".to_string(), FRAME_TITLE.to_string()),
            ("og:image".to_string(), self.image.clone()),
            ("fc:frame".to_string(), FRAME_VERSION.to_string()),
            ("fc:frame:image".to_string(), self.image.clone()),
            (
                "fc:frame:image:aspect_ratio".to_string(),
                self.aspect_ratio.to_string(),
            ),
        ];
        if let Some(placeholder) = &self.input_placeholder {
            tags.push(("fc:frame:input:text".to_string(), placeholder.clone()));
        }
        if let Some(state) = &self.state {
            tags.push(("fc:frame:state".to_string(), state.clone()));
        }
        for (idx, button) in self.buttons.iter().enumerate() {
            let prefix = format!("fc:frame:button:{}", idx + 1);
            tags.push((prefix.clone(), button.label().to_string()));
            tags.push((format!("{}:action", prefix), button.action().to_string()));
            tags.push((format!("{}:target", prefix), button.target().to_string()));
            if let FrameButton::Transaction { post_url, .. } = button {
                tags.push((format!("{}:post_url", prefix), post_url.clone()));
            }
        }

        let meta = tags
            .iter()
            .map(|(property, content)| {
                format!(
                    r#"<meta property="{}" content="{}"/>"#,
                    escape_markup(property),
                    escape_markup(content)
                )
            })
            .collect::<Vec<_>>()
            .join("\n    ");

        format!(
            "<!DOCTYPE html>\n<html>\n  <head>\n    <meta charset=\"utf-8\"/>\n    <title>{}</title>\n    {}\n  </head>\n  <body></body>\n</html>\n",
            escape_markup(FRAME_TITLE),
            meta
        )
    }
}

impl IntoResponse for FrameScreen {
    fn into_response(self) -> Response {
        Html(self.render_html()).into_response()
    }
}

/// Wallet-facing description of a contract call for a transaction button.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCall {
    pub chain_id: String,
    pub method: String,
    pub attribution: bool,
    pub params: TransactionParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionParams {
    pub abi: serde_json::Value,
    pub to: String,
    pub data: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_default_payload() {
        let payload = FrameActionPayload::from_body(b"").unwrap();
        assert!(payload.input_text().is_none());
        assert!(payload.transaction_hash().is_none());
    }

    #[test]
    fn payload_reads_camel_case_fields() {
        let body = br#"{
            "untrustedData": {
                "fid": 3,
                "buttonIndex": 1,
                "inputText": " cid:base ",
                "address": "0xabc",
                "state": "0xfeed"
            },
            "trustedData": { "messageBytes": "0a0b" }
        }"#;
        let payload = FrameActionPayload::from_body(body).unwrap();
        assert_eq!(payload.fid(), Some(3));
        assert_eq!(payload.input_text(), Some("cid:base"));
        assert_eq!(payload.connected_address(), Some("0xabc"));
        assert_eq!(payload.message_bytes(), Some("0a0b"));
        // Nilai tombol Refresh dipakai bila transactionId kosong
        assert_eq!(payload.transaction_hash(), Some("0xfeed"));
    }

    #[test]
    fn unread_client_fields_are_ignored() {
        let body = br#"{
            "untrustedData": {
                "fid": 9,
                "url": "https://frame.test/api/frame",
                "messageHash": "0xd2b1",
                "timestamp": 1706243218,
                "network": 1,
                "buttonIndex": 2,
                "castId": { "fid": 226, "hash": "0xa48d" }
            }
        }"#;
        let payload = FrameActionPayload::from_body(body).unwrap();
        assert_eq!(payload.fid(), Some(9));
        assert!(payload.message_bytes().is_none());
    }

    #[test]
    fn transaction_id_wins_over_state() {
        let body = br#"{"untrustedData":{"transactionId":"0x01","state":"0x02"}}"#;
        let payload = FrameActionPayload::from_body(body).unwrap();
        assert_eq!(payload.transaction_hash(), Some("0x01"));
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = FrameActionPayload::from_body(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn render_html_emits_buttons_in_order() {
        let html = FrameScreen::new("https://img.test/a")
            .text_input("Search")
            .button(FrameButton::post("Go", "https://f.test/next"))
            .button(FrameButton::transaction(
                "Pay",
                "https://f.test/tx",
                "https://f.test/done",
            ))
            .button(FrameButton::link("Share", "https://x.test/?a=1&b=2"))
            .render_html();

        assert!(html.contains(r#"<meta property="fc:frame" content="vNext"/>"#));
        assert!(html.contains(r#"<meta property="fc:frame:input:text" content="Search"/>"#));
        assert!(html.contains(r#"<meta property="fc:frame:button:2:action" content="tx"/>"#));
        assert!(html.contains(
            r#"<meta property="fc:frame:button:2:post_url" content="https://f.test/done"/>"#
        ));
        assert!(html.contains(r#"content="https://x.test/?a=1&amp;b=2""#));
        let first = html.find("fc:frame:button:1\"").unwrap();
        let third = html.find("fc:frame:button:3\"").unwrap();
        assert!(first < third);
    }

    #[test]
    fn button_limit_is_enforced() {
        let mut screen = FrameScreen::new("img");
        for idx in 0..6 {
            screen = screen.button(FrameButton::post(format!("b{}", idx), "t"));
        }
        assert_eq!(screen.buttons.len(), MAX_FRAME_BUTTONS);
    }
}
