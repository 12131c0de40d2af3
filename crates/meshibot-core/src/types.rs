// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Meshibot workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque chat-platform identity (group or individual id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier for a venue in the external directory ("J001168707").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopId(pub String);

impl ShopId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four-field search state for a user. At most one row per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub date: Option<String>,
    pub place: Option<String>,
    pub price: Option<String>,
    pub freeword: Option<String>,
}

impl Criteria {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.place.is_none()
            && self.price.is_none()
            && self.freeword.is_none()
    }

    /// Mark-prefixed rendering used in carousel cards echoing the current
    /// search state back to the user.
    pub fn display_text(&self) -> String {
        format!(
            "/{}\n+{}\n\u{a5}{}\n={}",
            self.date.as_deref().unwrap_or(""),
            self.place.as_deref().unwrap_or(""),
            self.price.as_deref().unwrap_or(""),
            self.freeword.as_deref().unwrap_or(""),
        )
    }
}

/// One slot of tokenizer output: how a single criteria field changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Mark absent from the message -- keep the previous value.
    #[default]
    Keep,
    /// Mark present with an empty segment -- explicitly unset the field.
    Clear,
    /// Mark present with content -- replace the field.
    Set(String),
}

/// Tokenizer output: one update per criteria field, in fixed field order
/// (date, place, price, freeword) regardless of mark order in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaPatch {
    pub date: FieldUpdate,
    pub place: FieldUpdate,
    pub price: FieldUpdate,
    pub freeword: FieldUpdate,
}

impl CriteriaPatch {
    /// True when every slot is `Keep` (the message carried no mark content).
    pub fn is_noop(&self) -> bool {
        self.date == FieldUpdate::Keep
            && self.place == FieldUpdate::Keep
            && self.price == FieldUpdate::Keep
            && self.freeword == FieldUpdate::Keep
    }
}

/// Durable shop-detail cache entry, keyed by external shop id.
///
/// Directory entries are treated as effectively permanent; records are
/// upserted on first resolution and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRecord {
    pub id: ShopId,
    pub name: String,
    pub image_url: String,
    pub access: String,
    pub affiliate_url: String,
    /// Directory rating, 1.0-5.0. `None` when the shop has no reviews.
    pub review_score: Option<f64>,
    pub review_quantity: Option<i64>,
}

/// One action button on a carousel card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CarouselAction {
    /// Opens a URL.
    Uri { label: String, uri: String },
    /// Sends a canned message back into the conversation.
    Message { label: String, text: String },
}

/// One card in a carousel reply. Title is capped at 40 characters and
/// body at 60 by the renderer; the sink treats both as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub thumbnail_image_url: String,
    pub title: String,
    pub body: String,
    pub actions: Vec<CarouselAction>,
}

/// A rendered reply handed to the notification sink together with the
/// reply address from the inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutboundNotification {
    /// Plain text reply (validation feedback, onboarding, apologies).
    Text { text: String },
    /// Carousel reply with a fallback alt text for clients that cannot
    /// render cards.
    Carousel {
        alt_text: String,
        items: Vec<CarouselItem>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_display_text_echoes_marks() {
        let criteria = Criteria {
            date: Some("20230831".into()),
            place: None,
            price: Some("2500".into()),
            freeword: Some("海鮮 個室".into()),
        };
        assert_eq!(
            criteria.display_text(),
            "/20230831\n+\n\u{a5}2500\n=海鮮 個室"
        );
    }

    #[test]
    fn empty_criteria_is_empty() {
        assert!(Criteria::default().is_empty());
        let c = Criteria {
            place: Some("新橋".into()),
            ..Criteria::default()
        };
        assert!(!c.is_empty());
    }

    #[test]
    fn default_patch_is_noop() {
        assert!(CriteriaPatch::default().is_noop());
        let patch = CriteriaPatch {
            price: FieldUpdate::Clear,
            ..CriteriaPatch::default()
        };
        assert!(!patch.is_noop());
    }

    #[test]
    fn carousel_action_serializes_with_type_tag() {
        let action = CarouselAction::Uri {
            label: "詳しくみる".into(),
            uri: "https://example.com".into(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains(r#""type":"uri""#));
    }

    #[test]
    fn notification_serializes_with_kind_tag() {
        let text = OutboundNotification::Text {
            text: "こんにちは".into(),
        };
        let json = serde_json::to_string(&text).unwrap();
        assert!(json.contains(r#""kind":"text""#));

        let carousel = OutboundNotification::Carousel {
            alt_text: "店舗のご紹介".into(),
            items: vec![],
        };
        let json = serde_json::to_string(&carousel).unwrap();
        assert!(json.contains(r#""kind":"carousel""#));
    }
}
