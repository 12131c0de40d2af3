// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shop detail: JSON API response types and the review-block parser.
//!
//! The detail API returns name, photo, and access text but no rating, so
//! the rating comes from scraping the shop's public page. Shops without
//! reviews have no rating block at all.

use meshibot_core::MeshibotError;
use scraper::{Html, Selector};
use serde::Deserialize;

/// Top-level detail API envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub results: ApiResults,
}

#[derive(Debug, Deserialize)]
pub struct ApiResults {
    /// Empty for ids the API refuses to resolve.
    #[serde(default)]
    pub shop: Vec<ApiShop>,
}

#[derive(Debug, Deserialize)]
pub struct ApiShop {
    pub id: String,
    pub name: String,
    pub mobile_access: String,
    pub photo: ApiPhoto,
}

#[derive(Debug, Deserialize)]
pub struct ApiPhoto {
    pub pc: ApiPhotoPc,
}

#[derive(Debug, Deserialize)]
pub struct ApiPhotoPc {
    /// Large photo variant, used as the carousel thumbnail.
    pub l: String,
}

/// Review score and count scraped from the shop page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Review {
    pub score: f64,
    pub quantity: i64,
}

fn selector(css: &str) -> Result<Selector, MeshibotError> {
    Selector::parse(css)
        .map_err(|e| MeshibotError::directory(format!("invalid selector {css:?}: {e}")))
}

/// Parse the rating block from a shop page.
///
/// `Ok(None)` when the page has no `ratingWrap` block (no reviews yet). A
/// present but garbled block is a format error. The review-count span's
/// class name carries the site's own typo ("Reivew").
pub fn parse_review(html: &str) -> Result<Option<Review>, MeshibotError> {
    let document = Html::parse_document(html);
    let wrap = selector("div.ratingWrap")?;
    let score_value = selector("span.ratingScoreValue")?;
    let review_count = selector("span.ratingReivew")?;

    let Some(block) = document.select(&wrap).next() else {
        return Ok(None);
    };

    let score_text: String = block
        .select(&score_value)
        .next()
        .map(|e| e.text().collect())
        .ok_or_else(|| MeshibotError::directory("rating block missing score value"))?;
    let score: f64 = score_text.trim().parse().map_err(|_| {
        MeshibotError::directory(format!("unparseable review score: {score_text:?}"))
    })?;

    // "241件のレビューの総評" -- the count is the leading digit run.
    let count_text: String = block
        .select(&review_count)
        .next()
        .map(|e| e.text().collect())
        .ok_or_else(|| MeshibotError::directory("rating block missing review count"))?;
    let digits: String = count_text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let quantity: i64 = digits.parse().map_err(|_| {
        MeshibotError::directory(format!("unparseable review count: {count_text:?}"))
    })?;

    Ok(Some(Review { score, quantity }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATED_PAGE: &str = r#"
        <html><body>
          <div class="ratingWrap">
            <span class="ratingScoreValue">3.6</span>
            <span class="ratingScoreText">Very good</span>
            <span class="ratingReivew">241件のレビューの総評</span>
          </div>
        </body></html>"#;

    const UNRATED_PAGE: &str = r#"
        <html><body><h1>店舗ページ</h1></body></html>"#;

    #[test]
    fn parses_score_and_count() {
        let review = parse_review(RATED_PAGE).unwrap().unwrap();
        assert_eq!(review.score, 3.6);
        assert_eq!(review.quantity, 241);
    }

    #[test]
    fn missing_block_means_no_reviews() {
        assert_eq!(parse_review(UNRATED_PAGE).unwrap(), None);
    }

    #[test]
    fn garbled_block_is_a_format_error() {
        let html = r#"<div class="ratingWrap"><span class="ratingScoreValue">--</span>
            <span class="ratingReivew">新着</span></div>"#;
        assert!(matches!(
            parse_review(html),
            Err(MeshibotError::Directory { .. })
        ));
    }

    #[test]
    fn api_envelope_deserializes() {
        let json = r#"{
            "results": {
                "api_version": "1.30",
                "results_available": 1,
                "shop": [{
                    "id": "J001168707",
                    "name": "炉端焼き 新橋店",
                    "mobile_access": "新橋駅徒歩3分",
                    "photo": {"pc": {"l": "https://img.example.com/l.jpg"}}
                }]
            }
        }"#;
        let envelope: ApiEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.results.shop[0].id, "J001168707");
        assert_eq!(envelope.results.shop[0].photo.pc.l, "https://img.example.com/l.jpg");
    }

    #[test]
    fn empty_shop_list_deserializes() {
        let json = r#"{"results": {"results_available": 0, "shop": []}}"#;
        let envelope: ApiEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.results.shop.is_empty());
    }
}
