// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carousel rendering for the recommendation feed.
//!
//! The chat platform caps card titles at 40 characters and bodies at 60,
//! counted in characters rather than bytes. Every rendered carousel ends
//! with a status card echoing the current search criteria and offering the
//! next-page action.

use meshibot_config::model::LinksConfig;
use meshibot_core::{CarouselAction, CarouselItem, Criteria, OutboundNotification, ShopRecord};

const MAX_TITLE_CHARS: usize = 40;
const MAX_BODY_CHARS: usize = 60;

/// Canned message the next-page button sends back into the conversation.
pub const NEXT_PAGE_COMMAND: &str = "次の5件";
/// Canned message the favourites button sends back into the conversation.
pub const FAVOURITES_COMMAND: &str = "お気に入り店舗一覧";

/// Truncate to `max` characters, the last one becoming an ellipsis.
pub fn trim_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut trimmed: String = text.chars().take(max.saturating_sub(1)).collect();
    trimmed.push('…');
    trimmed
}

/// English reputation label for a review score.
pub fn reputation_label(score: f64) -> &'static str {
    if score < 4.0 {
        "Good"
    } else if score < 4.5 {
        "Very good"
    } else {
        "Excellent"
    }
}

/// Card body: access text, plus the review summary when the shop has one.
fn shop_body(record: &ShopRecord) -> String {
    match (record.review_score, record.review_quantity) {
        (Some(score), Some(quantity)) => format!(
            "{}\n{score:.1} {}\n{quantity}件のレビューの総評",
            record.access,
            reputation_label(score)
        ),
        _ => record.access.clone(),
    }
}

fn shop_card(record: &ShopRecord, links: &LinksConfig) -> CarouselItem {
    let mut actions = vec![CarouselAction::Uri {
        label: "詳しくみる".into(),
        uri: record.affiliate_url.clone(),
    }];
    if let Some(share_base) = links.share_base_url.as_deref() {
        actions.push(CarouselAction::Uri {
            label: "共有する".into(),
            uri: format!("{share_base}?shop_id={}", record.id.as_str()),
        });
    }

    CarouselItem {
        thumbnail_image_url: record.image_url.clone(),
        title: trim_text(&record.name, MAX_TITLE_CHARS),
        body: trim_text(&shop_body(record), MAX_BODY_CHARS),
        actions,
    }
}

fn change_criteria_action(links: &LinksConfig) -> Option<CarouselAction> {
    links.search_form_url.as_deref().map(|url| CarouselAction::Uri {
        label: "検索条件を変更する".into(),
        uri: url.to_string(),
    })
}

/// Trailing card echoing the criteria the current feed was searched with.
fn status_card(criteria: &Criteria, links: &LinksConfig) -> CarouselItem {
    let mut actions = Vec::new();
    actions.extend(change_criteria_action(links));
    actions.push(CarouselAction::Message {
        label: "次の5件を表示".into(),
        text: NEXT_PAGE_COMMAND.into(),
    });

    CarouselItem {
        thumbnail_image_url: links.status_image_url.clone(),
        title: "こちらの条件で検索中".into(),
        body: trim_text(&criteria.display_text(), MAX_BODY_CHARS),
        actions,
    }
}

fn fallback_card(title: &str, body: String, links: &LinksConfig) -> OutboundNotification {
    let mut actions = Vec::new();
    actions.extend(change_criteria_action(links));
    actions.push(CarouselAction::Message {
        label: "お気に入り店舗一覧".into(),
        text: FAVOURITES_COMMAND.into(),
    });

    OutboundNotification::Carousel {
        alt_text: title.to_string(),
        items: vec![CarouselItem {
            thumbnail_image_url: links.status_image_url.clone(),
            title: trim_text(title, MAX_TITLE_CHARS),
            body: trim_text(&body, MAX_BODY_CHARS),
            actions,
        }],
    }
}

/// Full feed reply: one card per shop plus the trailing status card.
pub fn render_feed(
    records: &[ShopRecord],
    criteria: &Criteria,
    links: &LinksConfig,
) -> OutboundNotification {
    let mut items: Vec<CarouselItem> =
        records.iter().map(|record| shop_card(record, links)).collect();
    items.push(status_card(criteria, links));
    OutboundNotification::Carousel {
        alt_text: "お店のご紹介".into(),
        items,
    }
}

/// Reply when the search hit nothing.
pub fn render_no_hits(criteria: &Criteria, links: &LinksConfig) -> OutboundNotification {
    fallback_card(
        "こちらの条件ではお店がヒットしませんでした。",
        criteria.display_text(),
        links,
    )
}

/// Reply when the feed queue is drained.
pub fn render_no_more(criteria: &Criteria, links: &LinksConfig) -> OutboundNotification {
    fallback_card(
        "もうお店がありません。",
        format!("条件を変えて検索してみてください!\n{}", criteria.display_text()),
        links,
    )
}
