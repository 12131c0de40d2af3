// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing-page parsers for search result extraction.
//!
//! Three anchors matter on a result page: the "1/NNNページ" page counter,
//! the numbered-page link list (whose second entry carries the short paging
//! URL stem), and the per-shop heading whose link href embeds the shop id.
//! The page counter is absent exactly when the search hit nothing, so a
//! missing counter is "no results" rather than an error.

use meshibot_core::{MeshibotError, ShopId};
use scraper::{Html, Selector};
use url::Url;

fn selector(css: &str) -> Result<Selector, MeshibotError> {
    Selector::parse(css)
        .map_err(|e| MeshibotError::directory(format!("invalid selector {css:?}: {e}")))
}

/// Total result page count, or `None` when the zero-hit page was served.
pub fn page_count(html: &str) -> Result<Option<u32>, MeshibotError> {
    let document = Html::parse_document(html);
    let counter = selector("li.lh27")?;

    let Some(element) = document.select(&counter).next() else {
        return Ok(None);
    };

    // "1/37ページ"
    let text: String = element.text().collect();
    let text = text.trim();
    let count = text
        .strip_prefix("1/")
        .and_then(|rest| rest.strip_suffix("ページ"))
        .and_then(|n| n.parse::<u32>().ok())
        .ok_or_else(|| {
            MeshibotError::directory(format!("unparseable page counter: {text:?}"))
        })?;

    Ok(Some(count))
}

/// Short paging-URL stem, extracted from the page-2 link.
///
/// Only meaningful on a multi-page result; the numbered link list is absent
/// on single-page results. The page-2 href looks like
/// `/SA11/fwt%E9%A4%83%E5%AD%90/bgn2/`; dropping the trailing `2/` leaves a
/// stem that page N extends as `{stem}{N}/`.
pub fn paging_stem(site_base: &str, html: &str) -> Result<String, MeshibotError> {
    let document = Html::parse_document(html);
    let list = selector("ul.pageLinkLinearBasic")?;
    let item = selector("li")?;
    let link = selector("a")?;

    let href = document
        .select(&list)
        .next()
        .and_then(|ul| ul.select(&item).nth(2))
        .and_then(|li| li.select(&link).next())
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| MeshibotError::directory("paging link list missing page-2 entry"))?;

    let stem = href
        .strip_suffix("2/")
        .ok_or_else(|| MeshibotError::directory(format!("unexpected page-2 href: {href:?}")))?;

    let base = Url::parse(site_base).map_err(|e| {
        MeshibotError::directory(format!("invalid site base {site_base:?}: {e}"))
    })?;
    let joined = base
        .join(stem)
        .map_err(|e| MeshibotError::directory(format!("bad paging stem {stem:?}: {e}")))?;

    Ok(joined.to_string())
}

/// Shop ids listed on a result page, in page order.
///
/// Each shop heading carries a link whose href is `/strJ001168707/`; hrefs
/// not matching that shape are skipped.
pub fn shop_ids(html: &str) -> Result<Vec<ShopId>, MeshibotError> {
    let document = Html::parse_document(html);
    let heading = selector("h3.shopDetailStoreName")?;
    let link = selector("a")?;

    let mut ids = Vec::new();
    for element in document.select(&heading) {
        let Some(href) = element
            .select(&link)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if let Some(id) = href
            .strip_prefix("/str")
            .and_then(|rest| rest.strip_suffix('/'))
        {
            if !id.is_empty() {
                ids.push(ShopId(id.to_string()));
            }
        }
    }
    Ok(ids)
}
