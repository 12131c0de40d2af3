// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search and affiliate URL construction.

use meshibot_core::{Criteria, MeshibotError, ShopId};
use meshibot_query::budget_bounds;

/// Affiliate redirect prefix; the shop id slots between prefix and suffix.
const AFFILIATE_URL_PREFIX: &str = "https://ck.jp.ap.valuecommerce.com/servlet/referral?sid=3690883&pid=889260573&vc_url=https%3A%2F%2Fwww.hotpepper.jp%2Fstr";
const AFFILIATE_URL_SUFFIX: &str = "%2F%3Fvos%3Dnhppvccp99002";

/// Build the search URL for the given criteria.
///
/// The directory's form endpoint takes its parameters as raw UTF-8 query
/// fragments; unset criteria fields are omitted entirely. A literal price
/// is widened to CBF/CBT bracket bounds, and place and freeword share the
/// FWT keyword parameter joined with `+`.
pub fn search_url(
    site_base: &str,
    region: &str,
    budget_grade_range: u32,
    criteria: &Criteria,
) -> Result<String, MeshibotError> {
    let mut url = format!("{site_base}/CSP/psh010/doBasic?SA={region}");

    if let Some(date) = criteria.date.as_deref() {
        url.push_str("&RDT=");
        url.push_str(date);
    }

    if let Some(price) = criteria.price.as_deref() {
        let (lower, upper) = budget_bounds(price, budget_grade_range as usize)?;
        url.push_str(&format!("&CBF={lower}&CBT={upper}"));
    }

    let keyword = match (criteria.place.as_deref(), criteria.freeword.as_deref()) {
        (Some(place), Some(freeword)) => Some(format!("{place}+{freeword}")),
        (Some(place), None) => Some(place.to_string()),
        (None, Some(freeword)) => Some(freeword.to_string()),
        (None, None) => None,
    };
    if let Some(keyword) = keyword {
        url.push_str("&FWT=");
        url.push_str(&keyword);
    }

    Ok(url)
}

/// Tracking-wrapped link to the shop's directory page.
pub fn affiliate_url(shop_id: &ShopId) -> String {
    format!(
        "{AFFILIATE_URL_PREFIX}{}{AFFILIATE_URL_SUFFIX}",
        shop_id.as_str()
    )
}

/// Direct (unwrapped) URL of the shop's directory page, used for the
/// review scrape.
pub fn shop_page_url(site_base: &str, shop_id: &ShopId) -> String {
    format!("{site_base}/str{}/", shop_id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://www.hotpepper.jp";

    #[test]
    fn full_criteria_produces_all_fragments() {
        let criteria = Criteria {
            date: Some("20230831".into()),
            place: Some("新橋".into()),
            price: Some("2500".into()),
            freeword: Some("海鮮 個室".into()),
        };
        let url = search_url(SITE, "SA11", 2, &criteria).unwrap();
        assert_eq!(
            url,
            "https://www.hotpepper.jp/CSP/psh010/doBasic?SA=SA11\
             &RDT=20230831&CBF=1001&CBT=3000&FWT=新橋+海鮮 個室"
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let criteria = Criteria {
            place: Some("銀座".into()),
            ..Criteria::default()
        };
        let url = search_url(SITE, "SA11", 2, &criteria).unwrap();
        assert_eq!(
            url,
            "https://www.hotpepper.jp/CSP/psh010/doBasic?SA=SA11&FWT=銀座"
        );
    }

    #[test]
    fn freeword_alone_fills_the_keyword_slot() {
        let criteria = Criteria {
            freeword: Some("餃子".into()),
            ..Criteria::default()
        };
        let url = search_url(SITE, "SA11", 2, &criteria).unwrap();
        assert!(url.ends_with("&FWT=餃子"));
    }

    #[test]
    fn invalid_price_propagates_validation_error() {
        let criteria = Criteria {
            price: Some("安め".into()),
            ..Criteria::default()
        };
        assert!(matches!(
            search_url(SITE, "SA11", 2, &criteria),
            Err(MeshibotError::Validation(_))
        ));
    }

    #[test]
    fn affiliate_url_wraps_shop_id() {
        let url = affiliate_url(&ShopId("J001168707".into()));
        assert!(url.contains("vc_url=https%3A%2F%2Fwww.hotpepper.jp%2FstrJ001168707%2F"));
    }

    #[test]
    fn shop_page_url_is_direct() {
        assert_eq!(
            shop_page_url(SITE, &ShopId("J001168707".into())),
            "https://www.hotpepper.jp/strJ001168707/"
        );
    }
}
