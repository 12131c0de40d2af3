// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for directory search and shop detail.

use std::time::Duration;

use meshibot_core::{Criteria, MeshibotError, ShopId, ShopRecord};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::detail::ApiEnvelope;
use crate::{detail, search, urls};

/// Public site serving the listing and shop pages.
const SITE_BASE_URL: &str = "https://www.hotpepper.jp";
/// JSON detail API endpoint.
const API_BASE_URL: &str = "http://webservice.recruit.co.jp/hotpepper/gourmet/v1/";

/// Client for the external restaurant directory.
///
/// One instance is shared across the whole process; reqwest pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    api_key: String,
    region: String,
    max_result_pages: u32,
    budget_grade_range: u32,
    site_base: String,
    api_base: String,
}

impl DirectoryClient {
    pub fn new(
        api_key: String,
        region: String,
        max_result_pages: u32,
        budget_grade_range: u32,
    ) -> Result<Self, MeshibotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "accept-language",
            HeaderValue::from_static("ja,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MeshibotError::Directory {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            region,
            max_result_pages,
            budget_grade_range,
            site_base: SITE_BASE_URL.to_string(),
            api_base: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the site base URL (for testing with wiremock).
    pub fn with_site_base(mut self, url: String) -> Self {
        self.site_base = url;
        self
    }

    /// Overrides the detail API base URL (for testing with wiremock).
    pub fn with_api_base(mut self, url: String) -> Self {
        self.api_base = url;
        self
    }

    /// Search URL for the given criteria (exposed so the status card can
    /// echo where the current results came from).
    pub fn search_url(&self, criteria: &Criteria) -> Result<String, MeshibotError> {
        urls::search_url(&self.site_base, &self.region, self.budget_grade_range, criteria)
    }

    /// Run a search and collect shop ids across result pages.
    ///
    /// Zero hits return an empty vector, not an error. Multi-page results
    /// are re-fetched through the numbered paging URLs, first page included,
    /// capped at `max_result_pages`.
    pub async fn fetch_result_ids(
        &self,
        criteria: &Criteria,
    ) -> Result<Vec<ShopId>, MeshibotError> {
        let first_url = self.search_url(criteria)?;
        let first_page = self.get_text(&first_url).await?;

        let Some(pages) = search::page_count(&first_page)? else {
            debug!(url = %first_url, "search hit nothing");
            return Ok(Vec::new());
        };

        if pages == 1 {
            return search::shop_ids(&first_page);
        }

        let stem = search::paging_stem(&self.site_base, &first_page)?;
        let fetch_pages = pages.min(self.max_result_pages);
        debug!(pages, fetch_pages, %stem, "walking paged results");

        let mut ids = Vec::new();
        for page in 1..=fetch_pages {
            let page_url = format!("{stem}{page}/");
            let html = self.get_text(&page_url).await?;
            ids.extend(search::shop_ids(&html)?);
        }
        Ok(ids)
    }

    /// Fetch full detail for one shop: API lookup plus the review scrape.
    pub async fn fetch_detail(&self, shop_id: &ShopId) -> Result<ShopRecord, MeshibotError> {
        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("key", self.api_key.as_str()),
                ("id", shop_id.as_str()),
                ("format", "json"),
                ("count", "1"),
            ])
            .send()
            .await
            .map_err(|e| MeshibotError::Directory {
                message: format!("detail API request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MeshibotError::directory(format!(
                "detail API returned {status} for {shop_id}"
            )));
        }

        let body = response.text().await.map_err(|e| MeshibotError::Directory {
            message: format!("failed to read detail API body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let envelope: ApiEnvelope =
            serde_json::from_str(&body).map_err(|e| MeshibotError::Directory {
                message: format!("failed to parse detail API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        // Some ids resolve on the site but not in the API.
        let Some(api_shop) = envelope.results.shop.into_iter().next() else {
            return Err(MeshibotError::directory(format!(
                "detail API has no record for {shop_id}"
            )));
        };

        let page = self
            .get_text(&urls::shop_page_url(&self.site_base, shop_id))
            .await?;
        let review = detail::parse_review(&page)?;

        Ok(ShopRecord {
            id: ShopId(api_shop.id),
            name: api_shop.name,
            image_url: api_shop.photo.pc.l,
            access: api_shop.mobile_access,
            affiliate_url: urls::affiliate_url(shop_id),
            review_score: review.map(|r| r.score),
            review_quantity: review.map(|r| r.quantity),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, MeshibotError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MeshibotError::Directory {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MeshibotError::directory(format!(
                "{url} returned {status}"
            )));
        }

        response.text().await.map_err(|e| MeshibotError::Directory {
            message: format!("failed to read body from {url}: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
