// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message pipeline.
//!
//! One synchronous pipeline per inbound message: normalize, command
//! dispatch, tokenize, merge-persist, search, feed replace, introduce.
//! Messages from the same user are serialized through a per-user async
//! mutex so the pop-then-commit queue walk never interleaves; different
//! users run concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use meshibot_config::MeshibotConfig;
use meshibot_core::{
    Criteria, FieldUpdate, MeshibotError, NotificationSink, OutboundNotification, UserId,
};
use meshibot_directory::DirectoryClient;
use meshibot_query::{budget_bounds, has_any_mark, merge, normalize, split_criteria, QUERY_MARKS};
use meshibot_storage::queries::{criteria, feed, users};
use meshibot_storage::Database;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{cache, feed as feed_render, tutorial};

const APOLOGY_TEXT: &str =
    "申し訳ありません、エラーが発生しました。時間をおいてもう一度お試しください。";

/// Shared pipeline state.
pub struct Pipeline {
    db: Arc<Database>,
    directory: DirectoryClient,
    sink: Arc<dyn NotificationSink>,
    config: MeshibotConfig,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Pipeline {
    pub fn new(
        db: Arc<Database>,
        directory: DirectoryClient,
        sink: Arc<dyn NotificationSink>,
        config: MeshibotConfig,
    ) -> Self {
        Self {
            db,
            directory,
            sink,
            config,
            user_locks: DashMap::new(),
        }
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id.as_str().to_string())
            .or_default()
            .clone()
    }

    /// Handle an inbound text message. Unexpected failures are logged for
    /// the operator and turned into a generic apology for the user.
    pub async fn handle_message(&self, user_id: &UserId, text: &str, reply_to: &str) {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        if let Err(e) = self.run_message(user_id, text, reply_to).await {
            error!(user_id = %user_id, error = %e, "message pipeline failed");
            let apology = OutboundNotification::Text {
                text: APOLOGY_TEXT.into(),
            };
            if let Err(e) = self.sink.send(reply_to, &apology).await {
                error!(user_id = %user_id, error = %e, "failed to deliver apology");
            }
        }
    }

    /// Handle a follow or group-join lifecycle event.
    pub async fn handle_follow(&self, reply_to: &str) {
        if let Err(e) = self.sink.send(reply_to, &tutorial::onboarding_message()).await {
            error!(error = %e, "failed to deliver onboarding message");
        }
    }

    async fn run_message(
        &self,
        user_id: &UserId,
        text: &str,
        reply_to: &str,
    ) -> Result<(), MeshibotError> {
        let normalized = normalize(text);

        if normalized == feed_render::NEXT_PAGE_COMMAND {
            return self.next_page(user_id, reply_to).await;
        }

        if normalized == feed_render::FAVOURITES_COMMAND {
            // Favourites listing is not built yet; the button exists on
            // fallback cards, so swallow the command instead of treating
            // it as criteria text.
            debug!(user_id = %user_id, "favourites listing requested (unimplemented)");
            return Ok(());
        }

        // Plain chatter without any mark is none of our business.
        if !has_any_mark(&normalized, &QUERY_MARKS) {
            return Ok(());
        }

        if users::ensure(&self.db, user_id).await? {
            info!(user_id = %user_id, "registered new user");
        }

        let mut patch = split_criteria(&normalized);

        // Accept yyyy-mm-dd date input by folding it to yyyymmdd.
        if let FieldUpdate::Set(date) = &patch.date {
            patch.date = FieldUpdate::Set(date.replace('-', ""));
        }

        // Reject an out-of-table budget before it reaches the store.
        if let FieldUpdate::Set(price) = &patch.price {
            if let Err(MeshibotError::Validation(message)) =
                budget_bounds(price, self.config.directory.budget_grade_range as usize)
            {
                self.sink
                    .send(reply_to, &OutboundNotification::Text { text: message })
                    .await?;
                return Ok(());
            }
        }

        let previous = criteria::get(&self.db, user_id).await?;
        let merged = merge(&previous, &patch);
        criteria::set(&self.db, user_id, &merged).await?;
        debug!(user_id = %user_id, criteria = ?merged, "criteria updated");

        let shop_ids = self.directory.fetch_result_ids(&merged).await?;
        if shop_ids.is_empty() {
            info!(user_id = %user_id, "search hit nothing");
            let reply = feed_render::render_no_hits(&merged, &self.config.links);
            return self.sink.send(reply_to, &reply).await;
        }

        info!(user_id = %user_id, hits = shop_ids.len(), "search complete");
        feed::replace(&self.db, user_id, &shop_ids).await?;

        self.introduce(user_id, &merged, reply_to).await
    }

    async fn next_page(&self, user_id: &UserId, reply_to: &str) -> Result<(), MeshibotError> {
        // Next-page from a user we have never seen gets the empty-feed
        // fallback rather than an error.
        let current = match criteria::get(&self.db, user_id).await {
            Ok(criteria) => criteria,
            Err(MeshibotError::NotFound { .. }) => Criteria::default(),
            Err(e) => return Err(e),
        };

        if !feed::has_any(&self.db, user_id).await? {
            let reply = feed_render::render_no_more(&current, &self.config.links);
            return self.sink.send(reply_to, &reply).await;
        }

        self.introduce(user_id, &current, reply_to).await
    }

    /// Pop a batch, resolve details, deliver the carousel, then commit the
    /// consumed entries. Commit happens only after the sink accepted the
    /// reply, so a delivery failure redelivers the same batch next time.
    async fn introduce(
        &self,
        user_id: &UserId,
        current: &Criteria,
        reply_to: &str,
    ) -> Result<(), MeshibotError> {
        let batch =
            feed::pop_batch(&self.db, user_id, self.config.feed.batch_size as usize).await?;
        if batch.is_empty() {
            let reply = feed_render::render_no_more(current, &self.config.links);
            return self.sink.send(reply_to, &reply).await;
        }

        let shop_ids: Vec<_> = batch.iter().map(|entry| entry.shop_id.clone()).collect();
        let records = cache::resolve_many(&self.db, &self.directory, &shop_ids).await?;

        let reply = feed_render::render_feed(&records, current, &self.config.links);
        self.sink.send(reply_to, &reply).await?;

        let keys: Vec<i64> = batch.iter().map(|entry| entry.key).collect();
        feed::delete_keys(&self.db, &keys).await?;
        debug!(user_id = %user_id, consumed = keys.len(), "feed batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshibot_config::load_config_from_str;
    use meshibot_core::ShopId;
    use meshibot_storage::queries::shops;
    use meshibot_core::ShopRecord;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Sink that records every delivered notification.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, OutboundNotification)>>,
    }

    #[async_trait::async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(
            &self,
            reply_to: &str,
            message: &OutboundNotification,
        ) -> Result<(), MeshibotError> {
            self.sent
                .lock()
                .await
                .push((reply_to.to_string(), message.clone()));
            Ok(())
        }
    }

    struct Harness {
        pipeline: Pipeline,
        sink: Arc<RecordingSink>,
        db: Arc<Database>,
        _dir: tempfile::TempDir,
        _server: MockServer,
    }

    async fn harness(server: MockServer) -> Harness {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pipeline.db");
        let db = Arc::new(Database::open(db_path.to_str().unwrap()).await.unwrap());

        let config = load_config_from_str(
            r#"
            [directory]
            api_key = "test-key"

            [feed]
            batch_size = 2
            "#,
        )
        .unwrap();

        let directory = DirectoryClient::new("test-key".into(), "SA11".into(), 2, 2)
            .unwrap()
            .with_site_base(server.uri())
            .with_api_base(format!("{}/api/", server.uri()));

        let sink = Arc::new(RecordingSink::default());
        let pipeline = Pipeline::new(db.clone(), directory, sink.clone(), config);
        Harness {
            pipeline,
            sink,
            db,
            _dir: dir,
            _server: server,
        }
    }

    fn listing(shop_ids: &[&str]) -> String {
        let mut html = String::from(r#"<html><body><li class="lh27">1/1ページ</li>"#);
        for id in shop_ids {
            html.push_str(&format!(
                r#"<h3 class="shopDetailStoreName"><a href="/str{id}/">店</a></h3>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    async fn mount_search(server: &MockServer, shop_ids: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/CSP/psh010/doBasic"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(shop_ids)))
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, shop_id: &str, name: &str) {
        let api_body = serde_json::json!({
            "results": {"shop": [{
                "id": shop_id,
                "name": name,
                "mobile_access": "駅徒歩3分",
                "photo": {"pc": {"l": "https://img.example.com/l.jpg"}}
            }]}
        });
        Mock::given(method("GET"))
            .and(path("/api/"))
            .and(wiremock::matchers::query_param("id", shop_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(&api_body))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/str{shop_id}/")))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>店</body></html>"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn criteria_message_searches_and_introduces() {
        let server = MockServer::start().await;
        mount_search(&server, &["J001", "J002", "J003"]).await;
        mount_detail(&server, "J001", "店その一").await;
        mount_detail(&server, "J002", "店その二").await;
        mount_detail(&server, "J003", "店その三").await;

        let h = harness(server).await;
        let user = UserId("U-1".into());
        h.pipeline.handle_message(&user, "+新橋", "rt-1").await;

        let sent = h.sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let OutboundNotification::Carousel { items, .. } = &sent[0].1 else {
            panic!("expected a carousel");
        };
        // batch_size 2 shops + status card.
        assert_eq!(items.len(), 3);
        drop(sent);

        // Criteria persisted, first batch committed, one entry left.
        let stored = criteria::get(&h.db, &user).await.unwrap();
        assert_eq!(stored.place.as_deref(), Some("新橋"));
        let rest = feed::pop_batch(&h.db, &user, 10).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].shop_id.as_str(), "J003");
    }

    #[tokio::test]
    async fn next_page_drains_then_falls_back() {
        let server = MockServer::start().await;
        mount_search(&server, &["J001", "J002", "J003"]).await;
        mount_detail(&server, "J001", "一").await;
        mount_detail(&server, "J002", "二").await;
        mount_detail(&server, "J003", "三").await;

        let h = harness(server).await;
        let user = UserId("U-2".into());
        h.pipeline.handle_message(&user, "+新橋", "rt-1").await;
        h.pipeline.handle_message(&user, "次の5件", "rt-2").await;
        h.pipeline.handle_message(&user, "次の5件", "rt-3").await;

        let sent = h.sink.sent.lock().await;
        assert_eq!(sent.len(), 3);
        // Third reply is the drained-feed fallback.
        let OutboundNotification::Carousel { items, .. } = &sent[2].1 else {
            panic!("expected a carousel");
        };
        assert_eq!(items[0].title, "もうお店がありません。");
    }

    #[tokio::test]
    async fn zero_hits_sends_the_no_hit_card() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/CSP/psh010/doBasic"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>該当なし</body></html>"),
            )
            .mount(&server)
            .await;

        let h = harness(server).await;
        let user = UserId("U-3".into());
        h.pipeline.handle_message(&user, "=存在しない料理", "rt-1").await;

        let sent = h.sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let OutboundNotification::Carousel { items, .. } = &sent[0].1 else {
            panic!("expected a carousel");
        };
        assert_eq!(items[0].title, "こちらの条件ではお店がヒットしませんでした。");
    }

    #[tokio::test]
    async fn markless_chatter_is_ignored() {
        let server = MockServer::start().await;
        let h = harness(server).await;
        let user = UserId("U-4".into());
        h.pipeline.handle_message(&user, "こんにちは", "rt-1").await;

        assert!(h.sink.sent.lock().await.is_empty());
        assert!(!users::exists(&h.db, &user).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_budget_feeds_back_without_persisting() {
        let server = MockServer::start().await;
        let h = harness(server).await;
        let user = UserId("U-5".into());
        h.pipeline.handle_message(&user, "¥あいう", "rt-1").await;

        let sent = h.sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(matches!(sent[0].1, OutboundNotification::Text { .. }));
        drop(sent);

        // Criteria row exists (user registered) but price stayed unset.
        let stored = criteria::get(&h.db, &user).await.unwrap();
        assert!(stored.price.is_none());
    }

    #[tokio::test]
    async fn cached_shop_skips_detail_fetch() {
        let server = MockServer::start().await;
        mount_search(&server, &["J009"]).await;
        // No detail mocks for J009: resolution must come from the cache.

        let h = harness(server).await;
        let record = ShopRecord {
            id: ShopId("J009".into()),
            name: "既知の店".into(),
            image_url: "https://img.example.com/l.jpg".into(),
            access: "駅前".into(),
            affiliate_url: "https://ck.example.com/J009".into(),
            review_score: None,
            review_quantity: None,
        };
        shops::upsert(&h.db, &record).await.unwrap();

        let user = UserId("U-6".into());
        h.pipeline.handle_message(&user, "+銀座", "rt-1").await;

        let sent = h.sink.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let OutboundNotification::Carousel { items, .. } = &sent[0].1 else {
            panic!("expected a carousel");
        };
        assert_eq!(items[0].title, "既知の店");
    }
}
