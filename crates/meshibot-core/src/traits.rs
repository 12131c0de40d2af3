// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits at the workspace seams.

use async_trait::async_trait;

use crate::error::MeshibotError;
use crate::types::OutboundNotification;

/// Outbound boundary to the chat platform.
///
/// The transport (webhook signatures, SDK message formats) is an external
/// collaborator; Meshibot hands over a rendered carousel plus the reply
/// address supplied by the inbound event and nothing else.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a rendered reply to the given reply address.
    async fn send(
        &self,
        reply_to: &str,
        message: &OutboundNotification,
    ) -> Result<(), MeshibotError>;
}
