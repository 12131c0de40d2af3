// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Meshibot restaurant-search bot.
//!
//! This crate provides the error type, domain types (criteria, shop
//! records, carousel payloads), and the notification-sink trait shared
//! across the Meshibot workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MeshibotError;
pub use traits::NotificationSink;
pub use types::{
    CarouselAction, CarouselItem, Criteria, CriteriaPatch, FieldUpdate, OutboundNotification,
    ShopId, ShopRecord, UserId,
};
