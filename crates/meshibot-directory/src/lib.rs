// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external restaurant directory.
//!
//! Search works against the directory's public listing pages (the search
//! API does not cover free-date/free-word queries), so result-id extraction
//! is HTML scraping. Shop details come from the directory's JSON API, with
//! one extra scraping round-trip for the review block the API does not
//! expose.

pub mod client;
pub mod detail;
pub mod search;
pub mod urls;

pub use client::DirectoryClient;
