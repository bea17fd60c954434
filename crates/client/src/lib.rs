//! Localisation service client.
//!
//! Covers the two endpoints the sync flows need: reading every translation
//! of a category, and the bulk update. Blocking, no retries, and redirects
//! are reported instead of followed.

mod client;

pub use client::{AuthHeaders, ClientError, LocalisationClient};
