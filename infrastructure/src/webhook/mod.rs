//! Webhook notifier adapters

pub mod http;

pub use http::HttpWebhookNotifier;
