//! HTTP notification trigger handlers
//!
//! This module provides HTTP API endpoints for announcing content changes:
//! - Content mutation hook (called by the CMS on create/update/delete)
//! - Direct URL notification
//! - Batch submission

mod handlers;
mod models;

// Re-export handlers
pub use handlers::{batch_submit, content_event, notify_url};

// Re-export models
pub use models::{BatchSubmitRequest, NotifyRequest, NotifyResponse};
