mod http;

pub use http::{
    batch_submit, content_event, notify_url, BatchSubmitRequest, NotifyRequest, NotifyResponse,
};
