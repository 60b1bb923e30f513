//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Sustained requests per second per client IP.
pub const CREATE_PER_SECOND: u64 = 2;
/// Requests a client may burst before throttling starts.
pub const CREATE_BURST: u32 = 100;

/// Creates the per-IP rate limiter guarding `POST /create`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Keys come
/// from the socket peer address, so the router must be served with
/// `into_make_service_with_connect_info`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(CREATE_PER_SECOND)
            .burst_size(CREATE_BURST)
            .finish()
            .expect("rate limit period and burst are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
