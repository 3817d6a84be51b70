use axum::http::Request;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower_governor::{key_extractor::KeyExtractor, GovernorError};

/// Header a push gateway may use to identify itself.
pub const SOURCE_ID_HEADER: &str = "x-source-id";

/// Rate-limit key for pushed batches.
///
/// Every push evicts a sample from the chart window, so one flooding source
/// could wipe the history. Buckets are per client IP (X-Forwarded-For,
/// X-Real-IP, peer address), otherwise a shared localhost bucket. The
/// forwarding headers assume a trusted reverse proxy in front.
///
/// `X-Source-Id` is client controlled, so it only selects the bucket when
/// `trust_source_header` is set, for deployments where a gateway that sets
/// it is the only caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushSourceKeyExtractor {
    pub trust_source_header: bool,
}

fn client_ip<T>(req: &Request<T>) -> IpAddr {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        req.headers()
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    };

    let peer = || {
        req.extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip())
    };

    forwarded
        .or_else(real_ip)
        .or_else(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn source_id<T>(req: &Request<T>) -> Option<&str> {
    req.headers()
        .get(SOURCE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl KeyExtractor for PushSourceKeyExtractor {
    type Key = String;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_source_header
            && let Some(source) = source_id(req)
        {
            return Ok(format!("source:{source}"));
        }

        Ok(format!("ip:{}", client_ip(req)))
    }
}
