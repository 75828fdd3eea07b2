//! [`UrlCache`](hoplink_core::UrlCache) implementations shared across
//! Hoplink services: Moka for in-process caching and Redis for shared
//! caching across nodes.

pub mod moka;
pub mod redis;

pub use self::moka::MokaUrlCache;
pub use self::redis::RedisUrlCache;
