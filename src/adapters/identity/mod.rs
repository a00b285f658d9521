//! Identity adapters.

mod proxy_header;

pub use proxy_header::ProxyHeaderIdentity;
