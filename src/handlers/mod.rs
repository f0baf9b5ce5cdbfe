pub mod proxy;

pub use proxy::proxy_api;
