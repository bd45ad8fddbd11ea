pub mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpTransport, Transport};
