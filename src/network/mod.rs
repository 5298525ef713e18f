pub mod endpoint;
pub mod transport;

pub use endpoint::{ApiRequest, Endpoint};
pub use transport::{RawResponse, ReqwestTransport, Transport};
