//! Infrastructure: busy tracking, transports, the resource gateway and the
//! REST clients built on it.

pub mod activity;
pub mod api_client;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod services;
pub mod testing;
pub mod transport;

pub use activity::{ActivityGuard, ActivityTracker, BusyStream};
pub use api_client::HttpTransport;
pub use error::{ApiError, ApiResult};
pub use gateway::ResourceGateway;
pub use transport::{ApiRequest, Transport};
