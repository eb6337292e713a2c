//! JSON-RPC clients of the bundler (`eth` namespace) and paymaster (`cc` namespace) services
//!
//! [HttpBundlerClient] and [HttpPaymasterClient] implement the collaborator traits of
//! `playground-account` over HTTP. The paymaster client attaches a bearer token and the
//! application id to every request.

mod bundler;
mod bundler_api;
mod error;
mod paymaster;
mod paymaster_api;

pub use bundler::HttpBundlerClient;
pub use bundler_api::{BundlerApiClient, BundlerApiServer};
pub use paymaster::{HttpPaymasterClient, StaticToken, TokenSource};
pub use paymaster_api::{PaymasterApiClient, PaymasterApiServer};
