//! Adapters to the outside world: the model endpoint, the OAuth token
//! endpoint and the HTTP server.

pub mod identity;
pub mod model;
pub mod server;
