pub mod constructors;
pub mod helpers;
pub mod types;

pub use constructors::*;
pub use helpers::{DnsTimedOut, RequestTimedOut, TlsHandshakeTimedOut};
pub use types::{Error, Inner, Kind, Result};

