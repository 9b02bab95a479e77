//! A pluggable runtime for invoking declarative tool handles.
//!
//! A tool handle describes an external operation as templates over the
//! caller's arguments. Executing it dispatches to the protocol handler the
//! handle names; with the default `http` feature, [`prelude::create_http_context`]
//! gives a context that runs handles over HTTP.
//!

pub use toolhandle_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use toolhandle_internal::prelude::*;
}
