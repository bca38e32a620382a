//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! SIGTERM / ctrl-c → Shutdown.trigger()
//!     → scheduler task cancels its in-flight cycle and exits
//!     → HTTP server drains and exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
