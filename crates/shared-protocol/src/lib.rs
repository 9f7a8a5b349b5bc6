//! Shared Protocol Definitions
//!
//! Wire types shared by both ends of a sealed exchange: the encrypted
//! envelope and the data-only payload schema carried inside it.

mod envelope;
mod error;
mod message;
mod payload;

pub use envelope::*;
pub use error::*;
pub use message::*;
pub use payload::*;

/// Protocol version for compatibility checking
pub const PROTOCOL_VERSION: u32 = 1;
