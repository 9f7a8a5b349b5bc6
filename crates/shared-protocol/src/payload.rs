//! Data-only payload schema and its restricted codec
//!
//! Payloads are framed as `[schema id: u16 LE][bincode body]`. The decoder is
//! always told which type to produce; the schema id in the frame is only
//! compared against that type's declared id, never used to pick a type.

use bincode::Options;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ProtocolError, ProtocolResult};

/// Size of the schema id prefix in an encoded payload
pub const SCHEMA_ID_SIZE: usize = 2;

/// Default upper bound on an encoded payload body (16 MiB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Schema ids of the payload types defined in this crate.
///
/// Ids below `0x0100` are reserved; application types should pick ids above it.
pub mod schema {
    /// UTF-8 text (`String`)
    pub const TEXT: u16 = 0x0001;
    /// Raw bytes (`Vec<u8>`)
    pub const BINARY: u16 = 0x0002;
    /// [`crate::Message`]
    pub const MESSAGE: u16 = 0x0010;
    /// First id available to application payloads
    pub const FIRST_APPLICATION_ID: u16 = 0x0100;
}

/// A value that can be sealed into an encrypted envelope.
///
/// The encoded form is plain data shaped by the type's serde schema. Two
/// types that share a `SCHEMA_ID` are interchangeable on the wire, so every
/// payload type must declare its own id.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shared_protocol::{Payload, schema};
///
/// #[derive(Serialize, Deserialize)]
/// struct Reading {
///     sensor: String,
///     value: i64,
/// }
///
/// impl Payload for Reading {
///     const SCHEMA_ID: u16 = schema::FIRST_APPLICATION_ID;
/// }
/// ```
pub trait Payload: Serialize + DeserializeOwned {
    /// Identifier written ahead of the encoded body
    const SCHEMA_ID: u16;
}

impl Payload for String {
    const SCHEMA_ID: u16 = schema::TEXT;
}

impl Payload for Vec<u8> {
    const SCHEMA_ID: u16 = schema::BINARY;
}

/// Fixed-width little-endian encoding that rejects trailing bytes
fn base_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encode a payload into its schema-framed form
pub fn encode_payload<T: Payload>(value: &T, max_size: usize) -> ProtocolResult<Vec<u8>> {
    let size = base_options().serialized_size(value)? as usize;
    if size > max_size {
        return Err(ProtocolError::PacketTooLarge {
            size,
            max: max_size,
        });
    }

    let mut encoded = Vec::with_capacity(SCHEMA_ID_SIZE + size);
    encoded.extend_from_slice(&T::SCHEMA_ID.to_le_bytes());
    base_options().serialize_into(&mut encoded, value)?;
    Ok(encoded)
}

/// Decode a schema-framed payload as `T`.
///
/// Fails with [`ProtocolError::SchemaMismatch`] when the frame was produced
/// for a different payload type, and with a serialization error when the body
/// does not fit `T` exactly.
pub fn decode_payload<T: Payload>(data: &[u8], max_size: usize) -> ProtocolResult<T> {
    let (id, body) = data
        .split_first_chunk::<SCHEMA_ID_SIZE>()
        .ok_or(ProtocolError::Truncated)?;

    let actual = u16::from_le_bytes(*id);
    if actual != T::SCHEMA_ID {
        return Err(ProtocolError::SchemaMismatch {
            expected: T::SCHEMA_ID,
            actual,
        });
    }

    if body.len() > max_size {
        return Err(ProtocolError::PacketTooLarge {
            size: body.len(),
            max: max_size,
        });
    }

    Ok(base_options()
        .with_limit(max_size as u64)
        .deserialize(body)?)
}
