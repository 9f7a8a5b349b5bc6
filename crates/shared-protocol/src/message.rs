//! General-purpose message payload

use serde::{Deserialize, Serialize};

use crate::{Payload, schema};

/// Named text field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Closed set of message shapes that can be sealed without declaring a
/// dedicated payload type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Plain text
    Text { body: String },
    /// Opaque binary blob
    Binary { data: Vec<u8> },
    /// Ordered list of name/value pairs
    Fields { fields: Vec<Field> },
}

impl Message {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Self::Binary { data: data.into() }
    }

    pub fn fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Fields {
            fields: fields.into_iter().collect(),
        }
    }
}

impl Payload for Message {
    const SCHEMA_ID: u16 = schema::MESSAGE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_MAX_PAYLOAD_SIZE, decode_payload, encode_payload};

    #[test]
    fn test_message_variants_survive_codec() {
        let messages = [
            Message::text("hello"),
            Message::binary(vec![0u8, 1, 2, 255]),
            Message::fields([Field::new("user", "alice"), Field::new("role", "admin")]),
        ];

        for message in messages {
            let encoded = encode_payload(&message, DEFAULT_MAX_PAYLOAD_SIZE).unwrap();
            let decoded: Message = decode_payload(&encoded, DEFAULT_MAX_PAYLOAD_SIZE).unwrap();
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_binary_frame_layout() {
        let encoded =
            encode_payload(&Message::binary(vec![1u8, 2, 3, 255]), DEFAULT_MAX_PAYLOAD_SIZE)
                .unwrap();

        let mut expected = schema::MESSAGE.to_le_bytes().to_vec();
        expected.extend_from_slice(&1u32.to_le_bytes()); // variant index
        expected.extend_from_slice(&4u64.to_le_bytes()); // length
        expected.extend_from_slice(&[1, 2, 3, 255]);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let mut frame = schema::MESSAGE.to_le_bytes().to_vec();
        // Variant index past the last declared shape
        frame.extend_from_slice(&7u32.to_le_bytes());
        assert!(decode_payload::<Message>(&frame, DEFAULT_MAX_PAYLOAD_SIZE).is_err());
    }
}
