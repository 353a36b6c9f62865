//! Neutral structured form of an attribute, for interchange with calling code.
//!
//! ```json
//! {
//!   "object": "challengePassword",
//!   "single": true,
//!   "values": [ { "type": "PRINTABLESTRING", "value": "secret" } ]
//! }
//! ```
//!
//! A `value` is one of:
//! - a string, taken as its UTF-8 bytes
//! - `{"hex": "..."}`, raw bytes
//! - `{"type": "...", "content": "<hex>"}`, a typed value whose type must match
//!   the declared one

use serde::{Deserialize, Serialize};
use xattr_asn1::OctetString;

use crate::error::{Error, Result};
use crate::tag::TypeTag;
use crate::value::TypedValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescription {
    /// Short name, long name or dotted OID
    pub object: String,
    pub single: bool,
    pub values: Vec<ValueDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDescription {
    #[serde(rename = "type")]
    pub tag: TypeTag,
    pub value: ValueInput,
}

impl ValueDescription {
    pub fn new(tag: TypeTag, value: ValueInput) -> Self {
        ValueDescription { tag, value }
    }

    /// Checks the declared type against the value and builds the typed value.
    pub fn to_typed_value(&self) -> Result<TypedValue> {
        if self.tag.is_undefined() {
            return Err(Error::InvalidArgument(
                "declared type must not be UNDEF".to_string(),
            ));
        }
        match &self.value {
            ValueInput::Bytes(bytes) => TypedValue::new(self.tag, bytes.clone()),
            ValueInput::Typed(value) if value.tag() == self.tag => Ok(value.clone()),
            ValueInput::Typed(value) => Err(Error::TypeMismatch {
                declared: self.tag,
                actual: value.tag(),
            }),
        }
    }
}

/// Constructor input: `{object, type, value}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub object: String,
    #[serde(rename = "type")]
    pub tag: TypeTag,
    pub value: ValueInput,
}

impl AttributeSpec {
    pub fn new(object: impl Into<String>, tag: TypeTag, value: ValueInput) -> Self {
        AttributeSpec {
            object: object.into(),
            tag,
            value,
        }
    }
}

/// A raw byte string or an already typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ValueRepr", into = "ValueRepr")]
pub enum ValueInput {
    Bytes(Vec<u8>),
    Typed(TypedValue),
}

impl From<Vec<u8>> for ValueInput {
    fn from(bytes: Vec<u8>) -> Self {
        ValueInput::Bytes(bytes)
    }
}

impl From<&str> for ValueInput {
    fn from(s: &str) -> Self {
        ValueInput::Bytes(s.as_bytes().to_vec())
    }
}

impl From<TypedValue> for ValueInput {
    fn from(value: TypedValue) -> Self {
        ValueInput::Typed(value)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Typed(TypedValue),
    Hex { hex: OctetString },
    Text(String),
}

impl From<ValueRepr> for ValueInput {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Typed(value) => ValueInput::Typed(value),
            ValueRepr::Hex { hex } => ValueInput::Bytes(hex.into_bytes()),
            ValueRepr::Text(text) => ValueInput::Bytes(text.into_bytes()),
        }
    }
}

impl From<ValueInput> for ValueRepr {
    fn from(input: ValueInput) -> Self {
        match input {
            ValueInput::Typed(value) => ValueRepr::Typed(value),
            ValueInput::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => ValueRepr::Text(text),
                Err(e) => ValueRepr::Hex {
                    hex: OctetString::from(e.into_bytes()),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(json, expected,
        case(r#""hello""#, ValueInput::Bytes(b"hello".to_vec())),
        case(r#"{"hex":"00ff"}"#, ValueInput::Bytes(vec![0x00, 0xff])),
        case(r#"{"type":"IA5STRING","content":"6869"}"#, ValueInput::Typed(TypedValue::new(TypeTag::Ia5String, b"hi".to_vec()).unwrap())),
    )]
    fn test_value_input_deserialize(json: &str, expected: ValueInput) {
        let input: ValueInput = serde_json::from_str(json).unwrap();
        assert_eq!(expected, input);
    }

    #[rstest(input, expected,
        case(ValueInput::Bytes(b"hello".to_vec()), r#""hello""#),
        case(ValueInput::Bytes(vec![0x00, 0xff]), r#"{"hex":"00ff"}"#),
    )]
    fn test_value_input_serialize(input: ValueInput, expected: &str) {
        assert_eq!(expected, serde_json::to_string(&input).unwrap());
    }

    #[test]
    fn test_value_input_invalid_typed_content() {
        let json = r#"{"type":"BOOLEAN","content":"02"}"#;
        assert!(serde_json::from_str::<ValueInput>(json).is_err());
    }

    #[test]
    fn test_to_typed_value_bytes() {
        let desc = ValueDescription::new(TypeTag::PrintableString, ValueInput::from("abc"));
        let value = desc.to_typed_value().unwrap();
        assert_eq!(TypeTag::PrintableString, value.tag());
        assert_eq!(b"abc", value.content());
    }

    #[rstest(declared, actual,
        case(TypeTag::PrintableString, TypeTag::Utf8String),
        case(TypeTag::Ia5String, TypeTag::PrintableString),
        case(TypeTag::OctetString, TypeTag::Utf8String),
        case(TypeTag::Utf8String, TypeTag::OctetString),
    )]
    fn test_to_typed_value_mismatch(declared: TypeTag, actual: TypeTag) {
        let value = TypedValue::new(actual, b"abc".to_vec()).unwrap();
        let desc = ValueDescription::new(declared, ValueInput::Typed(value));
        let err = desc.to_typed_value().unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { declared: d, actual: a } if d == declared && a == actual
        ));
    }

    #[test]
    fn test_to_typed_value_undefined() {
        let desc = ValueDescription::new(TypeTag::Undefined, ValueInput::from("abc"));
        assert!(matches!(
            desc.to_typed_value(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_spec_deserialize() {
        let json = r#"{"object":"challengePassword","type":"printable","value":"secret"}"#;
        let spec: AttributeSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            AttributeSpec::new(
                "challengePassword",
                TypeTag::PrintableString,
                ValueInput::from("secret")
            ),
            spec
        );
    }
}
