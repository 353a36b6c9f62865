//! ASN.1 universal type tags a [`TypedValue`](crate::TypedValue) may carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xattr_der::PrimitiveTag;

use crate::error::{Error, Result};

/// Universal type of an attribute value.
///
/// `Undefined` is the "any" sentinel. It is accepted by the parser so callers can
/// name it, but no value can be constructed with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TagRepr", into = "String")]
pub enum TypeTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Enumerated,
    Utf8String,
    Sequence,
    Set,
    NumericString,
    PrintableString,
    T61String,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    VisibleString,
    UniversalString,
    BmpString,
    Undefined,
}

impl TypeTag {
    /// Universal tag number, `-1` for `Undefined`.
    pub fn number(&self) -> i64 {
        match self.primitive_tag() {
            Some(tag) => i64::from(u8::from(&tag)),
            None => -1,
        }
    }

    /// Maps a universal tag number. Unknown numbers, `0` and `-1` map to `Undefined`.
    pub fn from_number(number: i64) -> TypeTag {
        u8::try_from(number)
            .ok()
            .and_then(|n| TypeTag::from_primitive(PrimitiveTag::from(n)))
            .unwrap_or(TypeTag::Undefined)
    }

    pub fn from_primitive(tag: PrimitiveTag) -> Option<TypeTag> {
        let tag = match tag {
            PrimitiveTag::Boolean => TypeTag::Boolean,
            PrimitiveTag::Integer => TypeTag::Integer,
            PrimitiveTag::BitString => TypeTag::BitString,
            PrimitiveTag::OctetString => TypeTag::OctetString,
            PrimitiveTag::Null => TypeTag::Null,
            PrimitiveTag::ObjectIdentifier => TypeTag::ObjectIdentifier,
            PrimitiveTag::Enumerated => TypeTag::Enumerated,
            PrimitiveTag::UTF8String => TypeTag::Utf8String,
            PrimitiveTag::Sequence => TypeTag::Sequence,
            PrimitiveTag::Set => TypeTag::Set,
            PrimitiveTag::NumericString => TypeTag::NumericString,
            PrimitiveTag::PrintableString => TypeTag::PrintableString,
            PrimitiveTag::T61String => TypeTag::T61String,
            PrimitiveTag::IA5String => TypeTag::Ia5String,
            PrimitiveTag::UTCTime => TypeTag::UtcTime,
            PrimitiveTag::GeneralizedTime => TypeTag::GeneralizedTime,
            PrimitiveTag::VisibleString => TypeTag::VisibleString,
            PrimitiveTag::UniversalString => TypeTag::UniversalString,
            PrimitiveTag::BMPString => TypeTag::BmpString,
            PrimitiveTag::Unimplemented(_) => return None,
        };
        Some(tag)
    }

    pub fn primitive_tag(&self) -> Option<PrimitiveTag> {
        let tag = match self {
            TypeTag::Boolean => PrimitiveTag::Boolean,
            TypeTag::Integer => PrimitiveTag::Integer,
            TypeTag::BitString => PrimitiveTag::BitString,
            TypeTag::OctetString => PrimitiveTag::OctetString,
            TypeTag::Null => PrimitiveTag::Null,
            TypeTag::ObjectIdentifier => PrimitiveTag::ObjectIdentifier,
            TypeTag::Enumerated => PrimitiveTag::Enumerated,
            TypeTag::Utf8String => PrimitiveTag::UTF8String,
            TypeTag::Sequence => PrimitiveTag::Sequence,
            TypeTag::Set => PrimitiveTag::Set,
            TypeTag::NumericString => PrimitiveTag::NumericString,
            TypeTag::PrintableString => PrimitiveTag::PrintableString,
            TypeTag::T61String => PrimitiveTag::T61String,
            TypeTag::Ia5String => PrimitiveTag::IA5String,
            TypeTag::UtcTime => PrimitiveTag::UTCTime,
            TypeTag::GeneralizedTime => PrimitiveTag::GeneralizedTime,
            TypeTag::VisibleString => PrimitiveTag::VisibleString,
            TypeTag::UniversalString => PrimitiveTag::UniversalString,
            TypeTag::BmpString => PrimitiveTag::BMPString,
            TypeTag::Undefined => return None,
        };
        Some(tag)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, TypeTag::Undefined)
    }

    /// SEQUENCE and SET are the only tags carried in constructed form.
    pub fn is_constructed(&self) -> bool {
        matches!(self, TypeTag::Sequence | TypeTag::Set)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Integer => "INTEGER",
            TypeTag::BitString => "BIT STRING",
            TypeTag::OctetString => "OCTET STRING",
            TypeTag::Null => "NULL",
            TypeTag::ObjectIdentifier => "OBJECT",
            TypeTag::Enumerated => "ENUMERATED",
            TypeTag::Utf8String => "UTF8STRING",
            TypeTag::Sequence => "SEQUENCE",
            TypeTag::Set => "SET",
            TypeTag::NumericString => "NUMERICSTRING",
            TypeTag::PrintableString => "PRINTABLESTRING",
            TypeTag::T61String => "T61STRING",
            TypeTag::Ia5String => "IA5STRING",
            TypeTag::UtcTime => "UTCTIME",
            TypeTag::GeneralizedTime => "GENERALIZEDTIME",
            TypeTag::VisibleString => "VISIBLESTRING",
            TypeTag::UniversalString => "UNIVERSALSTRING",
            TypeTag::BmpString => "BMPSTRING",
            TypeTag::Undefined => "UNDEF",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    /// Case insensitive. Spaces, `_` and `-` are ignored so `OCTET STRING`,
    /// `octet_string` and `OctetString` are the same name. A decimal string is
    /// read as a tag number.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) {
            let number = normalized
                .parse::<i64>()
                .map_err(|_| Error::InvalidArgument(format!("unknown type tag '{}'", s)))?;
            return Ok(TypeTag::from_number(number));
        }

        let tag = match normalized.as_str() {
            "boolean" | "bool" => TypeTag::Boolean,
            "integer" | "int" => TypeTag::Integer,
            "bitstring" | "bits" => TypeTag::BitString,
            "octetstring" | "octet" | "octets" => TypeTag::OctetString,
            "null" => TypeTag::Null,
            "object" | "objectidentifier" | "oid" => TypeTag::ObjectIdentifier,
            "enumerated" | "enum" => TypeTag::Enumerated,
            "utf8string" | "utf8" => TypeTag::Utf8String,
            "sequence" | "seq" => TypeTag::Sequence,
            "set" => TypeTag::Set,
            "numericstring" | "numeric" => TypeTag::NumericString,
            "printablestring" | "printable" => TypeTag::PrintableString,
            "t61string" | "t61" | "teletexstring" | "teletex" => TypeTag::T61String,
            "ia5string" | "ia5" => TypeTag::Ia5String,
            "utctime" | "utc" => TypeTag::UtcTime,
            "generalizedtime" | "generalized" => TypeTag::GeneralizedTime,
            "visiblestring" | "visible" => TypeTag::VisibleString,
            "universalstring" | "universal" => TypeTag::UniversalString,
            "bmpstring" | "bmp" => TypeTag::BmpString,
            "undef" | "undefined" | "any" => TypeTag::Undefined,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unknown type tag '{}'",
                    s
                )));
            }
        };
        Ok(tag)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Number(i64),
    Name(String),
}

impl TryFrom<TagRepr> for TypeTag {
    type Error = Error;

    fn try_from(repr: TagRepr) -> Result<Self> {
        match repr {
            TagRepr::Number(n) => Ok(TypeTag::from_number(n)),
            TagRepr::Name(name) => TypeTag::from_str(&name),
        }
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.name().to_string()
    }
}
