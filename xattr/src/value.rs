use std::fmt;

use serde::{Deserialize, Serialize};
use xattr_asn1::{Element, OctetString};
use xattr_codec::decoder::{DecodableFrom, Decoder};
use xattr_codec::encoder::{EncodableTo, Encoder};
use xattr_der::{Der, Tag, Tlv};

use crate::error::{Error, Result};
use crate::tag::TypeTag;

/// One ASN.1 value: a universal tag and the content octets of its DER encoding.
///
/// The content is always a valid DER body for the tag. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TypedValueRepr", into = "TypedValueRepr")]
pub struct TypedValue {
    tag: TypeTag,
    content: Vec<u8>,
}

impl TypedValue {
    /// Validates `content` against `tag` and takes ownership of it.
    ///
    /// Fails with `InvalidArgument` for `TypeTag::Undefined` and with
    /// `InvalidEncoding` when the octets do not decode as `tag`.
    pub fn new(tag: TypeTag, content: impl Into<Vec<u8>>) -> Result<Self> {
        let primitive = tag.primitive_tag().ok_or_else(|| {
            Error::InvalidArgument("a value cannot have the UNDEF type".to_string())
        })?;
        let content = content.into();
        Element::from_content(primitive, &content)
            .map_err(|source| Error::InvalidEncoding { tag, source })?;
        Ok(TypedValue { tag, content })
    }

    /// Builds a value from an already decoded ASN.1 element.
    pub fn from_element(element: &Element) -> Result<Self> {
        let tlv: Tlv = element
            .encode()
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        TypedValue::try_from(&tlv)
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    pub fn element(&self) -> Result<Element> {
        let tlv = self.encode()?;
        Element::try_from(&tlv).map_err(|source| Error::InvalidEncoding {
            tag: self.tag,
            source,
        })
    }
}

impl TryFrom<&Tlv> for TypedValue {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        let raw = u8::from(tlv.tag());
        let Tag::Primitive(primitive, _) = tlv.tag() else {
            return Err(Error::UnsupportedTag(raw));
        };
        let tag = TypeTag::from_primitive(*primitive).ok_or(Error::UnsupportedTag(raw))?;
        if tag.is_constructed() != tlv.tag().is_constructed() {
            // DER has no constructed strings and no primitive SEQUENCE/SET
            return Err(Error::InvalidStructure(format!(
                "{} with identifier 0x{:02x} has the wrong form",
                tag, raw
            )));
        }
        TypedValue::new(tag, tlv.content())
    }
}

impl DecodableFrom<Tlv> for TypedValue {}

impl Decoder<Tlv, TypedValue> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<TypedValue> {
        TypedValue::try_from(self)
    }
}

impl EncodableTo<TypedValue> for Tlv {}

impl Encoder<TypedValue, Tlv> for TypedValue {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        let primitive = self.tag.primitive_tag().ok_or_else(|| {
            Error::InvalidArgument("a value cannot have the UNDEF type".to_string())
        })?;
        if self.tag.is_constructed() {
            let der: Der = Decoder::<&[u8], Der>::decode(&self.content.as_slice())?;
            Ok(Tlv::new_constructed(primitive.tag(), der.into_elements()))
        } else {
            Ok(Tlv::new_primitive(primitive.tag(), self.content.clone()))
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element() {
            Ok(element) => write!(f, "{}", element),
            Err(_) => write!(f, "{}({})", self.tag, OctetString::from(self.content.as_slice())),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TypedValueRepr {
    #[serde(rename = "type")]
    tag: TypeTag,
    content: OctetString,
}

impl TryFrom<TypedValueRepr> for TypedValue {
    type Error = Error;

    fn try_from(repr: TypedValueRepr) -> Result<Self> {
        TypedValue::new(repr.tag, repr.content.into_bytes())
    }
}

impl From<TypedValue> for TypedValueRepr {
    fn from(value: TypedValue) -> Self {
        TypedValueRepr {
            tag: value.tag,
            content: OctetString::from(value.content),
        }
    }
}
