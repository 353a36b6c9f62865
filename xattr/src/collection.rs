//! Ordered list of attributes, e.g. the attributes of a PKCS#10 request.
//!
//! ```asn1
//! Attributes ::= SET OF Attribute
//! CertificationRequestInfo ::= SEQUENCE {
//!     ...
//!     attributes  [0] IMPLICIT Attributes
//! }
//! ```
//!
//! Insertion order is kept through every operation and in the DER output.
//! Several attributes may share an object identifier.

use xattr_asn1::ObjectIdentifier;
use xattr_codec::decoder::{DecodableFrom, Decoder};
use xattr_codec::encoder::{EncodableTo, Encoder};
use xattr_der::{PrimitiveTag, Tag, Tlv};

use crate::attribute::Attribute;
use crate::error::{Error, Result};

/// Highest context-specific tag number that fits in one identifier octet.
const MAX_SLOT: u8 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeCollection {
    attributes: Vec<Attribute>,
}

impl AttributeCollection {
    pub fn new() -> Self {
        AttributeCollection::default()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Inserts at `index`, shifting later attributes. `index == len()` appends.
    pub fn insert(&mut self, index: usize, attribute: Attribute) -> Result<()> {
        let count = self.len();
        if index > count {
            return Err(Error::OutOfRange { index, count });
        }
        self.attributes.insert(index, attribute);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Attribute> {
        let count = self.len();
        if index >= count {
            return Err(Error::OutOfRange { index, count });
        }
        Ok(self.attributes.remove(index))
    }

    pub fn at(&self, index: usize) -> Result<&Attribute> {
        self.attributes.get(index).ok_or(Error::OutOfRange {
            index,
            count: self.len(),
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Attribute> {
        let count = self.len();
        self.attributes
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, count })
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// First attribute with the given type.
    pub fn find_by_object(&self, object: &ObjectIdentifier) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.object() == object)
    }

    pub fn as_slice(&self) -> &[Attribute] {
        &self.attributes
    }

    /// `[slot] IMPLICIT SET OF Attribute`, the form used inside a
    /// certification request.
    pub fn to_tagged_tlv(&self, slot: u8) -> Result<Tlv> {
        if slot > MAX_SLOT {
            return Err(Error::InvalidArgument(format!(
                "context-specific slot {} does not fit in one identifier octet",
                slot
            )));
        }
        Ok(Tlv::new_constructed(
            Tag::ContextSpecific {
                slot,
                constructed: true,
            },
            self.encode_attributes()?,
        ))
    }

    /// `SET OF Attribute` in stored order. The elements are not sorted as
    /// canonical DER would require.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let tlv: Tlv = self.encode()?;
        Ok(tlv.to_bytes())
    }

    /// Accepts both the universal SET and the context-specific form.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let tlv = Tlv::from_bytes(bytes)?;
        Decoder::<Tlv, AttributeCollection>::decode(&tlv)
    }

    fn encode_attributes(&self) -> Result<Vec<Tlv>> {
        self.attributes.iter().map(|a| a.encode()).collect()
    }
}

impl From<Vec<Attribute>> for AttributeCollection {
    fn from(attributes: Vec<Attribute>) -> Self {
        AttributeCollection { attributes }
    }
}

impl From<AttributeCollection> for Vec<Attribute> {
    fn from(collection: AttributeCollection) -> Self {
        collection.attributes
    }
}

impl FromIterator<Attribute> for AttributeCollection {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        AttributeCollection {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AttributeCollection {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeCollection {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl DecodableFrom<Tlv> for AttributeCollection {}

impl Decoder<Tlv, AttributeCollection> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<AttributeCollection> {
        match self.tag() {
            Tag::Primitive(PrimitiveTag::Set, _) => {}
            Tag::ContextSpecific {
                constructed: true, ..
            } => {}
            _ => {
                return Err(Error::InvalidStructure(
                    "Attributes must be a SET or a constructed context-specific value".to_string(),
                ));
            }
        }
        let tlvs = self.tlvs().ok_or_else(|| {
            Error::InvalidStructure("Attributes must be constructed".to_string())
        })?;
        let attributes = tlvs
            .iter()
            .map(Decoder::<Tlv, Attribute>::decode)
            .collect::<Result<Vec<_>>>()?;
        log::debug!("decoded {} attribute(s)", attributes.len());
        Ok(AttributeCollection { attributes })
    }
}

impl EncodableTo<AttributeCollection> for Tlv {}

impl Encoder<AttributeCollection, Tlv> for AttributeCollection {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        Ok(Tlv::new_constructed(
            PrimitiveTag::Set.tag(),
            self.encode_attributes()?,
        ))
    }
}
