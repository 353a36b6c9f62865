//! DER tag-length-value layer.
//!
//! Parses a byte string into a tree of [`Tlv`]s and writes it back. Only the
//! definite-length, low-tag-number forms allowed by DER are accepted, and
//! lengths must be minimally encoded.

use nom::{IResult, Parser};
use xattr_codec::decoder::{DecodableFrom, Decoder};
use xattr_codec::encoder::{EncodableTo, Encoder};

pub mod error;

use error::{Error, Result};

pub const TAG_CONSTRUCTED: u8 = 0x20;
pub const TAG_CONTEXT_SPECIFIC: u8 = 0x80;

const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_NUMBER_MASK: u8 = 0x1f;

/// Deepest constructed nesting accepted by the parser.
pub const MAX_DEPTH: usize = 64;

/// A sequence of top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Tlv> {
        self.elements
    }
}

fn parse_all(mut input: &[u8]) -> Result<Der> {
    let mut elements = Vec::new();
    while !input.is_empty() {
        let (rest, tlv) = Tlv::parse(input, 0)?;
        input = rest;
        elements.push(tlv);
    }
    Ok(Der { elements })
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        parse_all(self)
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        parse_all(self)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        Ok(self.elements.iter().flat_map(Tlv::to_bytes).collect())
    }
}

/// Universal class tag numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Enumerated,
    UTF8String,
    Sequence,
    Set,
    NumericString,
    PrintableString,
    T61String,
    IA5String,
    UTCTime,
    GeneralizedTime,
    VisibleString,
    UniversalString,
    BMPString,
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    /// Maps a universal tag number (the low five bits of the identifier octet).
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::Boolean,
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x0a => Self::Enumerated,
            0x0c => Self::UTF8String,
            0x10 => Self::Sequence,
            0x11 => Self::Set,
            0x12 => Self::NumericString,
            0x13 => Self::PrintableString,
            0x14 => Self::T61String,
            0x16 => Self::IA5String,
            0x17 => Self::UTCTime,
            0x18 => Self::GeneralizedTime,
            0x1a => Self::VisibleString,
            0x1c => Self::UniversalString,
            0x1e => Self::BMPString,
            _ => Self::Unimplemented(value),
        }
    }
}

impl From<&PrimitiveTag> for u8 {
    fn from(value: &PrimitiveTag) -> Self {
        match value {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::Enumerated => 0x0a,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::NumericString => 0x12,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::T61String => 0x14,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::VisibleString => 0x1a,
            PrimitiveTag::UniversalString => 0x1c,
            PrimitiveTag::BMPString => 0x1e,
            PrimitiveTag::Unimplemented(n) => *n,
        }
    }
}

impl PrimitiveTag {
    /// The identifier octet used when this tag is written on its own.
    /// SEQUENCE and SET always carry the constructed bit.
    pub fn identifier(&self) -> u8 {
        match self {
            PrimitiveTag::Sequence | PrimitiveTag::Set => u8::from(self) | TAG_CONSTRUCTED,
            _ => u8::from(self),
        }
    }

    pub fn tag(self) -> Tag {
        Tag::Primitive(self, self.identifier())
    }
}

/// Identifier octet.
///
/// `Primitive` covers the universal class (despite the name it also holds the
/// constructed SEQUENCE and SET) and keeps the raw octet for re-encoding.
/// Application and private class octets land in `Primitive(Unimplemented(_), _)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value & TAG_CLASS_MASK {
            0x00 => Tag::Primitive(PrimitiveTag::from(value & TAG_NUMBER_MASK), value),
            TAG_CONTEXT_SPECIFIC => Tag::ContextSpecific {
                slot: value & TAG_NUMBER_MASK,
                constructed: value & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            },
            _ => Tag::Primitive(PrimitiveTag::Unimplemented(value), value),
        }
    }
}

impl From<&Tag> for u8 {
    fn from(value: &Tag) -> Self {
        match value {
            Tag::Primitive(_, raw) => *raw,
            Tag::ContextSpecific { slot, constructed } => {
                let mut b = TAG_CONTEXT_SPECIFIC | (slot & TAG_NUMBER_MASK);
                if *constructed {
                    b |= TAG_CONSTRUCTED;
                }
                b
            }
        }
    }
}

impl Tag {
    pub fn is_constructed(&self) -> bool {
        u8::from(self) & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Tlvs(Vec<Tlv>),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlvs(tlvs),
        }
    }

    /// Parses exactly one TLV; any byte after it is an error.
    pub fn from_bytes(input: &[u8]) -> Result<Self> {
        let (rest, tlv) = Self::parse(input, 0)?;
        if !rest.is_empty() {
            return Err(Error::TrailingData(rest.len()));
        }
        Ok(tlv)
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlvs(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlvs(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Content octets regardless of form: constructed children are re-encoded.
    pub fn content(&self) -> Vec<u8> {
        match &self.value {
            Value::Data(data) => data.clone(),
            Value::Tlvs(tlvs) => tlvs.iter().flat_map(Tlv::to_bytes).collect(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let content = self.content();
        let mut out = Vec::with_capacity(content.len() + 6);
        out.push(u8::from(&self.tag));
        out.extend(encode_length(content.len()));
        out.extend(content);
        out
    }

    fn parse(input: &[u8], depth: usize) -> Result<(&[u8], Tlv)> {
        if depth > MAX_DEPTH {
            return Err(Error::NestingTooDeep(MAX_DEPTH));
        }
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = parse_content(input, length)?;

        if tag.is_constructed() {
            // parse TLV recursively.
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, v) = Self::parse(data, depth + 1)?;
                data = rest;
                tlvs.push(v);
            }
            return Ok((
                input,
                Tlv {
                    tag,
                    value: Value::Tlvs(tlvs),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                value: Value::Data(data.to_vec()),
            },
        ))
    }
}

fn parse_content(input: &[u8], length: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(length).parse(input)
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (rest, n) = nom::number::be_u8().parse(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        // high tag number form is not used by anything we carry
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TagBits,
        )));
    }
    Ok((rest, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, n) = nom::number::be_u8().parse(input)?;
    if n & 0x80 == 0 {
        // short form: 0-127
        return Ok((rest, n as usize));
    }

    // long form
    // First 1 bit is a marker for long form.
    // Other bits represent bytes length of the length field.
    let count = (n & 0x7f) as usize;
    if count == 0 || count > std::mem::size_of::<usize>() {
        // 0x80 is the BER indefinite form
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::LengthValue,
        )));
    }
    let (rest, bs) = nom::bytes::complete::take(count).parse(rest)?;
    if bs[0] == 0 {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::LengthValue,
        )));
    }
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
    if length < 0x80 {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::LengthValue,
        )));
    }
    Ok((rest, length))
}

fn encode_length(length: usize) -> Vec<u8> {
    if length < 0x80 {
        return vec![length as u8];
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let mut out = Vec::with_capacity(1 + bytes.len() - skip);
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
    out
}
