use std::{fmt::Display, str::FromStr};

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use xattr_codec::decoder::{DecodableFrom, Decoder};
use xattr_codec::encoder::{EncodableTo, Encoder};
use xattr_der::{Der, PrimitiveTag, Tag, Tlv};

pub mod error;

use error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Enumerated(Integer),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    NumericString(String),
    PrintableString(String),
    T61String(String),
    IA5String(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    VisibleString(String),
    UniversalString(String),
    BMPString(BMPString),
    ContextSpecific {
        slot: u8,
        constructed: bool,
        element: Box<Element>,
    },
    Unimplemented(Tlv),
}

impl Element {
    /// Decodes `content` as the body of a universal `tag`.
    ///
    /// For SEQUENCE and SET the content is the concatenation of the encoded
    /// children. Every other tag takes the raw content octets.
    pub fn from_content(tag: PrimitiveTag, content: &[u8]) -> Result<Element> {
        let tlv = match tag {
            PrimitiveTag::Sequence | PrimitiveTag::Set => {
                let der: Der = content.decode().map_err(Error::FailedToDecodeDer)?;
                Tlv::new_constructed(tag.tag(), der.into_elements())
            }
            _ => Tlv::new_primitive(tag.tag(), content.to_vec()),
        };
        Element::try_from(&tlv)
    }
}

fn primitive_data<'a>(tlv: &'a Tlv, name: &'static str) -> Result<&'a [u8]> {
    tlv.data().ok_or(Error::ExpectedPrimitive(name))
}

fn decode_children(tlv: &Tlv, name: &'static str) -> Result<Vec<Element>> {
    tlv.tlvs()
        .ok_or(Error::ExpectedConstructed(name))?
        .iter()
        .map(Element::try_from)
        .collect()
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        match tlv.tag() {
            Tag::Primitive(primitive_tag, _) => match primitive_tag {
                PrimitiveTag::Boolean => match primitive_data(tlv, "BOOLEAN")? {
                    [0x00] => Ok(Element::Boolean(false)),
                    [0xff] => Ok(Element::Boolean(true)),
                    _ => Err(Error::InvalidBoolean),
                },
                PrimitiveTag::Integer => {
                    let integer = Integer::try_from(primitive_data(tlv, "INTEGER")?)?;
                    Ok(Element::Integer(integer))
                }
                PrimitiveTag::Enumerated => {
                    let integer = Integer::try_from(primitive_data(tlv, "ENUMERATED")?)?;
                    Ok(Element::Enumerated(integer))
                }
                PrimitiveTag::BitString => {
                    let bit_string = BitString::try_from(primitive_data(tlv, "BIT STRING")?)?;
                    Ok(Element::BitString(bit_string))
                }
                PrimitiveTag::OctetString => Ok(Element::OctetString(OctetString::from(
                    primitive_data(tlv, "OCTET STRING")?,
                ))),
                PrimitiveTag::Null => match primitive_data(tlv, "NULL")? {
                    [] => Ok(Element::Null),
                    data => Err(Error::NullNotEmpty(data.len())),
                },
                PrimitiveTag::ObjectIdentifier => {
                    let oid = ObjectIdentifier::try_from(primitive_data(tlv, "OBJECT IDENTIFIER")?)?;
                    Ok(Element::ObjectIdentifier(oid))
                }
                PrimitiveTag::UTF8String => {
                    let s = String::from_utf8(primitive_data(tlv, "UTF8String")?.to_vec())
                        .map_err(|_| Error::Utf8StringInvalidUtf8)?;
                    Ok(Element::UTF8String(s))
                }
                PrimitiveTag::Sequence => Ok(Element::Sequence(decode_children(tlv, "SEQUENCE")?)),
                PrimitiveTag::Set => Ok(Element::Set(decode_children(tlv, "SET")?)),
                PrimitiveTag::NumericString => {
                    let s = restricted_string(
                        primitive_data(tlv, "NumericString")?,
                        is_numeric_char,
                        Error::NumericStringInvalidEncoding,
                    )?;
                    Ok(Element::NumericString(s))
                }
                PrimitiveTag::PrintableString => {
                    let s = restricted_string(
                        primitive_data(tlv, "PrintableString")?,
                        is_printable_char,
                        Error::PrintableStringInvalidEncoding,
                    )?;
                    Ok(Element::PrintableString(s))
                }
                PrimitiveTag::T61String => {
                    // Teletex is carried as Latin-1, the way most toolkits treat it.
                    let data = primitive_data(tlv, "T61String")?;
                    Ok(Element::T61String(data.iter().map(|&b| b as char).collect()))
                }
                PrimitiveTag::IA5String => {
                    let s = restricted_string(
                        primitive_data(tlv, "IA5String")?,
                        |b| b.is_ascii(),
                        Error::Ia5StringInvalidEncoding,
                    )?;
                    Ok(Element::IA5String(s))
                }
                PrimitiveTag::VisibleString => {
                    let s = restricted_string(
                        primitive_data(tlv, "VisibleString")?,
                        is_visible_char,
                        Error::VisibleStringInvalidEncoding,
                    )?;
                    Ok(Element::VisibleString(s))
                }
                PrimitiveTag::UniversalString => {
                    let s = parse_universal_string(primitive_data(tlv, "UniversalString")?)?;
                    Ok(Element::UniversalString(s))
                }
                PrimitiveTag::BMPString => {
                    let bmp = BMPString::try_from(primitive_data(tlv, "BMPString")?)?;
                    Ok(Element::BMPString(bmp))
                }
                PrimitiveTag::UTCTime => {
                    let time = parse_utc_time(primitive_data(tlv, "UTCTime")?)?;
                    Ok(Element::UTCTime(time))
                }
                PrimitiveTag::GeneralizedTime => {
                    let time = parse_generalized_time(primitive_data(tlv, "GeneralizedTime")?)?;
                    Ok(Element::GeneralizedTime(time))
                }
                PrimitiveTag::Unimplemented(_) => Ok(Element::Unimplemented(tlv.clone())),
            },
            Tag::ContextSpecific { slot, constructed } => {
                if *constructed {
                    // EXPLICIT tagging wraps exactly one inner element
                    match tlv.tlvs() {
                        Some([inner]) => Ok(Element::ContextSpecific {
                            slot: *slot,
                            constructed: true,
                            element: Box::new(Element::try_from(inner)?),
                        }),
                        _ => Err(Error::InvalidContextSpecific {
                            slot: *slot,
                            msg: "context-specific constructed must have exactly one sub-tlv"
                                .to_string(),
                        }),
                    }
                } else {
                    // IMPLICIT tagging: the upper layer interprets the raw octets
                    let data = tlv.data().ok_or_else(|| Error::InvalidContextSpecific {
                        slot: *slot,
                        msg: "context-specific primitive has no data".to_string(),
                    })?;
                    Ok(Element::ContextSpecific {
                        slot: *slot,
                        constructed: false,
                        element: Box::new(Element::OctetString(OctetString::from(data))),
                    })
                }
            }
        }
    }
}

impl DecodableFrom<Tlv> for Element {}

impl Decoder<Tlv, Element> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Element> {
        Element::try_from(self)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::Enumerated(i) => write!(f, "Enumerated({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({})", join(seq)),
            Element::Set(set) => write!(f, "Set({})", join(set)),
            Element::NumericString(s) => write!(f, "NumericString({})", s),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::T61String(s) => write!(f, "T61String({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::VisibleString(s) => write!(f, "VisibleString({})", s),
            Element::UniversalString(s) => write!(f, "UniversalString({})", s),
            Element::BMPString(s) => write!(f, "BMPString({})", s),
            Element::UTCTime(dt) => write!(f, "UTCTime({})", dt),
            Element::GeneralizedTime(dt) => write!(f, "GeneralizedTime({})", dt),
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => write!(
                f,
                "ContextSpecific(slot: {}, constructed: {}, element: {})",
                slot, constructed, element
            ),
            Element::Unimplemented(tlv) => {
                write!(f, "Unimplemented(0x{:02x})", u8::from(tlv.tag()))
            }
        }
    }
}

fn join(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let primitive = |tag: PrimitiveTag, data: Vec<u8>| Tlv::new_primitive(tag.tag(), data);
        match element {
            Element::Boolean(b) => Ok(primitive(
                PrimitiveTag::Boolean,
                vec![if *b { 0xFF } else { 0x00 }],
            )),
            Element::Integer(i) => Ok(primitive(
                PrimitiveTag::Integer,
                i.as_bigint().to_signed_bytes_be(),
            )),
            Element::Enumerated(i) => Ok(primitive(
                PrimitiveTag::Enumerated,
                i.as_bigint().to_signed_bytes_be(),
            )),
            Element::BitString(bs) => {
                let mut data = Vec::with_capacity(bs.as_bytes().len() + 1);
                data.push(bs.unused_bits());
                data.extend_from_slice(bs.as_bytes());
                Ok(primitive(PrimitiveTag::BitString, data))
            }
            Element::OctetString(os) => {
                Ok(primitive(PrimitiveTag::OctetString, os.as_bytes().to_vec()))
            }
            Element::Null => Ok(primitive(PrimitiveTag::Null, vec![])),
            Element::ObjectIdentifier(oid) => {
                Ok(primitive(PrimitiveTag::ObjectIdentifier, oid.to_der_content()))
            }
            Element::UTF8String(s) => Ok(primitive(PrimitiveTag::UTF8String, s.as_bytes().to_vec())),
            Element::Sequence(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Tlv::new_constructed(PrimitiveTag::Sequence.tag(), tlvs))
            }
            Element::Set(elements) => {
                let tlvs = elements
                    .iter()
                    .map(Tlv::try_from)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Tlv::new_constructed(PrimitiveTag::Set.tag(), tlvs))
            }
            Element::NumericString(s) => {
                check_restricted(s, is_numeric_char, Error::NumericStringInvalidEncoding)?;
                Ok(primitive(PrimitiveTag::NumericString, s.as_bytes().to_vec()))
            }
            Element::PrintableString(s) => {
                check_restricted(s, is_printable_char, Error::PrintableStringInvalidEncoding)?;
                Ok(primitive(PrimitiveTag::PrintableString, s.as_bytes().to_vec()))
            }
            Element::T61String(s) => {
                let data = s
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).map_err(|_| Error::T61StringCannotEncode(c)))
                    .collect::<Result<Vec<u8>>>()?;
                Ok(primitive(PrimitiveTag::T61String, data))
            }
            Element::IA5String(s) => {
                check_restricted(s, |b| b.is_ascii(), Error::Ia5StringInvalidEncoding)?;
                Ok(primitive(PrimitiveTag::IA5String, s.as_bytes().to_vec()))
            }
            Element::VisibleString(s) => {
                check_restricted(s, is_visible_char, Error::VisibleStringInvalidEncoding)?;
                Ok(primitive(PrimitiveTag::VisibleString, s.as_bytes().to_vec()))
            }
            Element::UniversalString(s) => {
                let data = s.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect();
                Ok(primitive(PrimitiveTag::UniversalString, data))
            }
            Element::BMPString(s) => Ok(primitive(PrimitiveTag::BMPString, s.to_bytes())),
            Element::UTCTime(dt) => {
                let time_str = dt.format("%y%m%d%H%M%SZ").to_string();
                Ok(primitive(PrimitiveTag::UTCTime, time_str.into_bytes()))
            }
            Element::GeneralizedTime(dt) => {
                let time_str = dt.format("%Y%m%d%H%M%SZ").to_string();
                Ok(primitive(PrimitiveTag::GeneralizedTime, time_str.into_bytes()))
            }
            Element::ContextSpecific {
                slot,
                constructed,
                element,
            } => {
                let tag = Tag::ContextSpecific {
                    slot: *slot,
                    constructed: *constructed,
                };
                if *constructed {
                    // EXPLICIT tagging: wrap the inner element
                    let inner_tlv = Tlv::try_from(element.as_ref())?;
                    Ok(Tlv::new_constructed(tag, vec![inner_tlv]))
                } else {
                    // IMPLICIT tagging: keep the inner content octets only
                    let inner_tlv = Tlv::try_from(element.as_ref())?;
                    match inner_tlv.data() {
                        Some(data) => Ok(Tlv::new_primitive(tag, data.to_vec())),
                        None => Err(Error::ElementCannotEncode(
                            "IMPLICIT tagging of a constructed element",
                        )),
                    }
                }
            }
            Element::Unimplemented(tlv) => Ok(tlv.clone()),
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        Tlv::try_from(self)
    }
}

fn is_printable_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

fn is_numeric_char(b: u8) -> bool {
    b.is_ascii_digit() || b == b' '
}

fn is_visible_char(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

fn restricted_string(data: &[u8], allowed: fn(u8) -> bool, err: Error) -> Result<String> {
    if !data.iter().all(|&b| allowed(b)) {
        return Err(err);
    }
    // every allowed set is a subset of ASCII
    String::from_utf8(data.to_vec()).map_err(|_| err)
}

fn check_restricted(s: &str, allowed: fn(u8) -> bool, err: Error) -> Result<()> {
    if s.bytes().all(allowed) {
        Ok(())
    } else {
        Err(err)
    }
}

fn parse_universal_string(data: &[u8]) -> Result<String> {
    if data.len() % 4 != 0 {
        return Err(Error::UniversalStringInvalidLength(data.len()));
    }
    data.chunks_exact(4)
        .map(|c| {
            let code_point = u32::from_be_bytes([c[0], c[1], c[2], c[3]]);
            char::from_u32(code_point).ok_or(Error::UniversalStringInvalidCodePoint(code_point))
        })
        .collect()
}

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Returns a reference to the inner BigInt
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }
}

impl TryFrom<&[u8]> for Integer {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value {
            [] => Err(Error::IntegerNoData),
            // the first nine bits must not be all zeros or all ones
            [0x00, next, ..] if next & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, next, ..] if next & 0x80 != 0 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(value),
            }),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// OBJECT IDENTIFIER as its list of arcs.
///
/// A value of this type always has at least two arcs and valid root arcs, so
/// it can always be DER-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn new(arcs: Vec<u64>) -> Result<Self> {
        match arcs.as_slice() {
            [] | [_] => Err(Error::ObjectIdentifierTooFewComponents),
            [first, second, ..] if *first > 2 || (*first < 2 && *second >= 40) => {
                Err(Error::ObjectIdentifierInvalidRoot(*first, *second))
            }
            [2, second, ..] if second.checked_add(80).is_none() => {
                Err(Error::ObjectIdentifierArcOverflow)
            }
            _ => Ok(ObjectIdentifier { inner: arcs }),
        }
    }

    /// Content octets of the DER encoding (without tag and length).
    pub fn to_der_content(&self) -> Vec<u8> {
        let mut result = Vec::new();
        // the first two arcs share one sub-identifier
        encode_base128(self.inner[0] * 40 + self.inner[1], &mut result);
        for v in self.inner[2..].iter() {
            encode_base128(*v, &mut result);
        }
        result
    }
}

fn encode_base128(value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut value = value >> 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut sub_ids = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for &b in value {
            if !pending && b == 0x80 {
                // a sub-identifier may not start with a zero group
                return Err(Error::ObjectIdentifierNonMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierArcOverflow);
            }
            val = (val << 7) | (b & 0x7f) as u64;
            if b & 0x80 == 0 {
                sub_ids.push(val);
                val = 0;
                pending = false;
            } else {
                pending = true;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let first = sub_ids[0];
        let mut arcs = match first {
            0..40 => vec![0, first],
            40..80 => vec![1, first - 40],
            _ => vec![2, first - 80],
        };
        arcs.extend_from_slice(&sub_ids[1..]);
        Ok(ObjectIdentifier { inner: arcs })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::ObjectIdentifierEmptyString);
        }
        let arcs = s
            .split('.')
            .map(|c| {
                // u64::from_str would accept a leading '+'
                if c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::ObjectIdentifierInvalidComponent(c.to_string()));
                }
                c.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(c.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;
        ObjectIdentifier::new(arcs)
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    /// Returns the number of unused bits in the last byte
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    /// Returns a reference to the underlying byte data
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused] if *unused != 0 => Err(Error::BitStringUnusedBitsWithoutData(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();

        for (i, byte) in self.data.iter().enumerate() {
            if i == self.data.len() - 1 && self.unused > 0 {
                // Handle the last byte with unused bits
                let valid_bits = byte >> self.unused;
                let bit_count = 8 - self.unused as usize;
                result.push_str(&format!("{:0bit_count$b}", valid_bits, bit_count = bit_count));
            } else {
                result.push_str(&format!("{:08b}", byte));
            }
        }

        write!(f, "{}", result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl Serialize for OctetString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            // Serialize as hex string for human-readable formats (JSON, YAML, etc.)
            serializer.serialize_str(&self.to_string())
        } else {
            // Serialize as byte array for binary formats
            self.inner.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let hex_string = String::deserialize(deserializer)?;
            OctetString::from_hex(&hex_string).map_err(serde::de::Error::custom)
        } else {
            let inner = Vec::<u8>::deserialize(deserializer)?;
            Ok(OctetString { inner })
        }
    }
}

impl OctetString {
    /// Parses hex text. Whitespace, ':' and '-' separators are ignored.
    pub fn from_hex(hex_string: &str) -> std::result::Result<Self, String> {
        let cleaned = hex_string.replace(|c: char| c.is_whitespace() || c == ':' || c == '-', "");
        if cleaned.len() % 2 != 0 {
            return Err("hex string must have even length".to_string());
        }
        let inner = (0..cleaned.len())
            .step_by(2)
            .map(|i| {
                cleaned
                    .get(i..i + 2)
                    .and_then(|byte_str| u8::from_str_radix(byte_str, 16).ok())
                    .ok_or_else(|| format!("invalid hex string: {}", hex_string))
            })
            .collect::<std::result::Result<Vec<u8>, String>>()?;
        Ok(OctetString { inner })
    }

    /// Returns the inner bytes as a slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Consumes self and returns the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }
}

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.inner {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// BMPString: UCS-2, big endian. Characters outside the Basic Multilingual
/// Plane are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BMPString {
    inner: String,
}

impl BMPString {
    pub fn new(s: &str) -> Result<Self> {
        if s.chars().any(|c| u32::from(c) > 0xffff) {
            return Err(Error::BmpStringRequiresSurrogatePair);
        }
        Ok(BMPString {
            inner: s.to_string(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner
            .encode_utf16()
            .flat_map(|unit| unit.to_be_bytes())
            .collect()
    }
}

impl TryFrom<&[u8]> for BMPString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.len() % 2 != 0 {
            return Err(Error::BmpStringOddLength(value.len()));
        }
        let inner = value
            .chunks_exact(2)
            .enumerate()
            .map(|(position, c)| {
                let code_point = u16::from_be_bytes([c[0], c[1]]);
                char::from_u32(u32::from(code_point))
                    .ok_or(Error::BmpStringInvalidCodePoint {
                        position,
                        code_point,
                    })
            })
            .collect::<Result<String>>()?;
        Ok(BMPString { inner })
    }
}

impl Display for BMPString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

// YYMMDDHHMMSSZ
fn is_utc_time_shape(data: &[u8]) -> bool {
    matches!(data, [digits @ .., b'Z'] if digits.len() == 12 && digits.iter().all(u8::is_ascii_digit))
}

// YYYYMMDDHHMMSS[.f+]Z
fn is_generalized_time_shape(data: &[u8]) -> bool {
    let [body @ .., b'Z'] = data else {
        return false;
    };
    if body.len() < 14 || !body[..14].iter().all(u8::is_ascii_digit) {
        return false;
    }
    match &body[14..] {
        [] => true,
        [b'.', fraction @ ..] => {
            !fraction.is_empty() && fraction.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime> {
    if !is_utc_time_shape(data) {
        return Err(Error::UtcTimeInvalidFormat);
    }
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%y%m%d%H%M%SZ").map_err(|_| Error::UtcTimeInvalidFormat)
}

fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime> {
    if !is_generalized_time_shape(data) {
        return Err(Error::GeneralizedTimeInvalidFormat);
    }
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S%.fZ"))
        .map_err(|_| Error::GeneralizedTimeInvalidFormat)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use num_bigint::BigInt;
    use rstest::rstest;
    use std::str::FromStr;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x01], "1"),
        case(vec![0x00], "0"),
        case(vec![0x00, 0x80], "128"),
        case(vec![0xff], "-1"),
        case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249")
    )]
    fn test_parse_integer(input: Vec<u8>, expected: &str) {
        let expected_num = Integer {
            inner: BigInt::from_str(expected).unwrap(),
        };
        let value = Integer::try_from(input.as_slice()).unwrap();
        assert_eq!(expected_num, value);
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x00, 0x01]),
        case(vec![0xff, 0x80]),
    )]
    fn test_parse_integer_rejects_non_der(input: Vec<u8>) {
        assert!(Integer::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, expected, case("1.2.3.4", ObjectIdentifier { inner: vec![1, 2, 3, 4] }))]
    fn test_object_identifier_from_string(input: &str, expected: ObjectIdentifier) {
        let actual = ObjectIdentifier::from_str(input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, actual.to_string());
    }

    #[rstest(input,
        case(""),
        case("1"),
        case("1..2"),
        case("1.2.x"),
        case("+1.2"),
        case("3.1"),
        case("1.40"),
        case("challengePassword"),
    )]
    fn test_object_identifier_from_string_invalid(input: &str) {
        assert!(ObjectIdentifier::from_str(input).is_err());
    }

    #[rstest(input, expected,
    // Test case for ISO/ITU-T joint standards (1.2)
    case(vec![0x2A], ObjectIdentifier { inner: vec![1, 2] }),
    // Test case for ISO/IEC standard (1.3.6.1.4.1)
    case(vec![0x2B, 0x06, 0x01, 0x04, 0x01], ObjectIdentifier { inner: vec![1, 3, 6, 1, 4, 1] }),
    // Test case for ITU-T standard (0.9.2342.19200300.100.1.1)
    case(vec![0x09, 0x92, 0x26, 0x89, 0x93, 0xf2, 0x2c, 0x64, 0x01, 0x01], ObjectIdentifier { inner: vec![0, 9, 2342, 19200300, 100, 1, 1] }),
    // challengePassword (1.2.840.113549.1.9.7)
    case(vec![0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09, 0x07], ObjectIdentifier { inner: vec![1, 2, 840, 113549, 1, 9, 7] }),
    // first sub-identifier above 127 (2.999.3)
    case(vec![0x88, 0x37, 0x03], ObjectIdentifier { inner: vec![2, 999, 3] }),
    // zero arc (2.5.29.37.0)
    case(vec![0x55, 0x1d, 0x25, 0x00], ObjectIdentifier { inner: vec![2, 5, 29, 37, 0] }),
    )]
    fn test_object_identifier_bytes(input: Vec<u8>, expected: ObjectIdentifier) {
        let actual = ObjectIdentifier::try_from(input.as_slice()).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, expected.to_der_content());
    }

    #[rstest(input,
        case(vec![]),
        // dangling continuation bit
        case(vec![0x2A, 0x86]),
        // leading 0x80 group
        case(vec![0x2A, 0x80, 0x01]),
    )]
    fn test_object_identifier_bytes_invalid(input: Vec<u8>) {
        assert!(ObjectIdentifier::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, expected,
        // Test case: No unused bits, single byte
        case(BitString { unused: 0, data: vec![0b10101010] }, "10101010"),
        // Test case: Unused bits in the last byte
        case(BitString { unused: 2, data: vec![0b10101010, 0b11001100] }, "10101010110011"),
        // Test case: Empty data
        case(BitString { unused: 0, data: vec![] }, ""),
        // Test case: Single byte with unused bits
        case(BitString { unused: 4, data: vec![0b10100000] }, "1010"),
    )]
    fn test_bitstring_to_string(input: BitString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[rstest(input,
        case(vec![]),
        case(vec![0x08, 0x00]),
        case(vec![0x03]),
    )]
    fn test_bitstring_invalid(input: Vec<u8>) {
        assert!(BitString::try_from(input.as_slice()).is_err());
    }

    #[rstest(input, expected,
        case(OctetString { inner: vec![] }, ""),
        case(OctetString { inner: vec![0x01, 0x02, 0x03] }, "010203"),
        case(OctetString { inner: vec![0x00, 0x7f, 0x80, 0xff] }, "007f80ff")
    )]
    fn test_octetstring_to_string(input: OctetString, expected: &str) {
        assert_eq!(expected, input.to_string());
    }

    #[rstest(json_input, expected,
        case(r#""""#, OctetString { inner: vec![] }),
        case(r#""010203""#, OctetString { inner: vec![0x01, 0x02, 0x03] }),
        case(r#""FfAbCd""#, OctetString { inner: vec![0xff, 0xab, 0xcd] }),
        case(r#""ff:ab:cd""#, OctetString { inner: vec![0xff, 0xab, 0xcd] }),
    )]
    fn test_octetstring_deserialize(json_input: &str, expected: OctetString) {
        let octet_string: OctetString = serde_json::from_str(json_input).unwrap();
        assert_eq!(expected, octet_string);
    }

    #[rstest(json_input, case(r#""abc""#), case(r#""zz""#))]
    fn test_octetstring_deserialize_invalid(json_input: &str) {
        assert!(serde_json::from_str::<OctetString>(json_input).is_err());
    }

    #[rstest(input, expected_json,
        case(ObjectIdentifier { inner: vec![1, 2] }, r#""1.2""#),
        case(ObjectIdentifier { inner: vec![1, 2, 840, 113549, 1, 9, 7] }, r#""1.2.840.113549.1.9.7""#)
    )]
    fn test_object_identifier_serde(input: ObjectIdentifier, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }

    #[rstest(tag, content, expected,
        case(PrimitiveTag::Boolean, vec![0xff], Element::Boolean(true)),
        case(PrimitiveTag::Null, vec![], Element::Null),
        case(PrimitiveTag::PrintableString, b"Test Org".to_vec(), Element::PrintableString("Test Org".to_string())),
        case(PrimitiveTag::NumericString, b"0123 45".to_vec(), Element::NumericString("0123 45".to_string())),
        case(PrimitiveTag::IA5String, b"user@example.com".to_vec(), Element::IA5String("user@example.com".to_string())),
        case(PrimitiveTag::T61String, vec![0x63, 0xe9], Element::T61String("c\u{e9}".to_string())),
        case(PrimitiveTag::UniversalString, vec![0x00, 0x00, 0x00, 0x41], Element::UniversalString("A".to_string())),
        case(PrimitiveTag::BMPString, vec![0x5b, 0xc6, 0x78, 0x01], Element::BMPString(BMPString::new("密码").unwrap())),
        case(PrimitiveTag::Sequence, vec![0x02, 0x01, 0x07, 0x05, 0x00], Element::Sequence(vec![Element::Integer(Integer::from(7)), Element::Null])),
        case(PrimitiveTag::Set, vec![], Element::Set(vec![])),
    )]
    fn test_element_from_content(tag: PrimitiveTag, content: Vec<u8>, expected: Element) {
        let element = Element::from_content(tag, &content).unwrap();
        assert_eq!(expected, element);

        let tlv = element.encode().unwrap();
        assert_eq!(content, tlv.content());
    }

    fn nested_sequences(depth: usize) -> Vec<u8> {
        let mut bytes = vec![0x05, 0x00];
        for _ in 0..depth {
            let mut outer = vec![0x30];
            if bytes.len() >= 0x80 {
                outer.push(0x81);
            }
            outer.push(bytes.len() as u8);
            outer.extend(bytes);
            bytes = outer;
        }
        bytes
    }

    #[rstest(tag, content,
        case(PrimitiveTag::Boolean, vec![]),
        case(PrimitiveTag::Boolean, vec![0x01]),
        case(PrimitiveTag::Boolean, vec![0xff, 0x00]),
        case(PrimitiveTag::Null, vec![0x00]),
        case(PrimitiveTag::PrintableString, b"a@b".to_vec()),
        case(PrimitiveTag::NumericString, b"12a".to_vec()),
        case(PrimitiveTag::IA5String, vec![0x80]),
        case(PrimitiveTag::VisibleString, vec![0x0a]),
        case(PrimitiveTag::UTF8String, vec![0xc3, 0x28]),
        case(PrimitiveTag::BMPString, vec![0x00]),
        case(PrimitiveTag::BMPString, vec![0xd8, 0x00]),
        case(PrimitiveTag::UniversalString, vec![0x00, 0x00, 0x41]),
        case(PrimitiveTag::UTCTime, b"2019121603021".to_vec()),
        case(PrimitiveTag::UTCTime, b"19121603021Z".to_vec()),
        case(PrimitiveTag::UTCTime, b"1912160302 1Z".to_vec()),
        case(PrimitiveTag::UTCTime, b" 91216030210Z".to_vec()),
        case(PrimitiveTag::UTCTime, b"191216030210+0000".to_vec()),
        case(PrimitiveTag::GeneralizedTime, b"20191316030210Z".to_vec()),
        case(PrimitiveTag::GeneralizedTime, b"2019121603021Z".to_vec()),
        case(PrimitiveTag::GeneralizedTime, b"2019121603021 Z".to_vec()),
        case(PrimitiveTag::GeneralizedTime, b"20191216030210.Z".to_vec()),
        case(PrimitiveTag::GeneralizedTime, b"20191216030210,5Z".to_vec()),
        case(PrimitiveTag::Sequence, nested_sequences(xattr_der::MAX_DEPTH + 1)),
        case(PrimitiveTag::Sequence, vec![0x02, 0x05, 0x01]),
    )]
    fn test_element_from_content_invalid(tag: PrimitiveTag, content: Vec<u8>) {
        assert!(Element::from_content(tag, &content).is_err());
    }

    #[test]
    fn test_encode_rejects_invalid_printable_string() {
        let element = Element::PrintableString("user@example.com".to_string());
        assert!(matches!(
            element.encode(),
            Err(Error::PrintableStringInvalidEncoding)
        ));
    }

    const UTC_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    #[rstest(input, expected,
        case(b"191216030210Z".to_vec(), NaiveDateTime::parse_from_str("2019-12-16 03:02:10", UTC_TIME_FORMAT).unwrap()),
        case(b"190929163336Z".to_vec(), NaiveDateTime::parse_from_str("2019-09-29 16:33:36", UTC_TIME_FORMAT).unwrap())
    )]
    fn test_parse_utc_time(input: Vec<u8>, expected: NaiveDateTime) {
        assert_eq!(expected, parse_utc_time(&input).unwrap());
    }

    #[rstest(input, expected,
        case(b"20191216030210Z".to_vec(), NaiveDateTime::parse_from_str("2019-12-16 03:02:10", UTC_TIME_FORMAT).unwrap()),
        case(b"20190929163336.5Z".to_vec(), NaiveDateTime::parse_from_str("2019-09-29 16:33:36.5", "%Y-%m-%d %H:%M:%S%.f").unwrap())
    )]
    fn test_parse_generalized_time(input: Vec<u8>, expected: NaiveDateTime) {
        assert_eq!(expected, parse_generalized_time(&input).unwrap());
    }

    #[test]
    fn test_element_display() {
        let element = Element::Sequence(vec![
            Element::ObjectIdentifier(ObjectIdentifier::from_str("2.5.4.3").unwrap()),
            Element::UTF8String("example".to_string()),
        ]);
        assert_eq!(
            "Sequence(ObjectIdentifier(2.5.4.3), UTF8String(example))",
            element.to_string()
        );
    }
}
