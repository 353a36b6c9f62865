//! # xattr-codec
//!
//! Conversion traits shared by every layer of the xattr workspace.
//!
//! ## Overview
//!
//! An X.509 attribute travels through these representations:
//! ```text
//! Vec<u8> → Der → Tlv → Attribute
//! ```
//!
//! Each step uses the `Decoder` trait to move towards the typed model and the
//! `Encoder` trait to move back towards bytes.
//!
//! ## Type Safety
//!
//! Both traits are constrained by marker traits (`DecodableFrom` and
//! `EncodableTo`), so a conversion only exists when the pair of types has been
//! declared explicitly.
//!
//! ## Example
//!
//! ```ignore
//! use xattr_codec::decoder::Decoder;
//! use xattr_codec::encoder::Encoder;
//! use xattr_der::{Der, Tlv};
//! use xattr::Attribute;
//!
//! let der: Der = bytes.decode()?;
//! let attribute: Attribute = der.elements()[0].decode()?;
//!
//! let tlv: Tlv = attribute.encode()?;
//! let bytes: Vec<u8> = Der::new(vec![tlv]).encode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
