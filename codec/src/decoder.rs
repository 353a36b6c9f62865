//! Decoder trait for type-safe conversions.
//!
//! `Decoder<T, D>` converts a source `T` into a destination `D`. The
//! destination must opt in through the `DecodableFrom<T>` marker, which keeps
//! the set of legal conversions closed at compile time.
//!
//! # Implementation Guide
//!
//! ```no_run
//! use xattr_codec::decoder::{Decoder, DecodableFrom};
//!
//! struct Content(Vec<u8>);
//! struct Text(String);
//!
//! #[derive(Debug)]
//! struct TextError;
//!
//! impl DecodableFrom<Content> for Text {}
//!
//! impl Decoder<Content, Text> for Content {
//!     type Error = TextError;
//!
//!     fn decode(&self) -> Result<Text, Self::Error> {
//!         String::from_utf8(self.0.clone()).map(Text).map_err(|_| TextError)
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
///
/// # Type Parameters
///
/// * `T` - The source type (usually `Self`)
/// * `D` - The destination type that can be decoded from `T`
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not a valid representation of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It carries no methods. Implement it for every destination type that has a
/// matching `Decoder` implementation on the source type.
pub trait DecodableFrom<T> {}
