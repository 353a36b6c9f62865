//! X.509 attribute codec and container.
//!
//! An [`Attribute`] pairs an object identifier with either one [`TypedValue`]
//! or an ordered set of them. Attributes are built from an identifier, a
//! [`TypeTag`] and raw content octets, exported to and imported from a neutral
//! [`AttributeDescription`], and encoded as DER.
//!
//! ```
//! use xattr::{Attribute, TypeTag};
//!
//! let mut attr = Attribute::create("challengePassword", TypeTag::PrintableString, "hello")?;
//! assert!(attr.is_single());
//!
//! attr.append(TypeTag::PrintableString, "world")?;
//! assert_eq!(2, attr.count());
//! assert!(!attr.is_single());
//! assert_eq!(b"world", attr.value_at(1)?.content());
//!
//! let der = attr.to_der()?;
//! assert_eq!(attr, Attribute::from_der(&der)?);
//! # Ok::<(), xattr::error::Error>(())
//! ```

#![forbid(unsafe_code)]

pub mod attribute;
pub mod collection;
pub mod description;
pub mod error;
pub mod object;
pub mod tag;
pub mod value;
pub mod value_set;

pub use attribute::Attribute;
pub use collection::AttributeCollection;
pub use description::{AttributeDescription, AttributeSpec, ValueDescription, ValueInput};
pub use object::{AsObject, Registry, Resolve, builtin_registry, resolve};
pub use tag::TypeTag;
pub use value::TypedValue;
pub use value_set::ValueSet;
pub use xattr_asn1::ObjectIdentifier;
