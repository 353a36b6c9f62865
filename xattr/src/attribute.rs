//! X.509 / PKCS#9 attribute.
//!
//! ```asn1
//! Attribute ::= SEQUENCE {
//!     type    OBJECT IDENTIFIER,
//!     values  SET OF AttributeValue
//! }
//! ```

use std::fmt;
use std::mem;

use xattr_asn1::ObjectIdentifier;
use xattr_codec::decoder::{DecodableFrom, Decoder};
use xattr_codec::encoder::{EncodableTo, Encoder};
use xattr_der::{PrimitiveTag, Tag, Tlv};

use crate::description::{AttributeDescription, AttributeSpec, ValueDescription, ValueInput};
use crate::error::{Error, Result};
use crate::object::{AsObject, Resolve, builtin_registry};
use crate::tag::TypeTag;
use crate::value::TypedValue;
use crate::value_set::ValueSet;

/// An object identifier paired with one value or a set of values.
///
/// The attribute owns every value it holds; `Clone` (and [`duplicate`]) copies
/// all content octets.
///
/// [`duplicate`]: Attribute::duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    object: ObjectIdentifier,
    values: ValueSet,
}

fn resolve_object<O: AsObject>(object: O, resolver: &dyn Resolve) -> Result<ObjectIdentifier> {
    object
        .as_object(resolver)
        .ok_or_else(|| Error::InvalidArgument("undefined object identifier".to_string()))
}

impl Attribute {
    /// Single-valued attribute from an already resolved identifier and value.
    pub fn new(object: ObjectIdentifier, value: TypedValue) -> Self {
        Attribute {
            object,
            values: ValueSet::Single(value),
        }
    }

    /// Builds a single-valued attribute, resolving `object` against the built-in
    /// registry.
    pub fn create<O: AsObject>(object: O, tag: TypeTag, content: impl Into<Vec<u8>>) -> Result<Self> {
        Attribute::create_with(object, tag, content, builtin_registry())
    }

    pub fn create_with<O: AsObject>(
        object: O,
        tag: TypeTag,
        content: impl Into<Vec<u8>>,
        resolver: &dyn Resolve,
    ) -> Result<Self> {
        let object = resolve_object(object, resolver)?;
        let value = TypedValue::new(tag, content)?;
        Ok(Attribute::new(object, value))
    }

    pub fn object(&self) -> &ObjectIdentifier {
        &self.object
    }

    /// Replaces the attribute type. The attribute is unchanged on failure.
    pub fn set_object<O: AsObject>(&mut self, object: O) -> Result<()> {
        self.set_object_with(object, builtin_registry())
    }

    pub fn set_object_with<O: AsObject>(&mut self, object: O, resolver: &dyn Resolve) -> Result<()> {
        let object = resolve_object(object, resolver)?;
        log::debug!("attribute object {} -> {}", self.object, object);
        self.object = object;
        Ok(())
    }

    /// Short name of the attribute type in the built-in registry.
    pub fn name(&self) -> Option<&'static str> {
        builtin_registry().name(&self.object)
    }

    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    pub fn is_single(&self) -> bool {
        self.values.is_single()
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypedValue> {
        self.values.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.values.get(index)
    }

    pub fn value_at(&self, index: usize) -> Result<&TypedValue> {
        self.values.get(index).ok_or(Error::OutOfRange {
            index,
            count: self.count(),
        })
    }

    /// Tag of the value at `index`, `None` when there is no such value.
    pub fn tag_at(&self, index: usize) -> Option<TypeTag> {
        self.get(index).map(TypedValue::tag)
    }

    /// Content at `index`, only when the value there has type `tag`.
    pub fn data_at(&self, index: usize, tag: TypeTag) -> Result<&[u8]> {
        let value = self.value_at(index)?;
        if value.tag() != tag {
            return Err(Error::TypeMismatch {
                declared: tag,
                actual: value.tag(),
            });
        }
        Ok(value.content())
    }

    /// Adds a value. The first append to a single-valued attribute turns it
    /// into a set holding the original value followed by `value`.
    pub fn append_value(&mut self, value: TypedValue) {
        if self.values.is_single() {
            log::debug!("attribute {}: promoting single value to set", self.object);
        }
        self.values.push(value);
    }

    pub fn append(&mut self, tag: TypeTag, content: impl Into<Vec<u8>>) -> Result<()> {
        let value = TypedValue::new(tag, content)?;
        self.append_value(value);
        Ok(())
    }

    /// Replaces the value at `index`, dropping the previous one.
    pub fn set_value_at(&mut self, index: usize, tag: TypeTag, content: impl Into<Vec<u8>>) -> Result<()> {
        let count = self.count();
        if index >= count {
            return Err(Error::OutOfRange { index, count });
        }
        let value = TypedValue::new(tag, content)?;
        let previous = mem::replace(&mut self.values.as_mut_slice()[index], value);
        log::debug!(
            "attribute {}: value {} replaced ({} -> {})",
            self.object,
            index,
            previous.tag(),
            tag
        );
        Ok(())
    }

    /// Drops every value and leaves a single-valued attribute holding the new one.
    pub fn replace_all(&mut self, tag: TypeTag, content: impl Into<Vec<u8>>) -> Result<()> {
        let value = TypedValue::new(tag, content)?;
        let previous = mem::replace(&mut self.values, ValueSet::Single(value));
        log::debug!(
            "attribute {}: replaced {} value(s) with one {}",
            self.object,
            previous.len(),
            tag
        );
        Ok(())
    }

    /// Deep copy with an independent lifetime.
    pub fn duplicate(&self) -> Attribute {
        self.clone()
    }

    pub fn to_structured(&self) -> AttributeDescription {
        self.to_structured_with(builtin_registry())
    }

    /// Exports the attribute, naming the object through `resolver`. A name is
    /// used only when it resolves back to this attribute's identifier;
    /// otherwise the dotted form is written.
    pub fn to_structured_with(&self, resolver: &dyn Resolve) -> AttributeDescription {
        let object = resolver
            .name(&self.object)
            .filter(|name| resolver.resolve(name).as_ref() == Some(&self.object))
            .map(str::to_string)
            .unwrap_or_else(|| self.object.to_string());
        let values = self
            .values
            .iter()
            .map(|v| ValueDescription::new(v.tag(), ValueInput::Bytes(v.content().to_vec())))
            .collect();
        AttributeDescription {
            object,
            single: self.values.is_single(),
            values,
        }
    }

    pub fn from_structured(desc: &AttributeDescription) -> Result<Self> {
        Attribute::from_structured_with(desc, builtin_registry())
    }

    pub fn from_structured_with(desc: &AttributeDescription, resolver: &dyn Resolve) -> Result<Self> {
        let object = resolve_object(desc.object.as_str(), resolver)?;
        let values = desc
            .values
            .iter()
            .map(ValueDescription::to_typed_value)
            .collect::<Result<Vec<_>>>()?;
        let values = if desc.single {
            let [value]: [TypedValue; 1] = values.try_into().map_err(|values: Vec<TypedValue>| {
                Error::InvalidArgument(format!(
                    "single attribute must have exactly one value, got {}",
                    values.len()
                ))
            })?;
            ValueSet::Single(value)
        } else {
            ValueSet::Multi(values)
        };
        Ok(Attribute { object, values })
    }

    pub fn from_spec(spec: &AttributeSpec) -> Result<Self> {
        Attribute::from_spec_with(spec, builtin_registry())
    }

    pub fn from_spec_with(spec: &AttributeSpec, resolver: &dyn Resolve) -> Result<Self> {
        let object = resolve_object(spec.object.as_str(), resolver)?;
        let value = ValueDescription::new(spec.tag, spec.value.clone()).to_typed_value()?;
        Ok(Attribute::new(object, value))
    }

    /// DER encoding with the values in stored order. SET OF elements are not
    /// sorted, so the output is only canonical DER for zero or one value.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let tlv: Tlv = self.encode()?;
        Ok(tlv.to_bytes())
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let tlv = Tlv::from_bytes(bytes)?;
        Decoder::<Tlv, Attribute>::decode(&tlv)
    }
}

impl<'a> IntoIterator for &'a Attribute {
    type Item = &'a TypedValue;
    type IntoIter = std::slice::Iter<'a, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({}): ", name, self.object)?,
            None => write!(f, "{}: ", self.object)?,
        }
        match &self.values {
            ValueSet::Single(value) => write!(f, "{}", value),
            ValueSet::Multi(values) => {
                let values = values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", values)
            }
        }
    }
}

impl DecodableFrom<Tlv> for Attribute {}

impl Decoder<Tlv, Attribute> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Attribute> {
        let Tag::Primitive(PrimitiveTag::Sequence, _) = self.tag() else {
            return Err(Error::InvalidStructure(
                "Attribute must be a SEQUENCE".to_string(),
            ));
        };
        let Some([object, set]) = self.tlvs() else {
            return Err(Error::InvalidStructure(
                "Attribute SEQUENCE must have 2 elements".to_string(),
            ));
        };

        // type: OBJECT IDENTIFIER
        let (Tag::Primitive(PrimitiveTag::ObjectIdentifier, _), Some(data)) =
            (object.tag(), object.data())
        else {
            return Err(Error::InvalidStructure(
                "first element of Attribute must be OBJECT IDENTIFIER".to_string(),
            ));
        };
        let object = ObjectIdentifier::try_from(data).map_err(|source| Error::InvalidEncoding {
            tag: TypeTag::ObjectIdentifier,
            source,
        })?;

        // values: SET OF ANY
        let (Tag::Primitive(PrimitiveTag::Set, _), Some(tlvs)) = (set.tag(), set.tlvs()) else {
            return Err(Error::InvalidStructure(
                "second element of Attribute must be SET".to_string(),
            ));
        };
        let values = tlvs
            .iter()
            .map(TypedValue::try_from)
            .collect::<Result<Vec<_>>>()?;

        log::debug!("decoded attribute {} with {} value(s)", object, values.len());
        Ok(Attribute {
            object,
            values: ValueSet::from_vec(values),
        })
    }
}

impl EncodableTo<Attribute> for Tlv {}

impl Encoder<Attribute, Tlv> for Attribute {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        let values = self
            .values
            .iter()
            .map(|v| v.encode())
            .collect::<Result<Vec<Tlv>>>()?;
        Ok(Tlv::new_constructed(
            PrimitiveTag::Sequence.tag(),
            vec![
                Tlv::new_primitive(
                    PrimitiveTag::ObjectIdentifier.tag(),
                    self.object.to_der_content(),
                ),
                Tlv::new_constructed(PrimitiveTag::Set.tag(), values),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::object::Registry;

    const CHALLENGE_PASSWORD: &str = "1.2.840.113549.1.9.7";

    fn oid(s: &str) -> ObjectIdentifier {
        ObjectIdentifier::from_str(s).unwrap()
    }

    #[test]
    fn test_create_and_append() {
        let mut attr = Attribute::create("1.2.3.4", TypeTag::PrintableString, "hello").unwrap();
        assert_eq!(1, attr.count());
        assert!(attr.is_single());
        assert_eq!(b"hello", attr.value_at(0).unwrap().content());

        attr.append(TypeTag::PrintableString, "world").unwrap();
        assert_eq!(2, attr.count());
        assert!(!attr.is_single());
        assert_eq!(b"hello", attr.value_at(0).unwrap().content());
        assert_eq!(b"world", attr.value_at(1).unwrap().content());
    }

    #[rstest(object,
        case(""),
        case("garbage"),
        case("1"),
        case("9.9.9"),
    )]
    fn test_create_unresolvable_object(object: &str) {
        let err = Attribute::create(object, TypeTag::PrintableString, "x").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_create_undefined_tag() {
        let err = Attribute::create("CN", TypeTag::Undefined, "x").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_create_invalid_content() {
        let err = Attribute::create("CN", TypeTag::PrintableString, "a@b").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEncoding {
                tag: TypeTag::PrintableString,
                ..
            }
        ));
    }

    #[test]
    fn test_create_with_custom_registry() {
        let mut registry = Registry::new();
        registry.register("myAttr", "My Attribute", oid("1.3.6.1.4.1.99999.7"));
        let attr =
            Attribute::create_with("myAttr", TypeTag::Utf8String, "v", &registry).unwrap();
        assert_eq!(attr.object(), &"1.3.6.1.4.1.99999.7");
        assert!(Attribute::create("myAttr", TypeTag::Utf8String, "v").is_err());
    }

    #[rstest(index, case(1), case(2), case(usize::MAX))]
    fn test_value_at_out_of_range(index: usize) {
        let attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        let err = attr.value_at(index).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { index: i, count: 1 } if i == index));
        assert_eq!(None, attr.get(index));
        assert_eq!(None, attr.tag_at(index));
    }

    #[test]
    fn test_data_at() {
        let mut attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        attr.append(TypeTag::PrintableString, "b").unwrap();

        assert_eq!(b"b", attr.data_at(1, TypeTag::PrintableString).unwrap());
        assert!(matches!(
            attr.data_at(1, TypeTag::Utf8String),
            Err(Error::TypeMismatch {
                declared: TypeTag::Utf8String,
                actual: TypeTag::PrintableString
            })
        ));
        assert!(matches!(
            attr.data_at(2, TypeTag::Utf8String),
            Err(Error::OutOfRange { index: 2, count: 2 })
        ));
        assert_eq!(Some(TypeTag::Utf8String), attr.tag_at(0));
    }

    #[test]
    fn test_set_value_at() {
        let mut attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        attr.append(TypeTag::Utf8String, "b").unwrap();

        attr.set_value_at(1, TypeTag::Ia5String, "c").unwrap();
        assert_eq!(Some(TypeTag::Ia5String), attr.tag_at(1));
        assert_eq!(b"c", attr.value_at(1).unwrap().content());
        assert_eq!(2, attr.count());
        assert!(!attr.is_single());
    }

    #[test]
    fn test_set_value_at_failure_leaves_attribute_untouched() {
        let mut attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        let before = attr.duplicate();

        assert!(matches!(
            attr.set_value_at(1, TypeTag::Utf8String, "x"),
            Err(Error::OutOfRange { index: 1, count: 1 })
        ));
        assert!(matches!(
            attr.set_value_at(0, TypeTag::Boolean, vec![0x02u8]),
            Err(Error::InvalidEncoding { .. })
        ));
        assert!(matches!(
            attr.set_value_at(0, TypeTag::Undefined, "x"),
            Err(Error::InvalidArgument(_))
        ));
        // the index is checked before the content
        assert!(matches!(
            attr.set_value_at(5, TypeTag::Boolean, vec![0x02u8]),
            Err(Error::OutOfRange { index: 5, count: 1 })
        ));
        assert_eq!(before, attr);
    }

    #[test]
    fn test_replace_all() {
        let mut attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        attr.append(TypeTag::Utf8String, "b").unwrap();
        attr.append(TypeTag::Utf8String, "c").unwrap();

        attr.replace_all(TypeTag::PrintableString, "z").unwrap();
        assert_eq!(1, attr.count());
        assert!(attr.is_single());
        assert_eq!(b"z", attr.data_at(0, TypeTag::PrintableString).unwrap());

        let before = attr.duplicate();
        assert!(attr.replace_all(TypeTag::Null, vec![0x00u8]).is_err());
        assert_eq!(before, attr);
    }

    #[test]
    fn test_set_object() {
        let mut attr = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        attr.set_object("challengePassword").unwrap();
        assert_eq!(attr.object(), &CHALLENGE_PASSWORD);

        attr.set_object(oid("2.5.4.10")).unwrap();
        assert_eq!(Some("O"), attr.name());

        let err = attr.set_object("not an oid").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(attr.object(), &"2.5.4.10");
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut source = Attribute::create("CN", TypeTag::Utf8String, "a").unwrap();
        source.append(TypeTag::Utf8String, "b").unwrap();

        let mut copy = source.duplicate();
        assert_eq!(source, copy);

        copy.set_value_at(0, TypeTag::Utf8String, "changed").unwrap();
        copy.append(TypeTag::Utf8String, "extra").unwrap();
        copy.set_object("O").unwrap();

        assert_eq!(b"a", source.value_at(0).unwrap().content());
        assert_eq!(2, source.count());
        assert_eq!(Some("CN"), source.name());
    }

    #[rstest(values,
        case(vec!["only"]),
        case(vec!["one", "two"]),
        case(vec!["first", "second", "third"]),
    )]
    fn test_structured_roundtrip(values: Vec<&str>) {
        let mut attr = Attribute::create(CHALLENGE_PASSWORD, TypeTag::PrintableString, values[0]).unwrap();
        for v in &values[1..] {
            attr.append(TypeTag::Utf8String, *v).unwrap();
        }

        let desc = attr.to_structured();
        assert_eq!("challengePassword", desc.object);
        assert_eq!(values.len() == 1, desc.single);
        assert_eq!(values.len(), desc.values.len());

        let back = Attribute::from_structured(&desc).unwrap();
        assert_eq!(attr, back);
        let contents: Vec<&[u8]> = back.iter().map(TypedValue::content).collect();
        let expected: Vec<&[u8]> = values.iter().map(|v| v.as_bytes()).collect();
        assert_eq!(expected, contents);
    }

    #[test]
    fn test_structured_roundtrip_with_custom_registry() {
        let mut registry = Registry::new();
        registry.register("CN", "Custom Name", oid("1.3.6.1.4.1.99999.1"));
        registry.register("CN", "commonName", oid("2.5.4.3"));

        // "CN" resolves to the custom identifier in this registry
        let attr = Attribute::create("2.5.4.3", TypeTag::Utf8String, "a").unwrap();
        let desc = attr.to_structured_with(&registry);
        assert_eq!("2.5.4.3", desc.object);
        assert_eq!(attr, Attribute::from_structured_with(&desc, &registry).unwrap());

        let custom = Attribute::create_with("CN", TypeTag::Utf8String, "b", &registry).unwrap();
        assert_eq!(custom.object(), &"1.3.6.1.4.1.99999.1");
        let desc = custom.to_structured_with(&registry);
        assert_eq!("CN", desc.object);
        assert_eq!(custom, Attribute::from_structured_with(&desc, &registry).unwrap());

        assert_eq!("CN", attr.to_structured().object);
    }

    #[test]
    fn test_structured_roundtrip_unnamed_object() {
        let attr = Attribute::create("1.2.3.4", TypeTag::OctetString, vec![0x00u8, 0x01]).unwrap();
        let desc = attr.to_structured();
        assert_eq!("1.2.3.4", desc.object);
        assert_eq!(attr, Attribute::from_structured(&desc).unwrap());
    }

    #[test]
    fn test_structured_multi_with_one_value_stays_multi() {
        let desc = AttributeDescription {
            object: "CN".to_string(),
            single: false,
            values: vec![ValueDescription::new(TypeTag::Utf8String, ValueInput::from("a"))],
        };
        let attr = Attribute::from_structured(&desc).unwrap();
        assert!(!attr.is_single());
        assert_eq!(1, attr.count());
        assert_eq!(desc, attr.to_structured());
    }

    #[rstest(count, case(0), case(2))]
    fn test_structured_single_needs_one_value(count: usize) {
        let desc = AttributeDescription {
            object: "CN".to_string(),
            single: true,
            values: (0..count)
                .map(|_| ValueDescription::new(TypeTag::Utf8String, ValueInput::from("a")))
                .collect(),
        };
        assert!(matches!(
            Attribute::from_structured(&desc),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_structured_type_mismatch() {
        let typed = TypedValue::new(TypeTag::Ia5String, b"a".to_vec()).unwrap();
        let desc = AttributeDescription {
            object: "CN".to_string(),
            single: true,
            values: vec![ValueDescription::new(TypeTag::Utf8String, ValueInput::Typed(typed))],
        };
        assert!(matches!(
            Attribute::from_structured(&desc),
            Err(Error::TypeMismatch {
                declared: TypeTag::Utf8String,
                actual: TypeTag::Ia5String
            })
        ));
    }

    #[test]
    fn test_structured_unresolvable_object() {
        let desc = AttributeDescription {
            object: String::new(),
            single: true,
            values: vec![ValueDescription::new(TypeTag::Utf8String, ValueInput::from("a"))],
        };
        assert!(matches!(
            Attribute::from_structured(&desc),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_structured_json() {
        let json = r#"{
            "object": "challengePassword",
            "single": true,
            "values": [{"type": "PRINTABLESTRING", "value": "secret"}]
        }"#;
        let desc: AttributeDescription = serde_json::from_str(json).unwrap();
        let attr = Attribute::from_structured(&desc).unwrap();
        assert_eq!(attr.object(), &CHALLENGE_PASSWORD);
        assert_eq!(b"secret", attr.data_at(0, TypeTag::PrintableString).unwrap());
    }

    #[rstest(spec, expected,
        case(AttributeSpec::new("CN", TypeTag::Utf8String, ValueInput::from("x")), "2.5.4.3"),
        case(AttributeSpec::new("2.5.4.6", TypeTag::PrintableString, ValueInput::Typed(TypedValue::new(TypeTag::PrintableString, b"JP".to_vec()).unwrap())), "2.5.4.6"),
    )]
    fn test_from_spec(spec: AttributeSpec, expected: &str) {
        let attr = Attribute::from_spec(&spec).unwrap();
        assert_eq!(attr.object(), &expected);
        assert!(attr.is_single());
        assert_eq!(spec.tag, attr.value_at(0).unwrap().tag());
    }

    #[test]
    fn test_from_spec_type_mismatch() {
        let typed = TypedValue::new(TypeTag::Utf8String, b"x".to_vec()).unwrap();
        let spec = AttributeSpec::new("CN", TypeTag::PrintableString, ValueInput::Typed(typed));
        assert!(matches!(
            Attribute::from_spec(&spec),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_der_single() {
        // SEQUENCE { 1.2.840.113549.1.9.7, SET { PrintableString "hello" } }
        let expected = vec![
            0x30, 0x14, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x07, 0x31,
            0x07, 0x13, 0x05, 0x68, 0x65, 0x6c, 0x6c, 0x6f,
        ];
        let attr = Attribute::create("challengePassword", TypeTag::PrintableString, "hello").unwrap();
        assert_eq!(expected, attr.to_der().unwrap());

        let decoded = Attribute::from_der(&expected).unwrap();
        assert_eq!(attr, decoded);
        assert!(decoded.is_single());
    }

    #[test]
    fn test_der_multi_keeps_order() {
        let mut attr = Attribute::create("OU", TypeTag::Utf8String, "zeta").unwrap();
        attr.append(TypeTag::PrintableString, "alpha").unwrap();
        attr.append(TypeTag::Ia5String, "mid").unwrap();

        let decoded = Attribute::from_der(&attr.to_der().unwrap()).unwrap();
        assert_eq!(attr, decoded);
        assert_eq!(Some(TypeTag::Ia5String), decoded.tag_at(2));
    }

    #[test]
    fn test_der_empty_set_is_multi() {
        let bytes = vec![0x30, 0x07, 0x06, 0x03, 0x55, 0x04, 0x03, 0x31, 0x00];
        let attr = Attribute::from_der(&bytes).unwrap();
        assert!(!attr.is_single());
        assert_eq!(0, attr.count());
        assert_eq!(bytes, attr.to_der().unwrap());
    }

    #[rstest(input,
        // not a SEQUENCE
        case(vec![0x31, 0x00]),
        // one element
        case(vec![0x30, 0x05, 0x06, 0x03, 0x55, 0x04, 0x03]),
        // values not a SET
        case(vec![0x30, 0x07, 0x06, 0x03, 0x55, 0x04, 0x03, 0x30, 0x00]),
        // type not an OID
        case(vec![0x30, 0x04, 0x05, 0x00, 0x31, 0x00]),
    )]
    fn test_der_invalid_structure(input: Vec<u8>) {
        assert!(matches!(
            Attribute::from_der(&input),
            Err(Error::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_der_unsupported_value_tag() {
        // SET { [APPLICATION 1] 00 }
        let bytes = vec![0x30, 0x0a, 0x06, 0x03, 0x55, 0x04, 0x03, 0x31, 0x03, 0x41, 0x01, 0x00];
        assert!(matches!(
            Attribute::from_der(&bytes),
            Err(Error::UnsupportedTag(0x41))
        ));
    }

    #[test]
    fn test_der_invalid_value_content() {
        // SET { BOOLEAN 01 }
        let bytes = vec![0x30, 0x0a, 0x06, 0x03, 0x55, 0x04, 0x03, 0x31, 0x03, 0x01, 0x01, 0x01];
        assert!(matches!(
            Attribute::from_der(&bytes),
            Err(Error::InvalidEncoding {
                tag: TypeTag::Boolean,
                ..
            })
        ));
    }

    #[test]
    fn test_der_truncated() {
        assert!(matches!(
            Attribute::from_der(&[0x30, 0x10, 0x06]),
            Err(Error::Der(_))
        ));
    }

    #[test]
    fn test_der_nesting_too_deep() {
        let mut bytes = vec![0x05, 0x00];
        for _ in 0..70 {
            let mut outer = vec![0x30];
            if bytes.len() >= 0x80 {
                outer.push(0x81);
            }
            outer.push(bytes.len() as u8);
            outer.extend(bytes);
            bytes = outer;
        }
        assert!(matches!(
            Attribute::from_der(&bytes),
            Err(Error::Der(xattr_der::error::Error::NestingTooDeep(_)))
        ));
    }

    #[rstest(attr, expected,
        case(Attribute::create("challengePassword", TypeTag::PrintableString, "pw").unwrap(), "challengePassword (1.2.840.113549.1.9.7): PrintableString(pw)"),
        case(Attribute::create("1.2.3.4", TypeTag::Null, Vec::<u8>::new()).unwrap(), "1.2.3.4: Null"),
    )]
    fn test_display(attr: Attribute, expected: &str) {
        assert_eq!(expected, attr.to_string());
    }

    #[test]
    fn test_display_multi() {
        let mut attr = Attribute::create("1.2.3.4", TypeTag::Integer, vec![0x01u8]).unwrap();
        attr.append(TypeTag::Boolean, vec![0xffu8]).unwrap();
        assert_eq!("1.2.3.4: {Integer(1), Boolean(true)}", attr.to_string());
    }
}
