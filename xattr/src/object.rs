//! Resolution of attribute type names to object identifiers.
//!
//! The attribute core never owns names. It asks a [`Resolve`] implementation,
//! by default the built-in [`Registry`].

use std::str::FromStr;
use std::sync::OnceLock;

use xattr_asn1::ObjectIdentifier;

/// Maps names and dotted numbers to object identifiers and back.
pub trait Resolve {
    /// `None` means the identifier is undefined.
    fn resolve(&self, name_or_number: &str) -> Option<ObjectIdentifier>;

    fn name(&self, oid: &ObjectIdentifier) -> Option<&str>;
}

#[derive(Debug, Clone)]
struct Entry {
    short_name: String,
    long_name: String,
    oid: ObjectIdentifier,
}

/// Table of short/long names.
///
/// Names are matched exactly (case sensitive). A well-formed dotted OID always
/// resolves, whether or not it is registered.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

/// PKCS#9 attribute types and the X.520 naming attributes.
const BUILTIN: &[(&str, &str, &str)] = &[
    ("emailAddress", "emailAddress", "1.2.840.113549.1.9.1"),
    ("unstructuredName", "unstructuredName", "1.2.840.113549.1.9.2"),
    ("contentType", "contentType", "1.2.840.113549.1.9.3"),
    ("messageDigest", "messageDigest", "1.2.840.113549.1.9.4"),
    ("signingTime", "signingTime", "1.2.840.113549.1.9.5"),
    ("countersignature", "countersignature", "1.2.840.113549.1.9.6"),
    ("challengePassword", "challengePassword", "1.2.840.113549.1.9.7"),
    ("unstructuredAddress", "unstructuredAddress", "1.2.840.113549.1.9.8"),
    ("extReq", "Extension Request", "1.2.840.113549.1.9.14"),
    ("SMIME-CAPS", "S/MIME Capabilities", "1.2.840.113549.1.9.15"),
    ("friendlyName", "friendlyName", "1.2.840.113549.1.9.20"),
    ("localKeyID", "localKeyID", "1.2.840.113549.1.9.21"),
    ("msExtReq", "Microsoft Extension Request", "1.3.6.1.4.1.311.2.1.14"),
    ("CN", "commonName", "2.5.4.3"),
    ("SN", "surname", "2.5.4.4"),
    ("serialNumber", "serialNumber", "2.5.4.5"),
    ("C", "countryName", "2.5.4.6"),
    ("L", "localityName", "2.5.4.7"),
    ("ST", "stateOrProvinceName", "2.5.4.8"),
    ("O", "organizationName", "2.5.4.10"),
    ("OU", "organizationalUnitName", "2.5.4.11"),
    ("title", "title", "2.5.4.12"),
    ("GN", "givenName", "2.5.4.42"),
    ("DC", "domainComponent", "0.9.2342.19200300.100.1.25"),
];

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        for (short_name, long_name, oid) in BUILTIN {
            // the table is static, a bad entry would only drop that name
            if let Ok(oid) = ObjectIdentifier::from_str(oid) {
                registry.register(short_name, long_name, oid);
            }
        }
        registry
    }

    /// Adds a name. Later registrations do not shadow earlier ones.
    pub fn register(&mut self, short_name: &str, long_name: &str, oid: ObjectIdentifier) {
        log::trace!("register {} ({}) as {}", short_name, long_name, oid);
        self.entries.push(Entry {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
            oid,
        });
    }

    pub fn long_name(&self, oid: &ObjectIdentifier) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.oid == oid)
            .map(|e| e.long_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Resolve for Registry {
    fn resolve(&self, name_or_number: &str) -> Option<ObjectIdentifier> {
        self.entries
            .iter()
            .find(|e| e.short_name == name_or_number || e.long_name == name_or_number)
            .map(|e| e.oid.clone())
            .or_else(|| ObjectIdentifier::from_str(name_or_number).ok())
    }

    fn name(&self, oid: &ObjectIdentifier) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.oid == oid)
            .map(|e| e.short_name.as_str())
    }
}

/// The shared built-in registry.
pub fn builtin_registry() -> &'static Registry {
    static BUILTIN_REGISTRY: OnceLock<Registry> = OnceLock::new();
    BUILTIN_REGISTRY.get_or_init(Registry::builtin)
}

/// Resolves against the built-in registry.
pub fn resolve(name_or_number: &str) -> Option<ObjectIdentifier> {
    builtin_registry().resolve(name_or_number)
}

/// Anything that can name an attribute type.
pub trait AsObject {
    fn as_object(&self, resolver: &dyn Resolve) -> Option<ObjectIdentifier>;
}

impl AsObject for ObjectIdentifier {
    fn as_object(&self, _resolver: &dyn Resolve) -> Option<ObjectIdentifier> {
        Some(self.clone())
    }
}

impl AsObject for str {
    fn as_object(&self, resolver: &dyn Resolve) -> Option<ObjectIdentifier> {
        resolver.resolve(self)
    }
}

impl AsObject for String {
    fn as_object(&self, resolver: &dyn Resolve) -> Option<ObjectIdentifier> {
        resolver.resolve(self)
    }
}

impl<T: AsObject + ?Sized> AsObject for &T {
    fn as_object(&self, resolver: &dyn Resolve) -> Option<ObjectIdentifier> {
        (**self).as_object(resolver)
    }
}
