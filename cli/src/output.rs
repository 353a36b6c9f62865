use std::fmt::Write as _;
use std::io::{self, Write};

use xattr::{Attribute, AttributeCollection, AttributeDescription};

use crate::error::Result;
use crate::utils::format_hex_dump;

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text format (OpenSSL-like)
    Text,
    /// Structured description as JSON
    Json,
    /// Structured description as YAML
    Yaml,
    /// Binary DER
    Der,
    /// DER as a hex string
    Hex,
}

/// What a command produced: one attribute or a set of them.
pub(crate) enum Document {
    Attribute(Attribute),
    Collection(AttributeCollection),
}

impl Document {
    fn to_der(&self) -> Result<Vec<u8>> {
        let der = match self {
            Document::Attribute(attribute) => attribute.to_der()?,
            Document::Collection(collection) => collection.to_der()?,
        };
        Ok(der)
    }

    fn descriptions(&self) -> Vec<AttributeDescription> {
        match self {
            Document::Attribute(attribute) => vec![attribute.to_structured()],
            Document::Collection(collection) => {
                collection.iter().map(Attribute::to_structured).collect()
            }
        }
    }

    fn to_text(&self) -> Result<String> {
        let mut text = String::new();
        match self {
            Document::Attribute(attribute) => write_attribute(&mut text, attribute, "")?,
            Document::Collection(collection) => {
                writeln!(text, "Attributes ({}):", collection.len())?;
                for attribute in collection {
                    write_attribute(&mut text, attribute, "    ")?;
                }
            }
        }
        writeln!(text, "DER:")?;
        for line in format_hex_dump(&self.to_der()?).lines() {
            writeln!(text, "    {}", line)?;
        }
        Ok(text)
    }

    pub(crate) fn write(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => print!("{}", self.to_text()?),
            OutputFormat::Json => {
                let json = match self {
                    Document::Attribute(attribute) => {
                        serde_json::to_string_pretty(&attribute.to_structured())?
                    }
                    Document::Collection(_) => serde_json::to_string_pretty(&self.descriptions())?,
                };
                println!("{json}");
            }
            OutputFormat::Yaml => {
                let yaml = match self {
                    Document::Attribute(attribute) => serde_yml::to_string(&attribute.to_structured())?,
                    Document::Collection(_) => serde_yml::to_string(&self.descriptions())?,
                };
                print!("{yaml}");
            }
            OutputFormat::Der => io::stdout().write_all(&self.to_der()?)?,
            OutputFormat::Hex => {
                let hex: String = self.to_der()?.iter().map(|b| format!("{:02x}", b)).collect();
                println!("{hex}");
            }
        }
        Ok(())
    }
}

fn write_attribute(text: &mut String, attribute: &Attribute, indent: &str) -> Result<()> {
    writeln!(text, "{indent}Attribute:")?;
    match attribute.name() {
        Some(name) => writeln!(text, "{indent}    Object: {} ({})", name, attribute.object())?,
        None => writeln!(text, "{indent}    Object: {}", attribute.object())?,
    }
    writeln!(text, "{indent}    Single: {}", attribute.is_single())?;
    writeln!(text, "{indent}    Values ({}):", attribute.count())?;
    for (i, value) in attribute.iter().enumerate() {
        writeln!(text, "{indent}        [{}] {}: {}", i, value.tag(), value)?;
    }
    Ok(())
}
