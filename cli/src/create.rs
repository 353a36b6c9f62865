use clap::Args;
use xattr::{Attribute, TypeTag};

use crate::error::{Error, Result};
use crate::output::{Document, OutputFormat};
use crate::utils::parse_hex;

#[derive(Args)]
pub(crate) struct Config {
    /// Attribute type: short name, long name or dotted OID (e.g. challengePassword, 2.5.4.3)
    #[arg(long)]
    object: String,

    /// Value type (e.g. PRINTABLESTRING, utf8, ia5, octet, or a tag number)
    #[arg(short = 't', long = "type")]
    tag: TypeTag,

    /// Value content. Repeat to build a multi-valued attribute
    #[arg(long = "value", required = true)]
    values: Vec<String>,

    /// Read values as hex instead of text
    #[arg(long)]
    hex: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let mut contents = config
        .values
        .iter()
        .map(|v| {
            if config.hex {
                parse_hex(v)
            } else {
                Ok(v.as_bytes().to_vec())
            }
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let first = contents
        .next()
        .ok_or_else(|| Error::InvalidInput("at least one --value is required".to_string()))?;
    let mut attribute = Attribute::create(config.object.as_str(), config.tag, first)?;
    for content in contents {
        attribute.append(config.tag, content)?;
    }
    log::debug!("created {}", attribute);

    Document::Attribute(attribute).write(config.output)
}
