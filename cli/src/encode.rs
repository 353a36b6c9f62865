use clap::Args;
use serde::Deserialize;
use xattr::{Attribute, AttributeCollection, AttributeDescription};

use crate::error::Result;
use crate::output::{Document, OutputFormat};
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the attribute description. If not specified, reads from stdin
    file: Option<String>,

    /// Input format
    #[arg(short = 'i', long, value_enum, default_value = "json")]
    input: InputFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value = "der")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum InputFormat {
    Json,
    Yaml,
}

/// One description encodes as an Attribute, a list as a SET OF Attribute.
#[derive(Deserialize)]
#[serde(untagged)]
enum Descriptions {
    One(AttributeDescription),
    Many(Vec<AttributeDescription>),
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = String::from_utf8(read_input(config.file.as_deref())?)?;
    let descriptions: Descriptions = match config.input {
        InputFormat::Json => serde_json::from_str(&input)?,
        InputFormat::Yaml => serde_yml::from_str(&input)?,
    };

    let document = match descriptions {
        Descriptions::One(desc) => Document::Attribute(Attribute::from_structured(&desc)?),
        Descriptions::Many(descs) => Document::Collection(
            descs
                .iter()
                .map(Attribute::from_structured)
                .collect::<xattr::error::Result<AttributeCollection>>()?,
        ),
    };
    document.write(config.output)
}
