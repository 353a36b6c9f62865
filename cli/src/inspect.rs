use clap::Args;
use xattr::{Attribute, AttributeCollection};

use crate::error::Result;
use crate::output::{Document, OutputFormat};
use crate::utils::read_der;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the DER file. If not specified, reads from stdin
    file: Option<String>,

    /// Input is hex text instead of binary DER
    #[arg(long)]
    hex: bool,

    /// Input is a SET OF Attribute (or its [n] IMPLICIT form)
    #[arg(long)]
    set: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let der = read_der(config.file.as_deref(), config.hex)?;
    log::debug!("read {} byte(s) of DER", der.len());

    let document = if config.set {
        Document::Collection(AttributeCollection::from_der(&der)?)
    } else {
        Document::Attribute(Attribute::from_der(&der)?)
    };
    document.write(config.output)
}
