//! Generate command - render one barcode image

use crate::context::Context;
use crate::output::{print_diagnostics, print_text};
use anyhow::{Result, bail};
use eduplus_barcode::Barcode;
use std::path::PathBuf;

pub struct GenerateArgs {
    pub text: String,
    pub output: PathBuf,
    pub barcode_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub base64: bool,
}

/// Execute `eduplus-barcode generate`
pub fn run(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let job = ctx.job();
    let barcode_type = args.barcode_type.as_deref().unwrap_or(job.barcode_type.as_str());

    let mut barcode = Barcode::with_resolver(ctx.resolver())
        .text(args.text)
        .output(&args.output)
        .barcode_type(barcode_type)
        .width(args.width.unwrap_or(job.width))
        .height(args.height.unwrap_or(job.height))
        .timeout(ctx.generate_timeout());

    let succeeded = if args.base64 {
        match barcode.generate_base64() {
            Some(encoded) => {
                print_text(&encoded)?;
                true
            }
            None => false,
        }
    } else {
        let ok = barcode.generate();
        if ok {
            print_text(&format!("✓ Barcode written to {}", args.output.display()))?;
        }
        ok
    };

    if !succeeded {
        print_diagnostics(&barcode.error_messages())?;
        bail!("Barcode generation failed");
    }

    Ok(())
}
