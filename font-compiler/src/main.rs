//! Command line font compiler.
//!
//! Reads a glyph source file and writes a GFX font header, or runs every job
//! in a TOML plan.

use std::path::PathBuf;

use clap::Parser;
use font_compiler::{
    plan::{self, Plan},
    CompileOptions, DEFAULT_FACTOR,
};
use miette::miette;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The glyph source file.
    #[arg(required_unless_present = "plan")]
    input: Option<PathBuf>,

    /// The header to write; '-' writes to stdout.
    #[arg(required_unless_present = "plan")]
    output: Option<PathBuf>,

    /// Scale factor applied to every glyph (1.0 disables scaling)
    #[arg(short, long, default_value_t = DEFAULT_FACTOR)]
    factor: f32,

    /// Name of the generated font. Defaults to the output file's stem.
    #[arg(short, long)]
    name: Option<String>,

    /// Run the jobs in a TOML plan file instead of a single compile.
    #[arg(long, conflicts_with_all = ["input", "output", "name"])]
    plan: Option<PathBuf>,
}

fn main() -> miette::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = CompileOptions::with_factor(args.factor);

    if let Some(path) = &args.plan {
        return Plan::load(path)?.run(&options);
    }

    let (Some(input), Some(output)) = (&args.input, &args.output) else {
        return Err(miette!("an input and an output path are required"));
    };
    let to_stdout = output.as_os_str() == "-";
    let font_name = match &args.name {
        Some(name) => name.clone(),
        None if to_stdout => plan::font_name_for_path(input),
        None => plan::font_name_for_path(output),
    };

    let generated = plan::compile_path(input, &font_name, &options)?;
    if to_stdout {
        print!("{generated}");
    } else {
        log::info!("writing {} bytes to {}", generated.len(), output.display());
        std::fs::write(output, generated)
            .map_err(|e| miette!("error writing '{}': {}", output.display(), e))?;
    }
    Ok(())
}
