//! Batch compilation driven by a TOML plan.
//!
//! ```toml
//! [[compile]]
//! source = "symbols.txt"
//! target = "SymbolMono18pt7b.h"
//! factor = 1.0             # optional
//! name = "SymbolMono"      # optional, defaults to the target's file stem
//! ```
//!
//! Relative paths are resolved against the directory containing the plan.

use std::path::{Path, PathBuf};

use miette::miette;
use serde::Deserialize;

use crate::{
    error::ErrorReport,
    session::{compile, CompileOptions},
};

/// A list of compile jobs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(rename = "compile", default)]
    pub jobs: Vec<CompileJob>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One source file to compile into one header.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompileJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub factor: Option<f32>,
    pub name: Option<String>,
}

impl CompileJob {
    /// The name of the generated font.
    pub fn font_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| font_name_for_path(&self.target))
    }
}

impl Plan {
    pub fn from_toml(text: &str) -> miette::Result<Self> {
        toml::from_str(text).map_err(|e| miette!("failed to parse plan: '{}'", e))
    }

    pub fn load(path: &Path) -> miette::Result<Self> {
        let text = read_source(path)?;
        let mut plan = Self::from_toml(&text)?;
        plan.base_dir = path.parent().map(Path::to_owned).unwrap_or_default();
        Ok(plan)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Compile every job, then write the results.
    ///
    /// Nothing is written unless every job compiles.
    pub fn run(&self, defaults: &CompileOptions) -> miette::Result<()> {
        let results = self
            .jobs
            .iter()
            .map(|job| {
                let options = CompileOptions {
                    factor: job.factor.unwrap_or(defaults.factor),
                    ..defaults.clone()
                };
                compile_path(&self.resolve(&job.source), &job.font_name(), &options)
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (job, generated) in self.jobs.iter().zip(results) {
            let target = self.resolve(&job.target);
            log::info!("writing {} bytes to {}", generated.len(), target.display());
            std::fs::write(&target, generated)
                .map_err(|e| miette!("error writing '{}': {}", target.display(), e))?;
        }
        Ok(())
    }
}

/// Derive a C identifier for a font from the file it will be written to.
///
/// `fonts/SymbolMono18pt7b.h` becomes `SymbolMono18pt7b`.
pub fn font_name_for_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let mut name = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

pub(crate) fn read_source(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        let message = format!("error reading '{}': {}", path.display(), e);
        ErrorReport::message(message).into()
    })
}

/// Compile the file at `path` into GFX font source.
pub fn compile_path(
    path: &Path,
    font_name: &str,
    options: &CompileOptions,
) -> miette::Result<String> {
    let contents = read_source(path)?;
    log::debug!("compiling {} as '{font_name}'", path.display());
    compile(contents.lines(), options)
        .map(|table| crate::emit::font_source(&table, font_name))
        .map_err(|e| ErrorReport::from_error_src(&e, path, contents).into())
}
