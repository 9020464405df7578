//! Drives the upstream table generator scripts.
//!
//! `objects.pl` turns an object definition file plus a numbering file into
//! either a numbering (`-n`) or the `obj_mac.h` symbol header; `obj_dat.pl`
//! turns that header into the `obj_dat.h` binary-search lookup table. Both
//! are run through an interpreter via an [`Invoker`].

use crate::error::Result;
use crate::invoker::{Invocation, InvocationOutput, Invoker};
use crate::layout::Layout;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Flag asking `objects.pl` for a numbering instead of a header
pub const NUMBERING_FLAG: &str = "-n";

/// Which artifact a generator run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Numbering for the whitelisted objects
    Numbering,
    /// `obj_mac.h` symbol header
    Header,
    /// `obj_dat.h` lookup table
    LookupTable,
}

impl GenerationMode {
    /// Returns the string identifier for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Numbering => "numbering",
            GenerationMode::Header => "header",
            GenerationMode::LookupTable => "lookup_table",
        }
    }
}

/// Runs the generator scripts with a fixed interpreter and script pair
#[derive(Debug, Clone)]
pub struct Generator<I> {
    interpreter: String,
    objects_script: PathBuf,
    obj_dat_script: PathBuf,
    invoker: I,
}

impl<I: Invoker> Generator<I> {
    /// Creates a generator from explicit script paths
    pub fn new(
        interpreter: impl Into<String>,
        objects_script: impl Into<PathBuf>,
        obj_dat_script: impl Into<PathBuf>,
        invoker: I,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            objects_script: objects_script.into(),
            obj_dat_script: obj_dat_script.into(),
            invoker,
        }
    }

    /// Creates a generator using the scripts named by `layout`
    pub fn from_layout(layout: &Layout, invoker: I) -> Self {
        Self::new(
            layout.interpreter.clone(),
            layout.objects_script(),
            layout.obj_dat_script(),
            invoker,
        )
    }

    /// Builds the invocation for `mode` without running it
    pub fn invocation(&self, mode: GenerationMode, inputs: &[&Path], out: &Path) -> Invocation {
        let mut inv = Invocation::new(&self.interpreter, out);
        inv = match mode {
            GenerationMode::Numbering => inv.arg(&self.objects_script).arg(NUMBERING_FLAG),
            GenerationMode::Header => inv.arg(&self.objects_script),
            GenerationMode::LookupTable => inv.arg(&self.obj_dat_script),
        };
        inputs.iter().fold(inv, |inv, input| inv.arg(*input))
    }

    fn run(&self, mode: GenerationMode, inputs: &[&Path], out: &Path) -> Result<InvocationOutput> {
        let inv = self.invocation(mode, inputs, out);
        let output = self.invoker.invoke(&inv)?;
        if !output.stderr.trim().is_empty() {
            warn!("{} generator: {}", mode.as_str(), output.stderr.trim_end());
        }
        info!("Generated {} -> {}", mode.as_str(), out.display());
        Ok(output)
    }

    /// Numbers the whitelisted objects against `seed`, writing to `out`
    pub fn candidates(
        &self,
        objects: &Path,
        seed: &Path,
        out: &Path,
    ) -> Result<InvocationOutput> {
        self.run(GenerationMode::Numbering, &[objects, seed], out)
    }

    /// Generates the symbol header from `numbering`, writing to `out`
    pub fn header(
        &self,
        objects: &Path,
        numbering: &Path,
        out: &Path,
    ) -> Result<InvocationOutput> {
        self.run(GenerationMode::Header, &[objects, numbering], out)
    }

    /// Generates the lookup table from a finished `header`, writing to `out`
    pub fn lookup_table(&self, header: &Path, out: &Path) -> Result<InvocationOutput> {
        self.run(GenerationMode::LookupTable, &[header], out)
    }
}
