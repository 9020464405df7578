//! End-to-end trimming and regeneration run.
//!
//! Steps run strictly in order, each consuming the previous step's output:
//!
//! 1. Reset the scratch area and seed an empty numbering
//! 2. Number the whitelisted objects, then renumber them against the full
//!    upstream numbering so relative order is kept and ids are compact
//! 3. Generate the symbol header, then the lookup table from it
//! 4. Append the compat aliases to the header
//! 5. Backfill placeholders for every object the trimmed header lost
//! 6. Publish the normalized lookup table and header
//! 7. Remove the scratch area and copy `obj_dat.c` verbatim
//!
//! The first failing step aborts the run.

use crate::backfill::backfill;
use crate::compat::append_compat;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::invoker::Invoker;
use crate::layout::{Layout, ScratchFiles};
use crate::materialize::{copy_verbatim, materialize};
use crate::numbering::{renumber, NumberingTable, SEED_NUMBERING};
use crate::scratch::ScratchDir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Kind of file published by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// `obj_dat.h` binary-search lookup table
    LookupTable,
    /// `obj_mac.h` symbol header with placeholders
    SymbolHeader,
    /// Upstream `obj_dat.c`, copied unchanged
    ObjDatSource,
}

impl ArtifactKind {
    /// Returns the string identifier for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::LookupTable => "lookup_table",
            ArtifactKind::SymbolHeader => "symbol_header",
            ArtifactKind::ObjDatSource => "obj_dat_source",
        }
    }
}

/// A file published into the destination tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// What the file is
    pub kind: ArtifactKind,
    /// Where it was written
    pub path: PathBuf,
}

/// Summary of a successful run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Published files, in publication order
    pub artifacts: Vec<Artifact>,
    /// Objects kept in the trimmed table
    pub retained: usize,
    /// Objects in the full upstream table
    pub upstream: usize,
    /// Symbols backfilled with placeholders
    pub missing: Vec<String>,
}

/// Trims and regenerates the object tables described by a [`Layout`]
pub struct Pipeline<I> {
    layout: Layout,
    generator: Generator<I>,
}

impl<I: Invoker> Pipeline<I> {
    /// Creates a pipeline that runs generator scripts through `invoker`
    pub fn new(layout: Layout, invoker: I) -> Self {
        let generator = Generator::from_layout(&layout, invoker);
        Self { layout, generator }
    }

    /// Runs every step, stopping at the first error
    pub fn run(&self) -> Result<RunReport> {
        let layout = &self.layout;
        let mut report = RunReport::default();

        let scratch = ScratchDir::reset(layout.scratch_dir())?;
        let files = ScratchFiles::in_dir(scratch.path());
        write_file(&files.seed, SEED_NUMBERING)?;

        let trimmed = self.trim_numbering(&files, &mut report)?;
        info!(
            "Trimmed table keeps {} of {} objects",
            trimmed.len(),
            report.upstream
        );

        self.generator
            .header(&layout.whitelist(), &files.numbering, &files.header)?;
        self.generator
            .lookup_table(&files.header, &files.lookup_table)?;

        append_compat(&files.header, &layout.compat_header())?;

        let full_header = read_file(&layout.full_header())?;
        let trimmed_header = read_file(&files.header)?;
        let backfilled = backfill(&full_header, &trimmed_header);
        write_file(&files.final_header, &backfilled.text)?;
        info!("Backfilled {} removed symbols", backfilled.missing.len());
        report.missing = backfilled.missing;

        self.publish(
            &files.lookup_table,
            layout.dest_lookup_table(),
            ArtifactKind::LookupTable,
            &mut report,
        )?;
        self.publish(
            &files.final_header,
            layout.dest_symbol_header(),
            ArtifactKind::SymbolHeader,
            &mut report,
        )?;

        scratch.close()?;

        let dest = layout.dest_obj_dat_source();
        copy_verbatim(&layout.obj_dat_source(), &dest)?;
        report.artifacts.push(Artifact {
            kind: ArtifactKind::ObjDatSource,
            path: dest,
        });

        Ok(report)
    }

    fn trim_numbering(
        &self,
        files: &ScratchFiles,
        report: &mut RunReport,
    ) -> Result<NumberingTable> {
        self.generator
            .candidates(&self.layout.whitelist(), &files.seed, &files.numbering)?;

        let full = NumberingTable::parse(&read_file(&self.layout.full_numbering())?);
        let candidates = read_file(&files.numbering)?;
        let trimmed = renumber(&full, NumberingTable::symbols(&candidates));

        report.upstream = full.len();
        report.retained = trimmed.len();

        write_file(&files.numbering, &trimmed.to_string())?;
        Ok(trimmed)
    }

    fn publish(
        &self,
        src: &Path,
        dest: PathBuf,
        kind: ArtifactKind,
        report: &mut RunReport,
    ) -> Result<()> {
        materialize(src, &dest)?;
        debug!("Published {} to {}", kind.as_str(), dest.display());
        report.artifacts.push(Artifact { kind, path: dest });
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_kind_as_str() {
        assert_eq!(ArtifactKind::LookupTable.as_str(), "lookup_table");
        assert_eq!(ArtifactKind::SymbolHeader.as_str(), "symbol_header");
        assert_eq!(ArtifactKind::ObjDatSource.as_str(), "obj_dat_source");
    }
}
