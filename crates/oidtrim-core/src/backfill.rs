//! Placeholder definitions for objects removed by trimming.
//!
//! Code outside the trimmed build may still name objects that are no longer
//! in the table. Every `NID_` macro defined by the full upstream header but
//! missing from the trimmed one is redefined as `NID_undef`, together with its
//! `SN_` counterpart as `SN_undef`, so such code keeps compiling.
//!
//! ## Algorithm
//!
//! 1. Collect `NID_` macro names from `#define` lines of both headers
//! 2. Keep the full header's names that the trimmed header lacks, in the
//!    full header's order
//! 3. Insert two placeholder lines per name just before the include guard's
//!    closing `#endif`

use crate::layout::GUARD_CLOSE;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Prefix of long-form object macros
pub const NID_PREFIX: &str = "NID_";

/// Prefix of short-name macros
pub const SN_PREFIX: &str = "SN_";

/// Long-form sentinel for an undefined object
pub const NID_UNDEF: &str = "NID_undef";

/// Short-name sentinel for an undefined object
pub const SN_UNDEF: &str = "SN_undef";

/// Padding between a placeholder macro name and its value
const PLACEHOLDER_GAP: &str = "                ";

/// Returns the macro name defined on `line`, if it is a `#define` line.
///
/// Accepts leading whitespace and whitespace between `#` and `define`.
fn defined_macro(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('#')?;
    let rest = rest.trim_start().strip_prefix("define")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    rest.split_whitespace().next()
}

/// `NID_` macro names defined in `text`, in order of appearance.
///
/// Repeated definitions are reported each time they occur.
pub fn defined_symbols(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(defined_macro)
        .filter(|name| name.starts_with(NID_PREFIX))
        .collect()
}

/// `NID_` names defined in `full` but not in `trimmed`.
///
/// The result follows `full`'s order, has no duplicates, and never contains
/// the [`NID_UNDEF`] sentinel itself.
pub fn missing_symbols<'a>(full: &'a str, trimmed: &str) -> Vec<&'a str> {
    let present: HashSet<&str> = defined_symbols(trimmed).into_iter().collect();
    let mut seen = HashSet::new();

    defined_symbols(full)
        .into_iter()
        .filter(|name| *name != NID_UNDEF && !present.contains(name))
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Short-name macro corresponding to a `NID_` macro
pub fn short_name(nid: &str) -> String {
    match nid.strip_prefix(NID_PREFIX) {
        Some(base) => format!("{SN_PREFIX}{base}"),
        None => nid.to_string(),
    }
}

/// Placeholder lines for `missing`, two per symbol, each ending in `\n`
pub fn placeholder_block<S: AsRef<str>>(missing: &[S]) -> String {
    let mut block = String::new();
    for nid in missing {
        let nid = nid.as_ref();
        block.push_str(&format!("#define {nid}{PLACEHOLDER_GAP}{NID_UNDEF}\n"));
        block.push_str(&format!(
            "#define {}{PLACEHOLDER_GAP}{SN_UNDEF}\n",
            short_name(nid)
        ));
    }
    block
}

/// Inserts `block` before the first line containing the guard close.
///
/// Without a guard line the text is returned unchanged and the block is
/// dropped.
pub fn inject(text: &str, block: &str) -> String {
    let mut out = String::with_capacity(text.len() + block.len());
    let mut injected = block.is_empty();

    for line in text.split_inclusive('\n') {
        if !injected && line.contains(GUARD_CLOSE) {
            out.push_str(block);
            injected = true;
        }
        out.push_str(line);
    }

    if !injected {
        warn!("Include guard close not found; placeholders not written");
    }
    out
}

/// Result of backfilling a trimmed header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backfill {
    /// Header text with placeholders in place
    pub text: String,
    /// Symbols missing from the trimmed header, in order
    pub missing: Vec<String>,
}

/// Backfills `trimmed` with placeholders for everything `full` defines
pub fn backfill(full: &str, trimmed: &str) -> Backfill {
    let missing = missing_symbols(full, trimmed);
    debug!("{} symbols need placeholders", missing.len());

    let text = inject(trimmed, &placeholder_block(&missing));
    Backfill {
        text,
        missing: missing.into_iter().map(str::to_string).collect(),
    }
}
