//! OID numbering tables and renumbering.
//!
//! A numbering file (`obj_mac.num`) lists one object per line as
//! `symbol<TAB><TAB>id`. The order of lines is significant: the upstream
//! generator assigns NIDs from it, so a trimmed table must keep the original
//! relative order while compacting the identifiers to `0..n`.

use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Seed numbering handed to the generator so every whitelisted object is
/// treated as new
pub const SEED_NUMBERING: &str = "undef\t\t0";

/// A symbol and its numeric identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidEntry {
    /// Symbol name, unique within a table
    pub symbol: String,
    /// Numeric identifier
    pub id: u32,
}

impl OidEntry {
    /// Creates a new entry
    pub fn new(symbol: impl Into<String>, id: u32) -> Self {
        Self {
            symbol: symbol.into(),
            id,
        }
    }
}

/// An ordered numbering table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingTable {
    entries: Vec<OidEntry>,
}

impl NumberingTable {
    /// Creates a table from entries, keeping their order
    pub fn new(entries: Vec<OidEntry>) -> Self {
        Self { entries }
    }

    /// Parses numbering file text.
    ///
    /// Blank lines are skipped and only the leading symbol of a line is
    /// required. The id is the second token when it is a decimal number,
    /// otherwise the entry's position in the table.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                tokens.next().map(|symbol| (symbol, tokens.next()))
            })
            .zip(0u32..)
            .map(|((symbol, id), position)| {
                let id = id.and_then(|t| t.parse::<u32>().ok()).unwrap_or(position);
                OidEntry::new(symbol, id)
            })
            .collect();

        Self { entries }
    }

    /// Extracts only the leading symbol of every non-blank line
    pub fn symbols(text: &str) -> Vec<&str> {
        text.lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect()
    }

    /// Entries in table order
    pub fn entries(&self) -> &[OidEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the symbols in table order
    pub fn iter_symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.symbol.as_str())
    }
}

impl fmt::Display for NumberingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}\t\t{}", entry.symbol, entry.id)?;
        }
        Ok(())
    }
}

/// Keeps the entries of `full` whose symbol is among `candidates` and
/// renumbers them from 0 in their original order.
///
/// Candidates that do not appear in `full` are dropped without error.
pub fn renumber<'a, I>(full: &NumberingTable, candidates: I) -> NumberingTable
where
    I: IntoIterator<Item = &'a str>,
{
    let wanted: HashSet<&str> = candidates.into_iter().collect();

    let entries: Vec<OidEntry> = full
        .entries
        .iter()
        .filter(|e| wanted.contains(e.symbol.as_str()))
        .zip(0u32..)
        .map(|(e, id)| OidEntry::new(e.symbol.clone(), id))
        .collect();

    debug!(
        "Renumbered {} of {} objects ({} candidates)",
        entries.len(),
        full.len(),
        wanted.len()
    );

    NumberingTable { entries }
}
