//! Input and output locations for a regeneration run.
//!
//! All paths are resolved against a root directory (the stub directory that
//! holds `objects.txt`). Upstream paths are further resolved against the
//! upstream OpenSSL checkout, which defaults to `../openssl` from the root.

use std::path::{Path, PathBuf};

/// Default interpreter for the upstream generator scripts
pub const DEFAULT_INTERPRETER: &str = "perl";

/// Default upstream checkout, relative to the root
pub const DEFAULT_UPSTREAM: &str = "../openssl";

/// Default scratch directory, relative to the root
pub const DEFAULT_SCRATCH: &str = "tempobj";

/// Marker line closing the `obj_mac.h` include guard
pub const GUARD_CLOSE: &str = "#endif /* OPENSSL_OBJ_MAC_H */";

/// Where a regeneration run reads from and writes to
#[derive(Debug, Clone)]
pub struct Layout {
    /// Directory holding the whitelist and receiving the outputs
    pub root: PathBuf,
    /// Upstream OpenSSL checkout (relative paths resolve against `root`)
    pub upstream: PathBuf,
    /// Scratch directory (relative paths resolve against `root`)
    pub scratch: PathBuf,
    /// Interpreter used to run the generator scripts
    pub interpreter: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            upstream: PathBuf::from(DEFAULT_UPSTREAM),
            scratch: PathBuf::from(DEFAULT_SCRATCH),
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

impl Layout {
    /// Creates a layout rooted at `root` with default upstream and scratch paths
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Sets the upstream checkout
    pub fn upstream(mut self, upstream: impl Into<PathBuf>) -> Self {
        self.upstream = upstream.into();
        self
    }

    /// Sets the scratch directory
    pub fn scratch(mut self, scratch: impl Into<PathBuf>) -> Self {
        self.scratch = scratch.into();
        self
    }

    /// Sets the script interpreter
    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    fn upstream_dir(&self) -> PathBuf {
        self.root.join(&self.upstream)
    }

    fn upstream_objects(&self, name: &str) -> PathBuf {
        self.upstream_dir().join("crypto").join("objects").join(name)
    }

    /// Whitelist object definitions (`objects.txt`)
    pub fn whitelist(&self) -> PathBuf {
        self.root.join("objects.txt")
    }

    /// Full upstream numbering (`obj_mac.num`)
    pub fn full_numbering(&self) -> PathBuf {
        self.upstream_objects("obj_mac.num")
    }

    /// Full upstream header (`include/openssl/obj_mac.h`)
    pub fn full_header(&self) -> PathBuf {
        self.upstream_dir()
            .join("include")
            .join("openssl")
            .join("obj_mac.h")
    }

    /// Compatibility definitions (`obj_compat.h`)
    pub fn compat_header(&self) -> PathBuf {
        self.upstream_objects("obj_compat.h")
    }

    /// Header/numbering generator script
    pub fn objects_script(&self) -> PathBuf {
        self.upstream_objects("objects.pl")
    }

    /// Lookup table generator script
    pub fn obj_dat_script(&self) -> PathBuf {
        self.upstream_objects("obj_dat.pl")
    }

    /// Upstream object table source, copied verbatim
    pub fn obj_dat_source(&self) -> PathBuf {
        self.upstream_objects("obj_dat.c")
    }

    /// Scratch directory
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(&self.scratch)
    }

    /// Published lookup table
    pub fn dest_lookup_table(&self) -> PathBuf {
        self.root.join("crypto").join("objects").join("obj_dat.h")
    }

    /// Published symbol header
    pub fn dest_symbol_header(&self) -> PathBuf {
        self.root.join("openssl").join("obj_mac.h")
    }

    /// Published copy of the object table source
    pub fn dest_obj_dat_source(&self) -> PathBuf {
        self.root.join("crypto").join("objects").join("obj_dat.c")
    }
}

/// File names used inside the scratch directory
#[derive(Debug, Clone)]
pub struct ScratchFiles {
    /// Empty seed numbering
    pub seed: PathBuf,
    /// Candidate numbering, later overwritten with the trimmed table
    pub numbering: PathBuf,
    /// Generated header before backfill
    pub header: PathBuf,
    /// Generated lookup table
    pub lookup_table: PathBuf,
    /// Header after backfill
    pub final_header: PathBuf,
}

impl ScratchFiles {
    /// Names the scratch files under `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            seed: dir.join("obj_mac.num"),
            numbering: dir.join("obj_mac.new"),
            header: dir.join("obj_mac.h.new"),
            lookup_table: dir.join("obj_dat.h"),
            final_header: dir.join("obj_mac.h"),
        }
    }
}
