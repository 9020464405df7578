//! Appends `obj_compat.h` aliases to the generated symbol header.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Returns true for lines that belong to a C block comment banner
fn is_comment_line(line: &str) -> bool {
    line.starts_with("/*") || line.starts_with(" *")
}

/// Appends the non-comment lines of `compat` to `header`, in order.
///
/// Lines are matched literally from column 0; anything that is not a comment
/// opener or continuation line is copied, blank lines included.
pub fn merge_compat(header: &str, compat: &str) -> String {
    let mut merged = String::with_capacity(header.len() + compat.len());
    merged.push_str(header);
    if !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }

    for line in compat.split_inclusive('\n') {
        if !is_comment_line(line) {
            merged.push_str(line);
        }
    }
    merged
}

/// Merges `compat_path` into the header at `header_path`, in place
pub fn append_compat(header_path: &Path, compat_path: &Path) -> Result<()> {
    let header = fs::read_to_string(header_path).map_err(|e| Error::file_read(header_path, e))?;
    let compat = fs::read_to_string(compat_path).map_err(|e| Error::file_read(compat_path, e))?;

    let merged = merge_compat(&header, &compat);
    debug!(
        "Appended {} compat bytes to {}",
        merged.len() - header.len(),
        header_path.display()
    );

    fs::write(header_path, merged).map_err(|e| Error::file_write(header_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const COMPAT: &str = "\
/*
 * Copyright notice
 */

#ifndef OSSL_OBJ_COMPAT_H
#define NID_aes_128_cbc_hmac_sha1 NID_aes_128_cbc_hmac_sha1_alias
#endif
";

    #[test]
    fn test_merge_strips_comment_banner() {
        let merged = merge_compat("#define NID_undef 0\n", COMPAT);
        assert_eq!(
            merged,
            "#define NID_undef 0\n\
             \n\
             #ifndef OSSL_OBJ_COMPAT_H\n\
             #define NID_aes_128_cbc_hmac_sha1 NID_aes_128_cbc_hmac_sha1_alias\n\
             #endif\n"
        );
    }

    #[test]
    fn test_indented_comment_is_kept() {
        // only column-0 openers and " *" continuations count as banner lines
        let merged = merge_compat("", "  /* inline */\n *x\n");
        assert_eq!(merged, "  /* inline */\n");
    }

    #[test]
    fn test_header_without_trailing_newline() {
        let merged = merge_compat("#endif", "#define A B");
        assert_eq!(merged, "#endif\n#define A B");
    }

    #[test]
    fn test_append_compat_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let header = temp_dir.path().join("obj_mac.h.new");
        let compat = temp_dir.path().join("obj_compat.h");
        fs::write(&header, "#define NID_undef 0\n").unwrap();
        fs::write(&compat, COMPAT).unwrap();

        append_compat(&header, &compat).unwrap();

        let content = fs::read_to_string(&header).unwrap();
        assert!(content.starts_with("#define NID_undef 0\n"));
        assert!(content.contains("NID_aes_128_cbc_hmac_sha1_alias"));
        assert!(!content.contains("Copyright"));
    }

    #[test]
    fn test_append_compat_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let header = temp_dir.path().join("h");
        fs::write(&header, "").unwrap();

        let err = append_compat(&header, &temp_dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
