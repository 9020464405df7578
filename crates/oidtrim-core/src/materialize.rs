//! Normalizes generated text and publishes it into the destination tree.
//!
//! Published files always use CRLF line endings and spaces instead of tabs,
//! whatever the generator emitted on the host platform.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Tab stop width used when expanding tabs
pub const TAB_WIDTH: usize = 8;

/// Canonical line terminator of published files
pub const LINE_ENDING: &str = "\r\n";

/// Expands tabs to spaces using tab stops every [`TAB_WIDTH`] columns
fn expand_tabs(line: &str, out: &mut String) {
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
}

/// Strips trailing whitespace, expands tabs and terminates every line with CRLF
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    for line in text.lines() {
        expand_tabs(line.trim_end(), &mut out);
        out.push_str(LINE_ENDING);
    }
    out
}

/// Reads `src`, normalizes it and writes the result to `dst`.
///
/// Missing parent directories of `dst` are created.
pub fn materialize(src: &Path, dst: &Path) -> Result<()> {
    let text = fs::read_to_string(src).map_err(|e| Error::file_read(src, e))?;
    ensure_parent(dst)?;
    fs::write(dst, normalize(&text)).map_err(|e| Error::file_write(dst, e))?;
    debug!("Materialized {} -> {}", src.display(), dst.display());
    Ok(())
}

/// Copies `src` to `dst` byte for byte, creating parent directories
pub fn copy_verbatim(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent(dst)?;
    fs::copy(src, dst).map_err(|e| Error::file_copy(src, dst, e))?;
    debug!("Copied {} -> {}", src.display(), dst.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tabs_is_column_aware() {
        let mut out = String::new();
        expand_tabs("ab\tc\t\td", &mut out);
        assert_eq!(out, "ab      c               d");

        let mut out = String::new();
        expand_tabs("12345678\tx", &mut out);
        assert_eq!(out, "12345678        x");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize("#define NID_A\t\t1   \n\n#endif\t\n"),
            "#define NID_A           1\r\n\r\n#endif\r\n"
        );
    }

    #[test]
    fn test_normalize_already_crlf() {
        let text = "a\r\nb\r\n";
        assert_eq!(normalize(text), text);
        assert_eq!(normalize(&normalize("x\ty\n")), normalize("x\ty\n"));
    }

    #[test]
    fn test_normalize_final_line_without_newline() {
        assert_eq!(normalize("a\nb"), "a\r\nb\r\n");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_every_line_crlf_and_tab_free() {
        let out = normalize("\tx\n y\t \n\t\t\nz");
        assert!(!out.contains('\t'));
        for line in out.split_inclusive('\n') {
            assert!(line.ends_with("\r\n"), "{line:?}");
            assert!(!line[..line.len() - 2].contains('\r'));
        }
    }

    #[test]
    fn test_materialize_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("obj_dat.h");
        let dst = temp_dir.path().join("crypto").join("objects").join("obj_dat.h");
        fs::write(&src, "static\tconst\n").unwrap();

        materialize(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(&dst).unwrap(), "static  const\r\n");
    }

    #[test]
    fn test_copy_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("obj_dat.c");
        let dst = temp_dir.path().join("out").join("obj_dat.c");
        fs::write(&src, "int\tx;  \n").unwrap();

        copy_verbatim(&src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"int\tx;  \n");
    }

    #[test]
    fn test_materialize_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = materialize(&temp_dir.path().join("nope"), &temp_dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
