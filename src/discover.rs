//! Recursive WAV file discovery.

use crate::error::{Result, WavnoteError};
use std::fs;
use std::path::{Path, PathBuf};

/// Recursively collect all `.wav` files under `root`.
///
/// Extension matching is case-insensitive, so `memo.WAV` counts.
/// Directory entries are visited in name order at every level, making the
/// result deterministic within a run. Any unreadable directory aborts the
/// whole traversal — discovery is all-or-nothing.
pub fn find_wav_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let read_error = |e: std::io::Error| WavnoteError::Discovery {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            walk(&path, found)?;
        } else if is_wav(&path) {
            found.push(path);
        }
    }

    Ok(())
}

/// Case-insensitive `.wav` extension check.
fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn finds_wav_files_case_insensitively_and_recursively() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.wav"));
        touch(&dir.path().join("A.WAV"));
        touch(&dir.path().join("b.mp3"));
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("c.wav"));

        let files = find_wav_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();

        assert_eq!(names, vec!["A.WAV", "a.wav", "sub/c.wav"]);
    }

    #[test]
    fn order_is_deterministic_by_name() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("zebra.wav"));
        touch(&dir.path().join("alpha.wav"));
        let mid = dir.path().join("mid");
        fs::create_dir(&mid).unwrap();
        touch(&mid.join("nested.wav"));

        let first = find_wav_files(dir.path()).unwrap();
        let second = find_wav_files(dir.path()).unwrap();
        assert_eq!(first, second);

        let names: Vec<_> = first
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("alpha.wav"),
                PathBuf::from("mid/nested.wav"),
                PathBuf::from("zebra.wav"),
            ]
        );
    }

    #[test]
    fn directories_named_like_wav_are_excluded() {
        let dir = tempdir().unwrap();
        let decoy = dir.path().join("folder.wav");
        fs::create_dir(&decoy).unwrap();
        touch(&decoy.join("inner.wav"));

        let files = find_wav_files(dir.path()).unwrap();
        assert_eq!(files, vec![decoy.join("inner.wav")]);
    }

    #[test]
    fn empty_directory_yields_empty_set() {
        let dir = tempdir().unwrap();
        let files = find_wav_files(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn unreadable_root_is_a_discovery_error() {
        let result = find_wav_files(Path::new("/nonexistent/recordings"));
        assert!(matches!(result, Err(WavnoteError::Discovery { .. })));
    }

    #[test]
    fn extensionless_and_dotfiles_are_skipped() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("README"));
        touch(&dir.path().join(".wav"));
        touch(&dir.path().join("take1.wav"));

        let files = find_wav_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("take1.wav")]);
    }
}
