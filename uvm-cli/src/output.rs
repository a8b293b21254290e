//! Output files and formats

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Serialization of log, trace, and dump files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

/// Render records either with a CSV writer or as a JSON array
pub fn render<T, F>(format: Format, records: &[T], write_csv: F) -> Result<Vec<u8>>
where
    T: Serialize,
    F: FnOnce(&[T], &mut Vec<u8>) -> std::io::Result<()>,
{
    let mut buf = Vec::new();
    match format {
        Format::Csv => write_csv(records, &mut buf)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut buf, records)?;
            buf.push(b'\n');
        }
    }
    Ok(buf)
}

/// A file written to a temporary sibling, not yet moved into place
#[derive(Debug)]
pub struct Staged {
    temp: PathBuf,
    target: PathBuf,
}

impl Staged {
    /// Move the file into place; the temporary file is removed if that fails
    pub fn commit(self) -> Result<PathBuf> {
        if let Err(e) = fs::rename(&self.temp, &self.target) {
            let _ = fs::remove_file(&self.temp);
            return Err(e).with_context(|| {
                format!("failed to move {} to {}", self.temp.display(), self.target.display())
            });
        }
        Ok(self.target)
    }

    /// Remove the temporary file
    pub fn discard(self) {
        let _ = fs::remove_file(&self.temp);
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

/// Write contents next to `target` without touching `target` itself
pub fn stage(target: &Path, contents: &[u8]) -> Result<Staged> {
    if target.is_dir() {
        bail!("cannot write {}: is a directory", target.display());
    }

    let temp = temp_path(target);
    let result = fs::File::create(&temp).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(e).with_context(|| format!("failed to write {}", target.display()));
    }

    Ok(Staged {
        temp,
        target: target.to_path_buf(),
    })
}

/// Write a file so readers see either the old file or the complete new one
pub fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    stage(target, contents)?.commit().map(drop)
}

/// Write several files, leaving none in place unless all of them land
///
/// Every file is staged first. If a later move fails, the files already
/// moved are removed along with the remaining temporaries.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (target, contents) in files {
        match stage(target, contents) {
            Ok(file) => staged.push(file),
            Err(e) => {
                staged.into_iter().for_each(Staged::discard);
                return Err(e);
            }
        }
    }

    let mut moved = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        match file.commit() {
            Ok(target) => moved.push(target),
            Err(e) => {
                pending.for_each(Staged::discard);
                for target in moved {
                    let _ = fs::remove_file(target);
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("uvm-cli-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_atomic() {
        let dir = scratch("atomic");
        let target = dir.join("out.bin");
        write_atomic(&target, b"abc").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc");
        assert!(!temp_path(&target).exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_all_atomic_failure_leaves_nothing() {
        let dir = scratch("all");
        let good = dir.join("good.bin");
        let bad = dir.join("missing-dir").join("bad.log");

        let files: [(&Path, &[u8]); 2] = [(good.as_path(), b"1"), (bad.as_path(), b"2")];
        assert!(write_all_atomic(&files).is_err());
        assert!(!good.exists());
        assert!(!temp_path(&good).exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_all_atomic_directory_target() {
        let dir = scratch("dir-target");
        let binary = dir.join("p.bin");
        let log = dir.join("p.log");
        fs::create_dir_all(log.join("inner")).unwrap();

        let files: [(&Path, &[u8]); 2] = [(binary.as_path(), b"1"), (log.as_path(), b"2")];
        let err = write_all_atomic(&files).unwrap_err();
        assert!(err.to_string().contains("is a directory"));
        assert!(!binary.exists());
        assert!(!temp_path(&binary).exists());
        assert!(!temp_path(&log).exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_commit_removes_temp() {
        let dir = scratch("commit");
        let target = dir.join("out.bin");
        let staged = stage(&target, b"abc").unwrap();
        fs::create_dir_all(target.join("inner")).unwrap();

        assert!(staged.commit().is_err());
        assert!(!temp_path(&target).exists());
        assert!(target.is_dir());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_render_json() {
        #[derive(Serialize)]
        struct Row {
            a: u32,
        }
        let bytes = render(Format::Json, &[Row { a: 1 }], |_, _| Ok(())).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["a"], 1);
    }
}
