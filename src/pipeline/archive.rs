//! Report persistence and source archival without overwriting.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{is_lock_error, ReportError, ReportResult};

const MAX_NAME_ATTEMPTS: usize = 1_000;

/// `report_<YYYYMMDD>_<HHMMSS>.xlsx`, with `_<n>` before the extension when `n > 0`.
pub fn report_file_name(at: DateTime<Local>, n: usize) -> String {
    let stamp = at.format("%Y%m%d_%H%M%S");
    if n == 0 {
        format!("report_{stamp}.xlsx")
    } else {
        format!("report_{stamp}_{n}.xlsx")
    }
}

/// Write `bytes` to a fresh report file in `dir`, never replacing an existing one.
pub fn write_unique_report(dir: &Path, at: DateTime<Local>, bytes: &[u8]) -> ReportResult<PathBuf> {
    for n in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(report_file_name(at, n));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        return Ok(path);
    }
    Err(ReportError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free report name in {}", dir.display()),
    )))
}

/// Where `source` will land in `archive_dir`; fails if that name is already taken.
pub fn archive_destination(archive_dir: &Path, source: &Path) -> ReportResult<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        ReportError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source has no file name: {}", source.display()),
        ))
    })?;
    let dest = archive_dir.join(name);
    if dest.symlink_metadata().is_ok() {
        return Err(ReportError::ArchiveCollision { path: dest });
    }
    Ok(dest)
}

/// Move `source` to `dest`, refusing to replace an existing `dest`.
///
/// Either the file ends up at `dest` and is gone from `source`, or it is left untouched at
/// `source`. Hard links give an atomic no-clobber move; filesystems without them fall back to a
/// checked rename.
pub fn move_no_clobber(source: &Path, dest: &Path) -> ReportResult<()> {
    match fs::hard_link(source, dest) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(dest);
                return Err(source_error(source, e));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(ReportError::ArchiveCollision {
            path: dest.to_path_buf(),
        }),
        Err(_) => {
            if dest.symlink_metadata().is_ok() {
                return Err(ReportError::ArchiveCollision {
                    path: dest.to_path_buf(),
                });
            }
            fs::rename(source, dest).map_err(|e| source_error(source, e))
        }
    }
}

/// Read the whole source file, classifying "held by another process" separately.
pub fn read_source(source: &Path) -> ReportResult<Vec<u8>> {
    fs::read(source).map_err(|e| source_error(source, e))
}

fn source_error(source: &Path, e: io::Error) -> ReportError {
    if is_lock_error(&e) {
        ReportError::Locked {
            path: source.to_path_buf(),
            source: e,
        }
    } else {
        ReportError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[test]
    fn report_names_follow_timestamp_pattern() {
        assert_eq!(report_file_name(at(), 0), "report_20240506_070809.xlsx");
        assert_eq!(report_file_name(at(), 2), "report_20240506_070809_2.xlsx");
    }

    #[test]
    fn same_second_reports_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_unique_report(dir.path(), at(), b"one").unwrap();
        let b = write_unique_report(dir.path(), at(), b"two").unwrap();
        assert_ne!(a, b);
        assert!(b.ends_with("report_20240506_070809_1.xlsx"));
        assert_eq!(fs::read(&a).unwrap(), b"one");
    }

    #[test]
    fn move_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.csv");
        let dest = dir.path().join("archived.csv");
        fs::write(&src, "new").unwrap();
        fs::write(&dest, "old").unwrap();

        let err = move_no_clobber(&src, &dest).unwrap_err();
        assert!(matches!(err, ReportError::ArchiveCollision { .. }));
        assert_eq!(fs::read_to_string(&src).unwrap(), "new");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");
    }

    #[test]
    fn move_relocates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.csv");
        let dest = dir.path().join("archive.csv");
        fs::write(&src, "x").unwrap();

        move_no_clobber(&src, &dest).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "x");
    }

    #[test]
    fn destination_check_spots_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let src = Path::new("/watch/data.csv");
        assert_eq!(
            archive_destination(dir.path(), src).unwrap(),
            dir.path().join("data.csv")
        );
        fs::write(dir.path().join("data.csv"), "").unwrap();
        assert!(matches!(
            archive_destination(dir.path(), src),
            Err(ReportError::ArchiveCollision { .. })
        ));
    }
}
