//! Output file lifecycle.
//!
//! Write the whole payload to a unique `.part` temp file beside the output,
//! sync, then rename it onto the final name. The handle is released and the
//! temp file removed on every exit path.

mod writer;

pub use writer::OutputWriter;

use anyhow::Result;
use std::path::Path;

/// Suffix of temp files created before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Write `data` to `final_path`, replacing any previous contents.
pub fn write_output(final_path: &Path, data: &[u8]) -> Result<()> {
    let mut writer = OutputWriter::create(final_path)?;
    writer.write_all(data)?;
    writer.sync()?;
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(TEMP_SUFFIX))
            .collect()
    }

    #[test]
    fn temp_file_is_beside_output_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        let a = OutputWriter::create(&path).unwrap();
        let b = OutputWriter::create(&path).unwrap();
        assert_eq!(a.temp_path().parent(), Some(dir.path()));
        assert!(a.temp_path().to_string_lossy().ends_with(TEMP_SUFFIX));
        assert_ne!(a.temp_path(), b.temp_path());
    }

    #[test]
    fn write_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        write_output(&path, b"LINE1\nLINE2\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"LINE1\nLINE2\n");
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[test]
    fn write_output_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        write_output(&path, b"a much longer first payload\n").unwrap();
        write_output(&path, b"short\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"short\n");
    }

    #[test]
    fn write_output_empty_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.tle");
        write_output(&path, b"").unwrap();
        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn unrelated_part_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        let bystander = dir.path().join("ISS.tle.part");
        std::fs::write(&bystander, b"keep me").unwrap();
        write_output(&path, b"new\n").unwrap();
        assert_eq!(std::fs::read(&bystander).unwrap(), b"keep me");
    }

    #[test]
    fn dropped_writer_removes_temp_and_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        std::fs::write(&path, b"previous\n").unwrap();
        let temp;
        {
            let mut writer = OutputWriter::create(&path).unwrap();
            writer.write_all(b"half").unwrap();
            temp = writer.temp_path().to_path_buf();
            assert!(temp.exists());
        }
        assert!(!temp.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous\n");
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("ISS.tle");
        let err = write_output(&path, b"x").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to create temp file"));
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_writers_last_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        let big_a = vec![b'A'; 4 << 20];
        let big_b = vec![b'B'; 4 << 20];
        let small_b = vec![b'B'; 1024];

        for round in 0..20 {
            let other = if round % 2 == 0 { &big_b } else { &small_b };
            let barrier = Arc::new(Barrier::new(2));
            let results: Vec<Result<()>> = thread::scope(|s| {
                let handles: Vec<_> = [&big_a, other]
                    .into_iter()
                    .map(|payload| {
                        let barrier = Arc::clone(&barrier);
                        let path = &path;
                        s.spawn(move || {
                            barrier.wait();
                            write_output(path, payload)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });
            for r in &results {
                assert!(r.is_ok(), "round {}: {:?}", round, r);
            }
            let written = std::fs::read(&path).unwrap();
            assert!(
                written == big_a || written == *other,
                "round {}: output mixes payloads ({} bytes)",
                round,
                written.len()
            );
        }
        assert!(leftover_temp_files(dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_output_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("elements.tle");
        let link = dir.path().join("ISS.tle");
        std::fs::write(&target, b"old\n").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        write_output(&link, b"new\n").unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read(&target).unwrap(), b"new\n");
        assert_eq!(std::fs::read(&link).unwrap(), b"new\n");
    }

    #[cfg(unix)]
    #[test]
    fn existing_permissions_are_kept() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ISS.tle");
        std::fs::write(&path, b"old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_output(&path, b"new\n").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
