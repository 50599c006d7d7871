//! Credentials file I/O.
//!
//! The file is UTF-8 text with one record per line:
//!
//! ```text
//! <username>:<hash token>\n
//! ```
//!
//! There is no header, footer, or checksum.  An absent file is an empty
//! store.  Appends are a single write; full rewrites go through a temp
//! file and a rename so readers never see a half-written store.
//!
//! A symlinked credentials path is followed: the rewrite replaces the
//! file the link points at and the link itself stays in place.  On Unix
//! the rewritten file keeps the original's mode, owner, and group; if the
//! owner or group cannot be carried over (an unprivileged user rewriting
//! someone else's file) the rewrite fails and the original is untouched.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::record::CredentialRecord;
use crate::errors::{MqttCredError, Result};

/// Read every record from `path`, in file order.
///
/// Returns an empty list if the file does not exist.  Any malformed line,
/// including one that is not valid UTF-8, fails the whole read.
pub fn read_records(path: &Path) -> Result<Vec<CredentialRecord>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    // A trailing newline (or an empty file) leaves one empty tail segment.
    if matches!(lines.last(), Some(tail) if tail.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let line_no = i + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = std::str::from_utf8(raw).map_err(|_| MqttCredError::MalformedRecord {
                line: line_no,
                reason: "invalid UTF-8".into(),
            })?;
            CredentialRecord::parse_line(line, line_no)
        })
        .collect()
}

/// Append one record to the end of `path`, creating the file if needed.
///
/// If the existing file does not end with a newline, one is written
/// first so the new record never merges into the previous line.
pub fn append_record(path: &Path, record: &CredentialRecord) -> Result<()> {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);

    // Restrict new files to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    let mut buf = String::new();
    if needs_leading_newline(&mut file)? {
        buf.push('\n');
    }
    buf.push_str(&record.to_line());

    file.write_all(buf.as_bytes())?;
    file.sync_data()?;

    debug!("appended record for '{}' to {}", record.username, path.display());
    Ok(())
}

/// Replace the contents of `path` with `records` **atomically**.
///
/// 1. Resolve symlinks so the real file is the one replaced.
/// 2. Write every record to a temp file in that file's directory.
/// 3. Copy ownership and permissions over, then flush to disk.
/// 4. Rename the temp file over the target.
///
/// If any step fails the temp file is removed and the original file is
/// left untouched.
pub fn write_records(path: &Path, records: &[CredentialRecord]) -> Result<()> {
    let buf: String = records.iter().map(CredentialRecord::to_line).collect();

    let target = resolve_target(path)?;
    let tmp_path = temp_path(&target);
    let original = fs::metadata(&target).ok();

    let result = write_temp(&tmp_path, buf.as_bytes(), original.as_ref())
        .and_then(|()| fs::rename(&tmp_path, &target));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    // Persist the rename itself. Not every platform can open a directory.
    if let Ok(dir) = File::open(parent_dir(&target)) {
        let _ = dir.sync_all();
    }

    debug!("rewrote {} with {} record(s)", target.display(), records.len());
    Ok(())
}

/// The real file behind `path`, or `path` itself if nothing exists there yet.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

fn write_temp(tmp_path: &Path, data: &[u8], original: Option<&Metadata>) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(tmp_path)?;
    file.write_all(data)?;

    if let Some(meta) = original {
        // Owner first: chown may clear set-id bits that the mode restores.
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            std::os::unix::fs::fchown(&file, Some(meta.uid()), Some(meta.gid()))?;
        }
        file.set_permissions(meta.permissions())?;
    }

    file.sync_all()
}

fn needs_leading_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// `dir/.name.tmp` next to the target, so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    parent_dir(path).join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}
