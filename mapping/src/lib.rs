//! File-backed mmap/munmap probe: write a one-page file, then map it
//! privately, overwrite the mapping, and unmap. The private mapping means
//! the overwrite never reaches the file; the point is the map/fill/unmap
//! syscall sequence itself, typically run under strace or trace-cmd.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;
use std::slice;

/// One page; the probe always maps exactly this much.
pub const FILE_SIZE: usize = 4096;

/// Create (or truncate) `path` and fill it with `FILE_SIZE` bytes of `'a'`.
pub fn write_pattern(path: &Path) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(&[b'a'; FILE_SIZE])?;
    Ok(())
}

/// Map `path` for writing (private), fill the mapping with `'b'`, unmap.
pub fn overwrite_mapped(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    let addr = unsafe {
        libc::mmap(
            ptr::null_mut(),
            FILE_SIZE,
            libc::PROT_WRITE,
            libc::MAP_PRIVATE,
            file.as_raw_fd(),
            0,
        )
    };
    if addr == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }

    let mapped = unsafe { slice::from_raw_parts_mut(addr as *mut u8, FILE_SIZE) };
    mapped.fill(b'b');

    if unsafe { libc::munmap(addr, FILE_SIZE) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pattern_file_is_one_page_of_a() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe_file");
        write_pattern(&path).unwrap();
        let contents = fs::read(&path).unwrap();
        assert_eq!(contents.len(), FILE_SIZE);
        assert!(contents.iter().all(|&b| b == b'a'));
    }

    #[test]
    fn private_overwrite_leaves_the_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe_file");
        write_pattern(&path).unwrap();
        overwrite_mapped(&path).unwrap();
        let contents = fs::read(&path).unwrap();
        assert!(contents.iter().all(|&b| b == b'a'));
    }

    #[test]
    fn mapping_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(overwrite_mapped(&dir.path().join("missing")).is_err());
    }
}
