//! Resident memory parsing from `/proc/<pid>/statm`.

use once_cell::sync::Lazy;
use std::fs;
use std::io;
use std::path::Path;

fn get_page_size() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_PAGESIZE
        unsafe {
            let size = libc::sysconf(libc::_SC_PAGESIZE);
            if size > 0 {
                return size as u64;
            }
        }
    }
    4096
}

/// Memory page size in bytes.
pub static PAGE_SIZE: Lazy<u64> = Lazy::new(get_page_size);

/// Reads the resident set size in bytes (second statm field, in pages).
pub fn parse_statm_rss(proc_path: &Path) -> io::Result<u64> {
    let content = fs::read_to_string(proc_path.join("statm"))?;
    let pages: u64 = content
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| io::Error::other("Invalid statm format"))?
        .parse()
        .map_err(|_| io::Error::other("Failed to parse resident field"))?;
    Ok(pages * *PAGE_SIZE)
}
