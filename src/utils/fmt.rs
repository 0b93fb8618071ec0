//! ## fmt
//!
//! format utilities

use crate::provider::Stat;

/// Directory bit of the file type
const S_IFDIR: u32 = 0o040000;

/// Format a file mode as a `ls`-like permission string (e.g. `drwxr-xr-x`).
///
/// Only the directory type bit and the nine permission bits are consulted.
pub fn fmt_mode(mode: u32) -> String {
    let mut res = String::with_capacity(10);
    res.push(if mode & S_IFDIR != 0 { 'd' } else { '-' });
    let mode = mode & 0o777;
    for shift in [6, 3, 0] {
        let part = (mode >> shift) & 0o7;
        res.push(if part & 4 != 0 { 'r' } else { '-' });
        res.push(if part & 2 != 0 { 'w' } else { '-' });
        res.push(if part & 1 != 0 { 'x' } else { '-' });
    }
    res
}

/// Format a directory listing line: permissions, size, uid, gid and name, tab separated
pub fn fmt_entry(stat: &Stat, name: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        fmt_mode(stat.mode),
        stat.size,
        stat.uid,
        stat.gid,
        name
    )
}
