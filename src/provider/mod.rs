//! # provider
//!
//! Remote file system providers used by the harness

use std::io::Read;

use remotefs::RemoteResult;

// -- unix provider

#[cfg(target_family = "unix")]
mod unix;
#[cfg(target_family = "unix")]
pub use unix::*;

const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;

/// Readable handle on a remote file. The file is closed when the handle is dropped.
pub type ReadHandle<'a> = Box<dyn Read + 'a>;

/// Handle on an opened remote directory, yielding the entry names
pub type DirHandle = Box<dyn Iterator<Item = String>>;

/// Metadata of a remote entry
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// File type and permission bits
    pub mode: u32,
    /// Size in bytes
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
}

impl Stat {
    /// Whether the file type bits denote a directory
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    /// Whether any of the read permission bits is set
    pub fn is_readable(&self) -> bool {
        self.mode & 0o444 != 0
    }
}

/// A remote file system addressed by urls
pub trait RemoteProvider {
    /// Get the metadata of the entry at `url`
    fn stat(&mut self, url: &str) -> RemoteResult<Stat>;

    /// Open the file at `url` for reading
    fn open_read(&mut self, url: &str) -> RemoteResult<ReadHandle<'_>>;

    /// Open the directory at `url` for enumeration
    fn open_dir(&mut self, url: &str) -> RemoteResult<DirHandle>;

    /// Tell whether `url` denotes a readable resource
    fn is_readable(&mut self, url: &str) -> bool {
        match self.stat(url) {
            Ok(stat) => stat.is_readable(),
            Err(err) => {
                debug!("stat failed while checking readability: {}", err);
                false
            }
        }
    }
}
