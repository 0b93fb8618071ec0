//! ## Mock
//!
//! Contains mock for test units

use std::collections::{HashMap, HashSet};
use std::io::{self, Read};

use remotefs::{RemoteError, RemoteErrorType, RemoteResult};

use crate::context::ExecutionContext;
use crate::provider::{DirHandle, ReadHandle, RemoteProvider, Stat};

// -- logger

#[allow(dead_code)]
pub fn logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// -- execution context

pub struct MockContext {
    uid: u32,
    gid: u32,
}

impl MockContext {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }
}

impl ExecutionContext for MockContext {
    fn uid(&self) -> u32 {
        self.uid
    }

    fn gid(&self) -> u32 {
        self.gid
    }
}

// -- provider

/// In-memory provider, recording every call it receives
#[derive(Default)]
pub struct MockProvider {
    stats: HashMap<String, Stat>,
    files: HashMap<String, Vec<u8>>,
    dirs: HashMap<String, Vec<String>>,
    unopenable: HashSet<String>,
    calls: Vec<String>,
    reads: Vec<usize>,
}

#[allow(dead_code)]
impl MockProvider {
    /// Add a file owned by 1000:1000
    pub fn file(mut self, url: &str, mode: u32, data: &[u8]) -> Self {
        self.stats.insert(
            url.to_string(),
            Stat {
                mode,
                size: data.len() as u64,
                uid: 1000,
                gid: 1000,
            },
        );
        self.files.insert(url.to_string(), data.to_vec());
        self
    }

    /// Add a stat-only entry
    pub fn entry(mut self, url: &str, mode: u32, size: u64, uid: u32, gid: u32) -> Self {
        self.stats.insert(
            url.to_string(),
            Stat {
                mode,
                size,
                uid,
                gid,
            },
        );
        self
    }

    pub fn dir(mut self, url: &str, entries: &[&str]) -> Self {
        self.dirs.insert(
            url.to_string(),
            entries.iter().map(|e| e.to_string()).collect(),
        );
        self
    }

    /// Make `open_read` fail on `url`, even though it can be stat'd
    pub fn unopenable(mut self, url: &str) -> Self {
        self.unopenable.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Sizes of the non-empty reads served so far
    pub fn reads(&self) -> &[usize] {
        &self.reads
    }
}

struct MockReader<'a> {
    data: &'a [u8],
    reads: &'a mut Vec<usize>,
}

impl Read for MockReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self.data.read(buf)?;
        if bytes > 0 {
            self.reads.push(bytes);
        }
        Ok(bytes)
    }
}

impl RemoteProvider for MockProvider {
    fn stat(&mut self, url: &str) -> RemoteResult<Stat> {
        self.calls.push(format!("stat {url}"));
        self.stats
            .get(url)
            .copied()
            .ok_or_else(|| RemoteError::new_ex(RemoteErrorType::StatFailed, "no such file"))
    }

    fn open_read(&mut self, url: &str) -> RemoteResult<ReadHandle<'_>> {
        self.calls.push(format!("open_read {url}"));
        if self.unopenable.contains(url) {
            return Err(RemoteError::new(RemoteErrorType::CouldNotOpenFile));
        }
        let data = self
            .files
            .get(url)
            .ok_or_else(|| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, "no such file"))?;
        Ok(Box::new(MockReader {
            data: data.as_slice(),
            reads: &mut self.reads,
        }))
    }

    fn open_dir(&mut self, url: &str) -> RemoteResult<DirHandle> {
        self.calls.push(format!("open_dir {url}"));
        let entries = self
            .dirs
            .get(url)
            .cloned()
            .ok_or_else(|| RemoteError::new_ex(RemoteErrorType::StatFailed, "no such directory"))?;
        Ok(Box::new(entries.into_iter()))
    }
}
