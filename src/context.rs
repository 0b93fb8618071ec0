//! # context
//!
//! Identity of the process running the harness

/// Provides the user and group the harness runs as
pub trait ExecutionContext {
    fn uid(&self) -> u32;
    fn gid(&self) -> u32;
}

/// Execution context of the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessContext;

#[cfg(target_family = "unix")]
impl ExecutionContext for ProcessContext {
    fn uid(&self) -> u32 {
        unsafe { libc::getuid() }
    }

    fn gid(&self) -> u32 {
        unsafe { libc::getgid() }
    }
}

#[cfg(not(target_family = "unix"))]
impl ExecutionContext for ProcessContext {
    fn uid(&self) -> u32 {
        0
    }

    fn gid(&self) -> u32 {
        0
    }
}
