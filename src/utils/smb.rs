//! # smb utils
//!
//! SMB protocol utilities

use std::io::ErrorKind;

use libc::mode_t;
use pavao::{SmbError, SmbMode, SmbResult, SmbStat};

use crate::provider::Stat;

/// Convert `SmbStat` to `Stat`
pub fn smbstat_to_stat(stat: SmbStat) -> Stat {
    let mode = mode_t::from(stat.mode) as u32 | get_file_type_bits(&stat.mode);
    Stat {
        mode,
        size: stat.size,
        uid: stat.uid,
        gid: stat.gid,
    }
}

/// `SmbMode` converts to permission bits only; the file type is restored here
fn get_file_type_bits(mode: &SmbMode) -> u32 {
    let bits = match mode {
        mode if mode.is_dir() => libc::S_IFDIR,
        mode if mode.is_symlink() => libc::S_IFLNK,
        mode if mode.is_file() => libc::S_IFREG,
        mode if mode.is_block() => libc::S_IFBLK,
        mode if mode.is_character() => libc::S_IFCHR,
        mode if mode.is_pipe() => libc::S_IFIFO,
        mode if mode.is_socket() => libc::S_IFSOCK,
        _ => 0,
    };
    bits as u32
}

/// Tell whether the server refused access (`EACCES`)
pub fn is_access_denied(err: &SmbError) -> bool {
    matches!(err, SmbError::Io(err) if err.kind() == ErrorKind::PermissionDenied)
}

/// Confirm the read access suggested by `stat` with the outcome of opening the entry.
///
/// Access denied on a file makes it unreadable; on a directory, `list` decides.
/// Any other open failure leaves the stat as the only evidence.
pub fn check_read_access<F>(stat: &Stat, open: SmbResult<()>, list: F) -> bool
where
    F: FnOnce() -> SmbResult<()>,
{
    match open {
        Ok(()) => true,
        Err(err) if is_access_denied(&err) && stat.is_dir() => match list() {
            Ok(()) => true,
            Err(err) => {
                debug!("directory cannot be listed: {}", err);
                false
            }
        },
        Err(err) if is_access_denied(&err) => {
            debug!("read access denied: {}", err);
            false
        }
        Err(err) => {
            debug!("open failed ({}); relying on stat", err);
            stat.is_readable()
        }
    }
}

#[cfg(test)]
mod test {

    use std::io;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::fmt::fmt_mode;

    fn smbstat(st_mode: mode_t) -> SmbStat {
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        st.st_mode = st_mode;
        st.st_size = 12;
        st.st_uid = 1000;
        st.st_gid = 100;
        SmbStat::from(st)
    }

    #[test]
    fn should_convert_directory_stat() {
        let stat = smbstat_to_stat(smbstat(libc::S_IFDIR | 0o755));
        assert_eq!(stat.mode, 0o040755);
        assert_eq!(stat.is_dir(), true);
        assert_eq!(fmt_mode(stat.mode), "drwxr-xr-x");
    }

    #[test]
    fn should_convert_file_stat() {
        let stat = smbstat_to_stat(smbstat(libc::S_IFREG | 0o644));
        assert_eq!(
            stat,
            Stat {
                mode: 0o100644,
                size: 12,
                uid: 1000,
                gid: 100,
            }
        );
        assert_eq!(stat.is_dir(), false);
        assert_eq!(fmt_mode(stat.mode), "-rw-r--r--");
    }

    #[test]
    fn should_convert_symlink_stat() {
        let stat = smbstat_to_stat(smbstat(libc::S_IFLNK | 0o777));
        assert_eq!(stat.mode, 0o120777);
        assert_eq!(fmt_mode(stat.mode), "-rwxrwxrwx");
    }

    fn denied() -> SmbResult<()> {
        Err(SmbError::Io(io::Error::from_raw_os_error(libc::EACCES)))
    }

    #[test]
    fn should_grant_read_access_when_open_succeeds() {
        let file = smbstat_to_stat(smbstat(libc::S_IFREG | 0o644));
        assert_eq!(
            check_read_access(&file, Ok(()), || panic!("files are never listed")),
            true
        );
    }

    #[test]
    fn should_deny_read_access_on_file() {
        let file = smbstat_to_stat(smbstat(libc::S_IFREG | 0o644));
        assert_eq!(
            check_read_access(&file, denied(), || panic!("files are never listed")),
            false
        );
    }

    #[test]
    fn should_check_directory_access_by_listing() {
        let dir = smbstat_to_stat(smbstat(libc::S_IFDIR | 0o755));
        assert_eq!(check_read_access(&dir, denied(), || Ok(())), true);
        assert_eq!(
            check_read_access(&dir, denied(), || Err(SmbError::BadFileDescriptor)),
            false
        );
    }

    #[test]
    fn should_rely_on_stat_when_open_fails_otherwise() {
        let file = smbstat_to_stat(smbstat(libc::S_IFREG | 0o644));
        assert_eq!(
            check_read_access(&file, Err(SmbError::BadFileDescriptor), || Ok(())),
            true
        );
    }

    #[test]
    fn should_tell_access_denied() {
        assert_eq!(
            is_access_denied(&SmbError::Io(io::Error::from_raw_os_error(libc::EACCES))),
            true
        );
        assert_eq!(
            is_access_denied(&SmbError::Io(io::Error::from(ErrorKind::NotFound))),
            false
        );
        assert_eq!(is_access_denied(&SmbError::BadFileDescriptor), false);
    }
}
