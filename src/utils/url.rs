//! # url utils
//!
//! String transforms over remote urls and the SMB url parser

use percent_encoding::percent_decode_str;
use remotefs::{RemoteError, RemoteErrorType, RemoteResult};

const SCHEME_SEP: &str = "://";

/// Remove the credentials from `url`, so it can be displayed or logged.
///
/// Everything between `://` and the first `@` following it is dropped.
/// Urls without a scheme separator or without `@` are returned unchanged.
pub fn strip_credentials(url: &str) -> String {
    let Some(scheme_end) = url.find(SCHEME_SEP).map(|pos| pos + SCHEME_SEP.len()) else {
        return url.to_string();
    };
    match url[scheme_end..].find('@') {
        Some(at) => format!("{}{}", &url[..scheme_end], &url[scheme_end + at + 1..]),
        None => url.to_string(),
    }
}

/// Get the parent directory url, truncating `url` right after its last `/`.
///
/// Urls without any `/` are returned unchanged.
pub fn parent_url(url: &str) -> String {
    match url.rfind('/') {
        Some(pos) => url[..=pos].to_string(),
        None => url.to_string(),
    }
}

/// Join a directory url and an entry name
pub fn join_url(dir: &str, name: &str) -> String {
    format!("{dir}{name}")
}

/// Split `s` at the first occurrence of `sep`
fn split_once_or<'a>(s: &'a str, sep: char, missing_left: bool) -> (&'a str, &'a str) {
    match s.split_once(sep) {
        Some(parts) => parts,
        None if missing_left => ("", s),
        None => (s, ""),
    }
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().to_string()
}

/// An SMB url split in the parts required to address a share.
///
/// Parses `proto://[workgroup;][user[:password]@]host[:port]/share[/path]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmbUrl {
    /// Server address as `proto://host[:port]`
    pub server: String,
    /// Share name, prefixed by `/`
    pub share: String,
    /// Path inside the share, always starting with `/`
    pub path: String,
    pub workgroup: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmbUrl {
    /// Parse `url`. Fails with `BadAddress` if the url has no scheme, no host or no share.
    pub fn parse(url: &str) -> RemoteResult<Self> {
        let (protocol, rest) = url.split_once(SCHEME_SEP).ok_or_else(|| {
            RemoteError::new_ex(RemoteErrorType::BadAddress, "missing url scheme")
        })?;
        let (authority, location) = split_once_or(rest, '/', false);
        let (userinfo, host) = split_once_or(authority, '@', true);
        if host.is_empty() {
            return Err(RemoteError::new_ex(
                RemoteErrorType::BadAddress,
                "missing host",
            ));
        }
        let (share, path) = split_once_or(location, '/', false);
        if share.is_empty() {
            return Err(RemoteError::new_ex(
                RemoteErrorType::BadAddress,
                "missing share",
            ));
        }
        let (workgroup, username, password) = if userinfo.is_empty() {
            (None, None, None)
        } else {
            let (user, password) = match userinfo.split_once(':') {
                Some((user, password)) => (user, Some(decode(password))),
                None => (userinfo, None),
            };
            let (workgroup, user) = match user.split_once(';') {
                Some((workgroup, user)) => (Some(decode(workgroup)), user),
                None => (None, user),
            };
            (workgroup, Some(decode(user)), password)
        };

        Ok(Self {
            server: format!("{protocol}{SCHEME_SEP}{host}"),
            share: format!("/{share}"),
            path: format!("/{path}"),
            workgroup,
            username,
            password,
        })
    }

    /// Whether the url names a user without giving a password
    pub fn needs_password(&self) -> bool {
        self.username.is_some() && self.password.is_none()
    }
}
