//! # UNIX provider
//!
//! SMB provider backed by pavao (libsmbclient)

use std::collections::hash_map::{Entry, HashMap};

use pavao::{SmbClient, SmbCredentials, SmbOpenOptions, SmbOptions};
use remotefs::{RemoteError, RemoteErrorType, RemoteResult};

use super::{DirHandle, ReadHandle, RemoteProvider, Stat};
use crate::utils::smb as smb_utils;
use crate::utils::url::SmbUrl;

const DEFAULT_WORKGROUP: &str = "WORKGROUP";

/// Options applied to every smb context opened by [`SmbProvider`]
#[derive(Debug, Clone)]
pub struct SmbProviderOptions {
    workgroup: String,
    password: Option<String>,
    case_sensitive: bool,
    one_share_per_server: bool,
}

impl Default for SmbProviderOptions {
    fn default() -> Self {
        Self {
            workgroup: DEFAULT_WORKGROUP.to_string(),
            password: None,
            case_sensitive: false,
            one_share_per_server: true,
        }
    }
}

impl SmbProviderOptions {
    /// Workgroup used when the url doesn't name one
    pub fn workgroup<S: AsRef<str>>(mut self, workgroup: S) -> Self {
        self.workgroup = workgroup.as_ref().to_string();
        self
    }

    /// Password used when the url doesn't carry one
    pub fn password<S: AsRef<str>>(mut self, password: S) -> Self {
        self.password = Some(password.as_ref().to_string());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn one_share_per_server(mut self, one_share_per_server: bool) -> Self {
        self.one_share_per_server = one_share_per_server;
        self
    }
}

/// Identifies an smb context. Urls with the same key share a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConnectionKey {
    server: String,
    share: String,
    workgroup: String,
    username: Option<String>,
    password: Option<String>,
}

impl ConnectionKey {
    fn credentials(&self) -> SmbCredentials {
        let mut credentials = SmbCredentials::default()
            .server(&self.server)
            .share(&self.share)
            .workgroup(&self.workgroup);
        if let Some(username) = &self.username {
            credentials = credentials.username(username);
        }
        if let Some(password) = &self.password {
            credentials = credentials.password(password);
        }
        credentials
    }
}

/// SMB provider. Urls carry the server, share and credentials to use;
/// one client is kept for each distinct combination of them.
pub struct SmbProvider {
    options: SmbProviderOptions,
    connections: HashMap<ConnectionKey, SmbClient>,
}

impl Default for SmbProvider {
    fn default() -> Self {
        Self::new(SmbProviderOptions::default())
    }
}

impl SmbProvider {
    pub fn new(options: SmbProviderOptions) -> Self {
        Self {
            options,
            connections: HashMap::new(),
        }
    }

    /// Number of smb contexts currently open
    pub fn connections(&self) -> usize {
        self.connections.len()
    }

    // -- private

    fn smb_options(&self) -> SmbOptions {
        SmbOptions::default()
            .case_sensitive(self.options.case_sensitive)
            .one_share_per_server(self.options.one_share_per_server)
    }

    /// Get the client serving `url`, opening it if necessary, along with the path inside the share
    fn client(&mut self, url: &str) -> RemoteResult<(&SmbClient, String)> {
        let url = SmbUrl::parse(url)?;
        let smb_options = self.smb_options();
        let key = ConnectionKey {
            server: url.server.to_lowercase(),
            share: url.share,
            workgroup: url
                .workgroup
                .unwrap_or_else(|| self.options.workgroup.clone()),
            username: url.username,
            password: url.password.or_else(|| self.options.password.clone()),
        };
        let client: &SmbClient = match self.connections.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(
                    "opening smb context for {}{}",
                    entry.key().server,
                    entry.key().share
                );
                let client = SmbClient::new(entry.key().credentials(), smb_options)
                    .map_err(|e| RemoteError::new_ex(RemoteErrorType::BadAddress, e))?;
                entry.insert(client)
            }
        };
        Ok((client, url.path))
    }
}

impl RemoteProvider for SmbProvider {
    fn stat(&mut self, url: &str) -> RemoteResult<Stat> {
        let (client, path) = self.client(url)?;
        trace!("get stat for {}", path);
        client
            .stat(path.as_str())
            .map(smb_utils::smbstat_to_stat)
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))
    }

    fn open_read(&mut self, url: &str) -> RemoteResult<ReadHandle<'_>> {
        let (client, path) = self.client(url)?;
        trace!("opening file at {} for read", path);
        let file = client
            .open_with(path, SmbOpenOptions::default().read(true))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, e))?;
        Ok(Box::new(file))
    }

    fn open_dir(&mut self, url: &str) -> RemoteResult<DirHandle> {
        let (client, path) = self.client(url)?;
        trace!("listing files at {}", path);
        let dirents = client
            .list_dir(path.as_str())
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))?;
        Ok(Box::new(
            dirents.into_iter().map(|dirent| dirent.name().to_string()),
        ))
    }

    /// Servers may report synthesized permissions, so a readable stat is
    /// confirmed by opening the entry. Directories refusing `open` are
    /// confirmed by listing them instead.
    fn is_readable(&mut self, url: &str) -> bool {
        let stat = match self.stat(url) {
            Ok(stat) if stat.is_readable() => stat,
            Ok(_) => return false,
            Err(err) => {
                debug!("stat failed while checking readability: {}", err);
                return false;
            }
        };
        let Ok((client, path)) = self.client(url) else {
            return false;
        };
        trace!("checking read access on {}", path);
        smb_utils::check_read_access(
            &stat,
            client
                .open_with(path.as_str(), SmbOpenOptions::default().read(true))
                .map(drop),
            || client.list_dir(path.as_str()).map(drop),
        )
    }
}
