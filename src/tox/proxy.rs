//! SOCKS5 proxy setting (`SOCKS5_PROXY=[user:pass@]host:port`)

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "socks5://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    #[error("expected [user:pass@]host:port")]
    Format,

    #[error("empty host")]
    EmptyHost,

    #[error("bad port {0:?}")]
    BadPort(String),
}

/// Parse a `[user:pass@]host:port` proxy specification
pub fn parse_proxy(input: &str) -> Result<ProxyConfig, ProxyError> {
    let input = input.trim();

    let (credentials, address) = match input.rsplit_once('@') {
        Some((creds, addr)) => (Some(creds), addr),
        None => (None, input),
    };

    let (username, password) = match credentials {
        Some(creds) => match creds.split_once(':') {
            Some((user, pass)) => (Some(user.to_string()), Some(pass.to_string())),
            None => (Some(creds.to_string()), None),
        },
        None => (None, None),
    };

    let (host, port_str) = address.rsplit_once(':').ok_or(ProxyError::Format)?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(ProxyError::EmptyHost);
    }

    let port = match port_str.parse::<u16>() {
        Ok(p) if p != 0 && !port_str.starts_with('+') => p,
        _ => return Err(ProxyError::BadPort(port_str.to_string())),
    };

    Ok(ProxyConfig {
        host: host.to_string(),
        port,
        username,
        password,
    })
}
