use std::env;
use thiserror::Error;

/// Fixed coordinate space that tool callers address, independent of the
/// remote server's actual resolution.
pub const LOGICAL_WIDTH: u16 = 1024;
pub const LOGICAL_HEIGHT: u16 = 768;

const DEFAULT_VNC_PORT: u16 = 5900;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Process-wide configuration, read once at startup and treated as read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub logical_width: u16,
    pub logical_height: u16,
    pub remote_width: u16,
    pub remote_height: u16,
}

impl Config {
    /// Read `VNC_HOST`, `VNC_PASS` and the optional `VNC_REMOTE_SIZE`
    /// (`WIDTHxHEIGHT`). Fails fast so a misconfigured server never reaches
    /// the network.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server = env::var("VNC_HOST").map_err(|_| ConfigError::Missing("VNC_HOST"))?;
        let password = env::var("VNC_PASS").map_err(|_| ConfigError::Missing("VNC_PASS"))?;
        let (host, port) = parse_server_addr(&server)?;

        let (remote_width, remote_height) = match env::var("VNC_REMOTE_SIZE") {
            Ok(value) => parse_size(&value)?,
            Err(_) => (LOGICAL_WIDTH, LOGICAL_HEIGHT),
        };

        Ok(Self {
            host,
            port,
            password,
            logical_width: LOGICAL_WIDTH,
            logical_height: LOGICAL_HEIGHT,
            remote_width,
            remote_height,
        })
    }
}

fn parse_server_addr(value: &str) -> Result<(String, u16), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid("VNC_HOST", value.to_string()));
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            if host.is_empty() {
                return Err(ConfigError::Invalid("VNC_HOST", value.to_string()));
            }
            let port = port
                .parse()
                .map_err(|_| ConfigError::Invalid("VNC_HOST", value.to_string()))?;
            Ok((host.to_string(), port))
        }
        None => Ok((value.to_string(), DEFAULT_VNC_PORT)),
    }
}

fn parse_size(value: &str) -> Result<(u16, u16), ConfigError> {
    let invalid = || ConfigError::Invalid("VNC_REMOTE_SIZE", value.to_string());
    let (width, height) = value.split_once('x').ok_or_else(invalid)?;
    let width = width.parse().map_err(|_| invalid())?;
    let height = height.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_addr_without_port_uses_default() {
        assert_eq!(
            parse_server_addr("vnchost").unwrap(),
            ("vnchost".to_string(), 5900)
        );
    }

    #[test]
    fn test_parse_server_addr_with_explicit_port() {
        assert_eq!(
            parse_server_addr("10.0.0.2:5901").unwrap(),
            ("10.0.0.2".to_string(), 5901)
        );
    }

    #[test]
    fn test_parse_server_addr_rejects_empty_host() {
        assert!(parse_server_addr("").is_err());
        assert!(parse_server_addr(":5900").is_err());
    }

    #[test]
    fn test_parse_server_addr_rejects_bad_port() {
        assert!(parse_server_addr("host:notaport").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920x1080").unwrap(), (1920, 1080));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("0x768").is_err());
        assert!(parse_size("1024x").is_err());
    }
}
