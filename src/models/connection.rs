// Connection configuration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_AUTH_SOURCE: &str = "admin";

/// Where to connect: a full connection string or individual parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    ConnectionString(String),
    Parameters {
        host: String,
        port: u16,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        password: Option<String>,
        #[serde(default = "default_auth_source")]
        auth_source: String,
    },
}

fn default_auth_source() -> String {
    DEFAULT_AUTH_SOURCE.to_string()
}

fn encode_credential(value: &str) -> String {
    // form encoding turns spaces into '+', which MongoDB URIs do not decode
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        ConnectionTarget::ConnectionString(format!("mongodb://{DEFAULT_HOST}:{DEFAULT_PORT}/"))
    }
}

impl ConnectionTarget {
    /// Connection URI handed to the driver.
    ///
    /// Credentials are only used when both username and password are non-empty.
    pub fn uri(&self) -> String {
        match self {
            ConnectionTarget::ConnectionString(uri) => uri.clone(),
            ConnectionTarget::Parameters { host, port, username, password, auth_source } => {
                match (username.as_deref(), password.as_deref()) {
                    (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => format!(
                        "mongodb://{}:{}@{host}:{port}/?authSource={}",
                        encode_credential(user),
                        encode_credential(pass),
                        encode_credential(auth_source)
                    ),
                    _ => format!("mongodb://{host}:{port}/"),
                }
            }
        }
    }

    /// Label safe for logs: never includes the password.
    pub fn display_name(&self) -> String {
        match self {
            ConnectionTarget::ConnectionString(uri) => match uri.rsplit_once('@') {
                Some((_, rest)) => {
                    let scheme = uri.split_once("://").map(|(s, _)| s).unwrap_or("mongodb");
                    format!("{scheme}://***@{rest}")
                }
                None => uri.clone(),
            },
            ConnectionTarget::Parameters { host, port, .. } => format!("{host}:{port}"),
        }
    }
}

/// A saved connection configuration (persisted to disk)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedConnection {
    pub id: Uuid,
    pub name: String,
    pub target: ConnectionTarget,
    pub last_connected: Option<DateTime<Utc>>,
}

impl SavedConnection {
    pub fn new(name: String, target: ConnectionTarget) -> Self {
        Self { id: Uuid::new_v4(), name, target, last_connected: None }
    }

    pub fn mark_connected(&mut self) {
        self.last_connected = Some(Utc::now());
    }
}
