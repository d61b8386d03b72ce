//! Domain value objects: Variant, HttpMethod, Bucket.
//!
//! Pure `Copy` value types with a string form, a `FromStr` parser and, where
//! they appear in project files, a serde representation.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Variant ──────────────────────────────────────────────────────────────────

/// The kind of server a service is.
///
/// A closed set: each variant selects one pre-registered generator bundle.
/// Adding a variant means adding a tag here and a bundle in
/// `generators/mod.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// HTTP API backed by a SQL database.
    Api,
    /// HTTP ingress that publishes to the message queue.
    Broker,
    /// Message-queue consumer without an HTTP server.
    Listener,
}

impl Variant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Broker => "broker",
            Self::Listener => "listener",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Api, Self::Broker, Self::Listener]
    }

    /// Whether the service exposes an HTTP router.
    pub const fn serves_http(self) -> bool {
        matches!(self, Self::Api | Self::Broker)
    }

    /// Whether the service talks to the message queue.
    pub const fn uses_messaging(self) -> bool {
        matches!(self, Self::Broker | Self::Listener)
    }

    /// Port given to a service of this variant when none is configured.
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Api => 8080,
            Self::Broker => 8082,
            Self::Listener => 0,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api" | "default" | "http" => Ok(Self::Api),
            "broker" | "producer" => Ok(Self::Broker),
            "listener" | "consumer" => Ok(Self::Listener),
            other => Err(DomainError::UnknownVariant(other.to_string())),
        }
    }
}

// ── HttpMethod ───────────────────────────────────────────────────────────────

/// HTTP methods the router generator knows how to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
        }
    }

    /// Name of the chi router method registering this verb.
    pub const fn router_method(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Patch => "Patch",
            Self::Options => "Options",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Delete,
            Self::Patch,
            Self::Options,
        ]
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, upper-case match: `"get"` and `" GET "` are not routable.
impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DomainError::UnknownHttpMethod(s.to_string()))
    }
}

// ── Bucket ───────────────────────────────────────────────────────────────────

/// A named group of generated files that maps to one output directory.
///
/// The declaration order is the generation and write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Config,
    Routes,
    /// Program entry point, written at the service root.
    Main,
    Handlers,
    /// Messaging plumbing (Go package `event`).
    Event,
}

impl Bucket {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Routes => "routes",
            Self::Main => "cmd",
            Self::Handlers => "handlers",
            Self::Event => "messaging",
        }
    }

    /// Directory relative to the service root; `None` for the root itself.
    pub const fn dir(&self) -> Option<&'static str> {
        match self {
            Self::Config => Some("config"),
            Self::Routes => Some("routes"),
            Self::Main => None,
            Self::Handlers => Some("handlers"),
            Self::Event => Some("event"),
        }
    }

    pub const fn all() -> &'static [Self] {
        &[
            Self::Config,
            Self::Routes,
            Self::Main,
            Self::Handlers,
            Self::Event,
        ]
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "config" => Ok(Self::Config),
            "routes" => Ok(Self::Routes),
            "cmd" | "main" => Ok(Self::Main),
            "handlers" => Ok(Self::Handlers),
            "messaging" | "event" => Ok(Self::Event),
            other => Err(DomainError::UnknownBucket(other.to_string())),
        }
    }
}
