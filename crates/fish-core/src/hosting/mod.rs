//! Remote code-hosting providers
//!
//! Every provider implements the same `HostingProvider` capability set, so the
//! publish workflow never branches on which one is in use. The closed set of
//! supported providers is `ProviderKind`.

pub mod api;
pub mod gitee;
pub mod github;

use crate::error::{FishError, FishResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use gitee::Gitee;
pub use github::GitHub;

/// Supported hosting providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GitHub,
    Gitee,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::GitHub, ProviderKind::Gitee];

    /// Value persisted in the credential store
    pub fn key(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Gitee => "gitee",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "GitHub",
            ProviderKind::Gitee => "Gitee",
        }
    }

    pub fn parse(s: &str) -> FishResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FishError::UnsupportedProvider(s.to_string()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether a repository belongs to the user or to one of their organizations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    User,
    Org,
}

impl OwnerKind {
    pub fn key(&self) -> &'static str {
        match self {
            OwnerKind::User => "user",
            OwnerKind::Org => "org",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "user" => Some(OwnerKind::User),
            "org" => Some(OwnerKind::Org),
            _ => None,
        }
    }
}

/// Authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Organization the user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
}

/// Remote repository as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
}

/// Body of a repository creation request
#[derive(Debug, Serialize)]
pub(crate) struct CreateRepository<'a> {
    pub name: &'a str,
}

/// Uniform capability set over a hosting REST API
#[async_trait]
pub trait HostingProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Bind the API token used by every subsequent request
    fn set_token(&mut self, token: &str);

    async fn get_user(&self) -> FishResult<HostingUser>;

    async fn get_organizations(&self, user: &HostingUser) -> FishResult<Vec<Organization>>;

    /// `None` when the repository does not exist
    async fn get_repository(&self, owner: &str, name: &str) -> FishResult<Option<Repository>>;

    async fn create_user_repository(&self, name: &str) -> FishResult<Repository>;

    async fn create_org_repository(&self, name: &str, owner: &str) -> FishResult<Repository>;

    /// SSH remote URL for `owner/name`
    fn remote_url(&self, owner: &str, name: &str) -> String;

    /// Page where the operator can create a token
    fn token_creation_url(&self) -> &'static str;

    /// Documentation about authenticating with the provider
    fn token_help_url(&self) -> &'static str;
}

/// Builds provider clients for a selected kind
pub trait ProviderFactory {
    fn create(&self, kind: ProviderKind) -> Box<dyn HostingProvider>;
}

/// Factory for the real HTTP-backed providers
#[derive(Debug, Clone)]
pub struct HttpProviderFactory {
    user_agent: String,
}

impl HttpProviderFactory {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create(&self, kind: ProviderKind) -> Box<dyn HostingProvider> {
        match kind {
            ProviderKind::GitHub => Box::new(GitHub::new(&self.user_agent)),
            ProviderKind::Gitee => Box::new(Gitee::new(&self.user_agent)),
        }
    }
}
