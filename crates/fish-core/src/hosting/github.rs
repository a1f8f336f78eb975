//! GitHub REST API provider

use super::api::{AuthScheme, RestClient};
use super::{
    CreateRepository, HostingProvider, HostingUser, Organization, ProviderKind, Repository,
};
use crate::error::FishResult;
use async_trait::async_trait;
use url::Url;

const API_BASE: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github+json";

pub struct GitHub {
    api: RestClient,
}

impl GitHub {
    pub fn new(user_agent: &str) -> Self {
        // Constant is a valid absolute URL
        let base = Url::parse(API_BASE).expect("valid GitHub API base");
        Self::with_base(base, user_agent)
    }

    /// Point the client at another API root (GitHub Enterprise, tests)
    pub fn with_base(base: Url, user_agent: &str) -> Self {
        Self {
            api: RestClient::new(
                ProviderKind::GitHub.display_name(),
                base,
                AuthScheme::TokenHeader { accept: ACCEPT },
                user_agent,
            ),
        }
    }
}

#[async_trait]
impl HostingProvider for GitHub {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    fn set_token(&mut self, token: &str) {
        self.api.set_token(token);
    }

    async fn get_user(&self) -> FishResult<HostingUser> {
        self.api.get(&["user"], &[]).await
    }

    async fn get_organizations(&self, _user: &HostingUser) -> FishResult<Vec<Organization>> {
        self.api
            .get(&["user", "orgs"], &[("page", "1"), ("per_page", "100")])
            .await
    }

    async fn get_repository(&self, owner: &str, name: &str) -> FishResult<Option<Repository>> {
        self.api.get_optional(&["repos", owner, name], &[]).await
    }

    async fn create_user_repository(&self, name: &str) -> FishResult<Repository> {
        self.api
            .post(&["user", "repos"], &CreateRepository { name })
            .await
    }

    async fn create_org_repository(&self, name: &str, owner: &str) -> FishResult<Repository> {
        self.api
            .post(&["orgs", owner, "repos"], &CreateRepository { name })
            .await
    }

    fn remote_url(&self, owner: &str, name: &str) -> String {
        format!("git@github.com:{}/{}.git", owner, name)
    }

    fn token_creation_url(&self) -> &'static str {
        "https://github.com/settings/tokens"
    }

    fn token_help_url(&self) -> &'static str {
        "https://docs.github.com/en/authentication/keeping-your-account-and-data-secure/managing-your-personal-access-tokens"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FishError;
    use crate::test_support::serve_once;

    #[test]
    fn test_remote_url() {
        let github = GitHub::new("test");
        assert_eq!(github.remote_url("acme", "proj"), "git@github.com:acme/proj.git");
    }

    #[tokio::test]
    async fn test_get_user() {
        let (base, request) = serve_once(200, r#"{"login":"octocat","name":"Octo Cat"}"#).await;
        let mut github = GitHub::with_base(base, "test");
        github.set_token("secret");

        let user = github.get_user().await.unwrap();
        assert_eq!(user.login, "octocat");

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /user "));
        assert!(request.contains("authorization: token secret"));
    }

    #[tokio::test]
    async fn test_missing_repository_is_none() {
        let (base, request) = serve_once(404, r#"{"message":"Not Found"}"#).await;
        let github = GitHub::with_base(base, "test");

        assert!(github.get_repository("acme", "proj").await.unwrap().is_none());
        assert!(request.await.unwrap().starts_with("GET /repos/acme/proj "));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (base, _request) = serve_once(401, r#"{"message":"Bad credentials"}"#).await;
        let github = GitHub::with_base(base, "test");

        let err = github.get_user().await.unwrap_err();
        assert!(matches!(err, FishError::AuthenticationInvalid { ref detail, .. } if detail == "Bad credentials"));
    }

    #[tokio::test]
    async fn test_create_org_repository() {
        let (base, request) =
            serve_once(201, r#"{"name":"proj","full_name":"acme/proj"}"#).await;
        let github = GitHub::with_base(base, "test");

        let repo = github.create_org_repository("proj", "acme").await.unwrap();
        assert_eq!(repo.full_name.as_deref(), Some("acme/proj"));

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /orgs/acme/repos "));
        assert!(request.ends_with(r#"{"name":"proj"}"#));
    }

    #[tokio::test]
    async fn test_server_error_attaches_provider_message() {
        let (base, _request) = serve_once(422, r#"{"message":"Validation Failed"}"#).await;
        let github = GitHub::with_base(base, "test");

        let err = github.create_user_repository("proj").await.unwrap_err();
        match err {
            FishError::HostingUnavailable { status, detail, .. } => {
                assert_eq!(status, Some(422));
                assert_eq!(detail, "Validation Failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
