//! Gitee (v5 API) provider

use super::api::{AuthScheme, RestClient};
use super::{
    CreateRepository, HostingProvider, HostingUser, Organization, ProviderKind, Repository,
};
use crate::error::FishResult;
use async_trait::async_trait;
use url::Url;

const API_BASE: &str = "https://gitee.com/api/v5";

pub struct Gitee {
    api: RestClient,
}

impl Gitee {
    pub fn new(user_agent: &str) -> Self {
        // Constant is a valid absolute URL
        let base = Url::parse(API_BASE).expect("valid Gitee API base");
        Self::with_base(base, user_agent)
    }

    pub fn with_base(base: Url, user_agent: &str) -> Self {
        Self {
            api: RestClient::new(
                ProviderKind::Gitee.display_name(),
                base,
                AuthScheme::AccessTokenQuery,
                user_agent,
            ),
        }
    }
}

#[async_trait]
impl HostingProvider for Gitee {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gitee
    }

    fn set_token(&mut self, token: &str) {
        self.api.set_token(token);
    }

    async fn get_user(&self) -> FishResult<HostingUser> {
        self.api.get(&["user"], &[]).await
    }

    async fn get_organizations(&self, user: &HostingUser) -> FishResult<Vec<Organization>> {
        self.api
            .get(
                &["users", user.login.as_str(), "orgs"],
                &[("page", "1"), ("per_page", "100")],
            )
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
        format!("git@gitee.com:{}/{}.git", owner, name)
    }

    fn token_creation_url(&self) -> &'static str {
        "https://gitee.com/personal_access_tokens"
    }

    fn token_help_url(&self) -> &'static str {
        "https://gitee.com/help/articles/4191"
    }
}
