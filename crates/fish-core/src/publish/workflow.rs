//! Resumable publish bootstrap
//!
//! Steps run in a fixed order. Every interactive answer is persisted in the
//! `CredentialStore` the first time it is given and reused on later runs, so a
//! failed run resumes from the first step that has nothing saved. The
//! `PublishOptions` refresh flags force a step to ask again.
//!
//! 1. Ensure the credential root exists
//! 2. Select the hosting provider
//! 3. Obtain and bind the API token
//! 4. Fetch the authenticated user and their organizations
//! 5. Select the owning account
//! 6. Find or create the remote repository
//! 7. Write a default ignore file
//! 8. Initialize the local repository and its `origin` remote
//! 9. Stage pending changes and commit them
//!
//! Step 8 is skipped when the project already has a `.git` directory, but
//! step 9 still runs, so pending work in an existing repository is committed
//! on every publish. Earlier releases skipped the commit for existing
//! repositories as well.
//!
//! Nothing is retried. Network and provider failures abort the run.

use super::ignore::ensure_ignore_file;
use super::{Ownership, ProjectInfo, PublishOptions, PublishOutcome};
use crate::credentials::{CredentialKey, CredentialStore};
use crate::error::{FishError, FishResult};
use crate::hosting::{
    HostingProvider, HostingUser, Organization, OwnerKind, ProviderFactory, ProviderKind,
    Repository,
};
use crate::prompt::{Choice, Prompter};
use crate::vcs::VersionControl;
use tracing::{debug, info};

/// Marker directory of an initialized local repository
const LOCAL_REPOSITORY_MARKER: &str = ".git";

const ORIGIN: &str = "origin";

pub struct PublishWorkflow<'a> {
    project: ProjectInfo,
    options: PublishOptions,
    store: CredentialStore,
    prompter: &'a mut dyn Prompter,
    vcs: &'a dyn VersionControl,
    providers: &'a dyn ProviderFactory,
}

impl<'a> PublishWorkflow<'a> {
    pub fn new(
        project: ProjectInfo,
        options: PublishOptions,
        store: CredentialStore,
        prompter: &'a mut dyn Prompter,
        vcs: &'a dyn VersionControl,
        providers: &'a dyn ProviderFactory,
    ) -> Self {
        Self {
            project,
            options,
            store,
            prompter,
            vcs,
            providers,
        }
    }

    pub async fn run(mut self) -> FishResult<PublishOutcome> {
        self.store.ensure_root()?;
        debug!(root = %self.store.root().display(), "credential root ready");

        let kind = self.select_provider()?;
        let mut provider = self.providers.create(kind);
        self.obtain_token(provider.as_mut())?;

        let (user, orgs) = fetch_identity(provider.as_ref()).await?;
        let owner = self.select_ownership(&user, &orgs)?;

        let (repository, created_repository) = self
            .ensure_remote_repository(provider.as_ref(), &owner)
            .await?;

        if ensure_ignore_file(&self.project.dir)? {
            self.prompter.success("Wrote default .gitignore")?;
        }

        let remote_url = provider.remote_url(&owner.login, &self.project.name);
        let initialized = self.ensure_local_repository(&remote_url).await?;
        let commit = self.stage_and_commit().await?;

        info!(
            provider = kind.key(),
            owner = %owner.login,
            repository = %repository.name,
            "publish complete"
        );
        Ok(PublishOutcome {
            provider: kind,
            owner,
            repository,
            created_repository,
            remote_url,
            initialized,
            commit,
        })
    }

    fn select_provider(&mut self) -> FishResult<ProviderKind> {
        if !self.options.refresh_provider {
            if let Some(saved) = self.store.read(CredentialKey::Provider)? {
                let kind = ProviderKind::parse(&saved)?;
                info!(provider = kind.key(), "using saved hosting provider");
                return Ok(kind);
            }
        }

        let choices: Vec<Choice> = ProviderKind::ALL
            .iter()
            .map(|kind| Choice::new(kind.key(), kind.display_name()))
            .collect();
        let answer = self.prompter.select(
            "Select a hosting platform",
            &choices,
            Some(ProviderKind::GitHub.key()),
        )?;
        let kind = ProviderKind::parse(&answer)?;

        self.store.write(CredentialKey::Provider, kind.key())?;
        self.prompter
            .success(&format!("Saved hosting platform: {}", kind))?;
        Ok(kind)
    }

    fn obtain_token(&mut self, provider: &mut dyn HostingProvider) -> FishResult<()> {
        let saved = if self.options.refresh_token {
            None
        } else {
            self.store.read(CredentialKey::Token)?
        };

        let token = match saved {
            Some(token) => {
                info!(path = %self.store.path(CredentialKey::Token).display(), "using saved token");
                token
            }
            None => {
                let kind = provider.kind();
                self.prompter.warning(&format!(
                    "A {} token is required. Create one at {} (help: {})",
                    kind,
                    provider.token_creation_url(),
                    provider.token_help_url()
                ))?;

                let token = loop {
                    let answer = self.prompter.password(&format!("Paste your {} token", kind))?;
                    let answer = answer.trim();
                    if !answer.is_empty() {
                        break answer.to_string();
                    }
                };

                self.store.write(CredentialKey::Token, &token)?;
                self.prompter.success(&format!(
                    "Saved token to {}",
                    self.store.path(CredentialKey::Token).display()
                ))?;
                token
            }
        };

        provider.set_token(&token);
        Ok(())
    }

    fn select_ownership(
        &mut self,
        user: &HostingUser,
        orgs: &[Organization],
    ) -> FishResult<Ownership> {
        if !self.options.refresh_owner {
            let saved_kind = self.store.read(CredentialKey::OwnerKind)?;
            let saved_login = self.store.read(CredentialKey::OwnerLogin)?;
            if let (Some(saved_kind), Some(login)) = (saved_kind, saved_login) {
                let kind = OwnerKind::parse(&saved_kind).ok_or_else(|| {
                    FishError::OwnershipAmbiguous(format!("unknown owner kind '{}'", saved_kind))
                })?;
                info!(owner = %login, kind = kind.key(), "using saved owner");
                return Ok(Ownership { kind, login });
            }
        }

        let mut choices = vec![Choice::new(OwnerKind::User.key(), "Personal account")];
        if !orgs.is_empty() {
            choices.push(Choice::new(OwnerKind::Org.key(), "Organization"));
        }
        let answer = self.prompter.select(
            "Select repository owner",
            &choices,
            Some(OwnerKind::User.key()),
        )?;
        let kind = OwnerKind::parse(&answer).ok_or_else(|| {
            FishError::OwnershipAmbiguous(format!("unknown owner kind '{}'", answer))
        })?;

        let login = match kind {
            OwnerKind::User => user.login.clone(),
            OwnerKind::Org => {
                if orgs.is_empty() {
                    return Err(FishError::OwnershipAmbiguous(format!(
                        "{} does not belong to any organization",
                        user.login
                    )));
                }
                let choices: Vec<Choice> = orgs
                    .iter()
                    .map(|org| Choice::new(&org.login, &org.login))
                    .collect();
                self.prompter
                    .select("Select an organization", &choices, None)?
            }
        };

        self.store.write(CredentialKey::OwnerKind, kind.key())?;
        self.store.write(CredentialKey::OwnerLogin, &login)?;
        self.prompter
            .success(&format!("Saved repository owner: {}", login))?;
        Ok(Ownership { kind, login })
    }

    async fn ensure_remote_repository(
        &mut self,
        provider: &dyn HostingProvider,
        owner: &Ownership,
    ) -> FishResult<(Repository, bool)> {
        let name = &self.project.name;
        if let Some(repository) = provider.get_repository(&owner.login, name).await? {
            info!(owner = %owner.login, name = %name, "remote repository exists");
            return Ok((repository, false));
        }

        let created = match owner.kind {
            OwnerKind::User => provider.create_user_repository(name).await,
            OwnerKind::Org => provider.create_org_repository(name, &owner.login).await,
        };
        let repository = created.map_err(|e| FishError::RepositoryCreationFailed {
            owner: owner.login.clone(),
            name: name.clone(),
            reason: e.to_string(),
        })?;

        self.prompter.success(&format!(
            "Created remote repository {}/{}",
            owner.login, repository.name
        ))?;
        Ok((repository, true))
    }

    /// Returns true if the local repository was initialized by this call
    async fn ensure_local_repository(&mut self, remote_url: &str) -> FishResult<bool> {
        if self.project.dir.join(LOCAL_REPOSITORY_MARKER).exists() {
            debug!(dir = %self.project.dir.display(), "local repository already initialized");
            self.prompter.info("Local repository already initialized")?;
            return Ok(false);
        }

        self.vcs.init().await?;
        let remotes = self.vcs.get_remotes().await?;
        debug!(?remotes, "git remotes");
        if !remotes.iter().any(|remote| remote.name == ORIGIN) {
            self.vcs.add_remote(ORIGIN, remote_url).await?;
        }

        self.prompter
            .success(&format!("Initialized repository with {} {}", ORIGIN, remote_url))?;
        Ok(true)
    }

    async fn stage_and_commit(&mut self) -> FishResult<Option<String>> {
        let status = self.vcs.status().await?;
        debug!(?status, "working tree status");
        if status.has_conflicts() {
            return Err(FishError::WorkingTreeConflict {
                paths: status.conflicted,
            });
        }

        if !status.has_changes() {
            debug!("nothing to commit");
            return Ok(None);
        }

        let pending = status.pending_paths();
        if !pending.is_empty() {
            self.vcs.add(&pending).await?;
        }
        let message = loop {
            let answer = self.prompter.input("Commit message")?;
            let answer = answer.trim();
            if !answer.is_empty() {
                break answer.to_string();
            }
        };
        self.vcs.commit(&message).await?;

        self.prompter
            .success(&format!("Committed: {}", message))?;
        Ok(Some(message))
    }
}

async fn fetch_identity(
    provider: &dyn HostingProvider,
) -> FishResult<(HostingUser, Vec<Organization>)> {
    let user = provider.get_user().await?;
    let orgs = provider.get_organizations(&user).await?;
    info!(login = %user.login, organizations = orgs.len(), "fetched account");
    Ok((user, orgs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::{Remote, RepositoryStatus};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type Events = Arc<Mutex<Vec<String>>>;

    fn record(events: &Events, event: impl Into<String>) {
        events.lock().unwrap().push(event.into());
    }

    struct ScriptedPrompter {
        events: Events,
        answers: VecDeque<String>,
    }

    impl ScriptedPrompter {
        fn answer(&mut self, kind: &str, message: &str) -> FishResult<String> {
            record(&self.events, format!("{}:{}", kind, message));
            self.answers.pop_front().ok_or_else(|| {
                FishError::Prompt(std::io::Error::other(format!("unexpected prompt: {}", message)))
            })
        }
    }

    impl Prompter for ScriptedPrompter {
        fn select(
            &mut self,
            message: &str,
            _choices: &[Choice],
            _default: Option<&str>,
        ) -> FishResult<String> {
            self.answer("select", message)
        }

        fn input(&mut self, message: &str) -> FishResult<String> {
            self.answer("input", message)
        }

        fn password(&mut self, message: &str) -> FishResult<String> {
            self.answer("password", message)
        }

        fn confirm(&mut self, message: &str, _default: bool) -> FishResult<bool> {
            Ok(self.answer("confirm", message)? == "y")
        }

        fn info(&mut self, _message: &str) -> FishResult<()> {
            Ok(())
        }

        fn warning(&mut self, _message: &str) -> FishResult<()> {
            Ok(())
        }

        fn success(&mut self, _message: &str) -> FishResult<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeFactory {
        events: Events,
        orgs: Vec<String>,
        existing: bool,
        fail_create: bool,
    }

    impl ProviderFactory for FakeFactory {
        fn create(&self, kind: ProviderKind) -> Box<dyn HostingProvider> {
            Box::new(FakeProvider {
                kind,
                config: self.clone(),
            })
        }
    }

    struct FakeProvider {
        kind: ProviderKind,
        config: FakeFactory,
    }

    impl FakeProvider {
        fn repository(name: &str) -> Repository {
            Repository {
                name: name.to_string(),
                full_name: None,
                html_url: None,
                ssh_url: None,
            }
        }

        fn create(&self, event: String, name: &str) -> FishResult<Repository> {
            record(&self.config.events, event);
            if self.config.fail_create {
                return Err(FishError::HostingUnavailable {
                    provider: self.kind.to_string(),
                    status: Some(422),
                    detail: "name already exists".into(),
                });
            }
            Ok(Self::repository(name))
        }
    }

    #[async_trait]
    impl HostingProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn set_token(&mut self, token: &str) {
            record(&self.config.events, format!("set_token:{}", token));
        }

        async fn get_user(&self) -> FishResult<HostingUser> {
            record(&self.config.events, "get_user");
            Ok(HostingUser {
                login: "alice".into(),
                name: None,
            })
        }

        async fn get_organizations(&self, user: &HostingUser) -> FishResult<Vec<Organization>> {
            record(&self.config.events, format!("get_organizations:{}", user.login));
            Ok(self
                .config
                .orgs
                .iter()
                .map(|login| Organization {
                    login: login.clone(),
                })
                .collect())
        }

        async fn get_repository(&self, owner: &str, name: &str) -> FishResult<Option<Repository>> {
            record(&self.config.events, format!("get_repository:{}/{}", owner, name));
            Ok(self.config.existing.then(|| Self::repository(name)))
        }

        async fn create_user_repository(&self, name: &str) -> FishResult<Repository> {
            self.create(format!("create_user_repository:{}", name), name)
        }

        async fn create_org_repository(&self, name: &str, owner: &str) -> FishResult<Repository> {
            self.create(format!("create_org_repository:{}@{}", name, owner), name)
        }

        fn remote_url(&self, owner: &str, name: &str) -> String {
            format!("git@fake:{}/{}.git", owner, name)
        }

        fn token_creation_url(&self) -> &'static str {
            "https://fake.example/tokens"
        }

        fn token_help_url(&self) -> &'static str {
            "https://fake.example/help"
        }
    }

    struct FakeVcs {
        events: Events,
        dir: PathBuf,
        status: RepositoryStatus,
    }

    #[async_trait]
    impl VersionControl for FakeVcs {
        async fn status(&self) -> FishResult<RepositoryStatus> {
            record(&self.events, "status");
            Ok(self.status.clone())
        }

        async fn add(&self, paths: &[String]) -> FishResult<()> {
            record(&self.events, format!("add:{}", paths.join(",")));
            Ok(())
        }

        async fn commit(&self, message: &str) -> FishResult<()> {
            record(&self.events, format!("commit:{}", message));
            Ok(())
        }

        async fn init(&self) -> FishResult<()> {
            record(&self.events, "init");
            std::fs::create_dir_all(self.dir.join(".git")).unwrap();
            Ok(())
        }

        async fn add_remote(&self, name: &str, url: &str) -> FishResult<()> {
            record(&self.events, format!("add_remote:{}={}", name, url));
            Ok(())
        }

        async fn get_remotes(&self) -> FishResult<Vec<Remote>> {
            record(&self.events, "get_remotes");
            Ok(Vec::new())
        }
    }

    struct Fixture {
        home: TempDir,
        project_dir: TempDir,
        events: Events,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                home: TempDir::new().unwrap(),
                project_dir: TempDir::new().unwrap(),
                events: Events::default(),
            }
        }

        fn store(&self) -> CredentialStore {
            CredentialStore::new(self.home.path().join(".git"))
        }

        fn factory(&self) -> FakeFactory {
            FakeFactory {
                events: self.events.clone(),
                ..Default::default()
            }
        }

        fn remember(&self, provider: &str, token: &str, kind: &str, login: &str) {
            let store = self.store();
            store.write(CredentialKey::Provider, provider).unwrap();
            store.write(CredentialKey::Token, token).unwrap();
            store.write(CredentialKey::OwnerKind, kind).unwrap();
            store.write(CredentialKey::OwnerLogin, login).unwrap();
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn prompts(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter(|e| {
                    e.starts_with("select:") || e.starts_with("password:") || e.starts_with("input:")
                })
                .collect()
        }

        fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        async fn publish(
            &self,
            answers: &[&str],
            options: PublishOptions,
            factory: &FakeFactory,
            status: RepositoryStatus,
        ) -> FishResult<PublishOutcome> {
            let project = ProjectInfo {
                name: "proj".into(),
                version: "1.0.0".into(),
                dir: self.project_dir.path().to_path_buf(),
            };
            let mut prompter = ScriptedPrompter {
                events: self.events.clone(),
                answers: answers.iter().map(|a| a.to_string()).collect(),
            };
            let vcs = FakeVcs {
                events: self.events.clone(),
                dir: self.project_dir.path().to_path_buf(),
                status,
            };

            PublishWorkflow::new(project, options, self.store(), &mut prompter, &vcs, factory)
                .run()
                .await
        }
    }

    #[tokio::test]
    async fn test_fresh_run_prompts_before_repository_lookup() {
        let fx = Fixture::new();
        let outcome = fx
            .publish(
                &["github", "tok123", "user"],
                PublishOptions::default(),
                &fx.factory(),
                RepositoryStatus::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            fx.events(),
            vec![
                "select:Select a hosting platform",
                "password:Paste your GitHub token",
                "set_token:tok123",
                "get_user",
                "get_organizations:alice",
                "select:Select repository owner",
                "get_repository:alice/proj",
                "create_user_repository:proj",
                "init",
                "get_remotes",
                "add_remote:origin=git@fake:alice/proj.git",
                "status",
            ]
        );
        assert!(outcome.created_repository);
        assert!(outcome.initialized);
        assert!(outcome.commit.is_none());
        assert_eq!(outcome.owner.login, "alice");

        let store = fx.store();
        assert_eq!(store.read(CredentialKey::Provider).unwrap().as_deref(), Some("github"));
        assert_eq!(store.read(CredentialKey::Token).unwrap().as_deref(), Some("tok123"));
        assert_eq!(store.read(CredentialKey::OwnerKind).unwrap().as_deref(), Some("user"));
        assert_eq!(store.read(CredentialKey::OwnerLogin).unwrap().as_deref(), Some("alice"));
        assert!(fx.project_dir.path().join(".gitignore").is_file());
    }

    #[tokio::test]
    async fn test_second_run_asks_nothing() {
        let fx = Fixture::new();
        let factory = fx.factory();
        fx.publish(
            &["github", "tok123", "user"],
            PublishOptions::default(),
            &factory,
            RepositoryStatus::default(),
        )
        .await
        .unwrap();
        fx.clear();

        let outcome = fx
            .publish(&[], PublishOptions::default(), &factory, RepositoryStatus::default())
            .await
            .unwrap();

        assert!(fx.prompts().is_empty());
        assert!(fx.events().contains(&"set_token:tok123".to_string()));
        assert!(!outcome.initialized);
    }

    #[tokio::test]
    async fn test_existing_repository_is_not_created() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "org", "acme");
        let factory = FakeFactory {
            existing: true,
            ..fx.factory()
        };

        let outcome = fx
            .publish(&[], PublishOptions::default(), &factory, RepositoryStatus::default())
            .await
            .unwrap();

        let events = fx.events();
        assert!(events.contains(&"get_repository:acme/proj".to_string()));
        assert!(!events.iter().any(|e| e.starts_with("create_")));
        assert!(!outcome.created_repository);
        assert!(fx.project_dir.path().join(".gitignore").is_file());
    }

    #[tokio::test]
    async fn test_conflicts_stop_before_staging() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "user", "alice");
        let status = RepositoryStatus {
            conflicted: vec!["a.txt".into()],
            modified: vec!["b.txt".into()],
            ..Default::default()
        };

        let err = fx
            .publish(&[], PublishOptions::default(), &fx.factory(), status)
            .await
            .unwrap_err();

        match err {
            FishError::WorkingTreeConflict { paths } => assert_eq!(paths, vec!["a.txt"]),
            other => panic!("unexpected error: {other}"),
        }
        let events = fx.events();
        assert!(!events.iter().any(|e| e.starts_with("add:") || e.starts_with("commit:")));
    }

    #[tokio::test]
    async fn test_empty_commit_message_reprompts() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "user", "alice");
        let status = RepositoryStatus {
            modified: vec!["b.txt".into()],
            ..Default::default()
        };

        let outcome = fx
            .publish(&["", "fix bug"], PublishOptions::default(), &fx.factory(), status)
            .await
            .unwrap();

        let events = fx.events();
        assert_eq!(
            events.iter().filter(|e| *e == "input:Commit message").count(),
            2
        );
        let commits: Vec<_> = events.iter().filter(|e| e.starts_with("commit:")).collect();
        assert_eq!(commits, vec!["commit:fix bug"]);
        assert!(events.contains(&"add:b.txt".to_string()));
        assert_eq!(outcome.commit.as_deref(), Some("fix bug"));
    }

    #[tokio::test]
    async fn test_staged_removal_is_committed_without_adding() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "user", "alice");
        let status = RepositoryStatus {
            deleted: vec!["gone.txt".into()],
            staged_removals: vec!["gone.txt".into()],
            ..Default::default()
        };

        let outcome = fx
            .publish(&["drop file"], PublishOptions::default(), &fx.factory(), status)
            .await
            .unwrap();

        let events = fx.events();
        assert!(!events.iter().any(|e| e.starts_with("add:")));
        assert!(events.contains(&"commit:drop file".to_string()));
        assert_eq!(outcome.commit.as_deref(), Some("drop file"));
    }

    #[tokio::test]
    async fn test_org_repository_creation() {
        let fx = Fixture::new();
        let factory = FakeFactory {
            orgs: vec!["acme".into(), "initech".into()],
            ..fx.factory()
        };

        let outcome = fx
            .publish(
                &["gitee", "tok", "org", "acme"],
                PublishOptions::default(),
                &factory,
                RepositoryStatus::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.provider, ProviderKind::Gitee);
        assert_eq!(
            outcome.owner,
            Ownership {
                kind: OwnerKind::Org,
                login: "acme".into()
            }
        );
        assert!(fx
            .events()
            .contains(&"create_org_repository:proj@acme".to_string()));
        assert_eq!(
            fx.store().read(CredentialKey::OwnerKind).unwrap().as_deref(),
            Some("org")
        );
    }

    #[tokio::test]
    async fn test_creation_failure_is_fatal() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "user", "alice");
        let factory = FakeFactory {
            fail_create: true,
            ..fx.factory()
        };

        let err = fx
            .publish(&[], PublishOptions::default(), &factory, RepositoryStatus::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FishError::RepositoryCreationFailed { ref owner, .. } if owner == "alice"));
        assert!(!fx.events().contains(&"init".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_token_only_asks_for_token() {
        let fx = Fixture::new();
        fx.remember("github", "old", "user", "alice");
        let options = PublishOptions {
            refresh_token: true,
            ..Default::default()
        };

        fx.publish(&["", "new"], options, &fx.factory(), RepositoryStatus::default())
            .await
            .unwrap();

        assert_eq!(
            fx.prompts(),
            vec!["password:Paste your GitHub token", "password:Paste your GitHub token"]
        );
        assert_eq!(fx.store().read(CredentialKey::Token).unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_existing_local_repository_skips_init() {
        let fx = Fixture::new();
        fx.remember("github", "tok", "user", "alice");
        std::fs::create_dir(fx.project_dir.path().join(".git")).unwrap();
        let status = RepositoryStatus {
            not_added: vec!["README.md".into()],
            ..Default::default()
        };

        let outcome = fx
            .publish(&["docs"], PublishOptions::default(), &fx.factory(), status)
            .await
            .unwrap();

        let events = fx.events();
        assert!(!events.contains(&"init".to_string()));
        assert!(!events.iter().any(|e| e.starts_with("add_remote:")));
        assert!(!outcome.initialized);
        assert_eq!(outcome.commit.as_deref(), Some("docs"));
    }

    #[tokio::test]
    async fn test_unknown_saved_provider() {
        let fx = Fixture::new();
        fx.remember("gitlab", "tok", "user", "alice");

        let err = fx
            .publish(&[], PublishOptions::default(), &fx.factory(), RepositoryStatus::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FishError::UnsupportedProvider(_)));
    }
}
