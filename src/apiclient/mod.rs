//! Stratus cluster API client implementing the session contracts.
use std::sync::Arc;

use anyhow::Context as _;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as Json;
use slog::debug;
use slog::Logger;

use crate::accounts::Account;
use crate::session::InvalidCredentials;
use crate::session::NotConnected;
use crate::session::Prompter;
use crate::session::Session;
use crate::session::SessionFactory;
use crate::session::SessionHandle;

mod http;

const ENDPOINT_LOGIN: &str = "/api/v1/auth/login";
const ENDPOINT_LOGIN_ADMIN: &str = "/api/v1/auth/admin/login";
const ENDPOINT_IMPERSONATE: &str = "/api/v1/auth/impersonate";
const ENDPOINT_PROJECTS: &str = "/api/v1/projects";
const ENDPOINT_REVISIONS: &str = "revisions";
const ENDPOINT_SESSIONS: &str = "/api/v1/sessions";

/// Authenticate sessions over the Stratus cluster HTTP API.
pub struct HttpSessionFactory {
    logger: Logger,
}

impl HttpSessionFactory {
    pub fn new(logger: Logger) -> HttpSessionFactory {
        HttpSessionFactory { logger }
    }

    /// Obtain a bearer token for the account, prompting for the password when allowed.
    ///
    /// Without a password and without `retry` the attempt soft-fails into
    /// `None` so the caller can hand out an unconnected session.
    async fn authenticate(
        &self,
        client: &http::HttpClient,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        prompter: &Arc<dyn Prompter>,
        endpoint: &str,
    ) -> Result<Option<String>> {
        let password = match password {
            Some(password) => password.to_string(),
            None if !retry => return Ok(None),
            None => prompt_password(prompter, account).await?,
        };
        debug!(
            self.logger, "about to POST login request";
            "endpoint" => endpoint,
            "hostname" => account.hostname.as_str(),
            "username" => account.username.as_str(),
        );
        let request = client.post(endpoint).json(&LoginRequest {
            username: &account.username,
            password: &password,
        });
        let response = client
            .send(request)
            .await
            .context("unable to authenticate")?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            anyhow::bail!(InvalidCredentials::for_account(account));
        }
        response.check_status()?;
        let login: LoginResponse = response
            .body_as()
            .context("unable to decode login response")?;
        Ok(Some(login.token))
    }

    fn session(
        &self,
        account: &Account,
        client: http::HttpClient,
        token: Option<String>,
    ) -> SessionHandle {
        let session = HttpSession {
            account: account.clone(),
            client,
            logger: self.logger.clone(),
            token,
        };
        Arc::new(session)
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn user_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle> {
        let client = http::HttpClient::new(&account.hostname)?;
        let token = self
            .authenticate(&client, account, password, retry, prompter, ENDPOINT_LOGIN)
            .await?;
        Ok(self.session(account, client, token))
    }

    async fn admin_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle> {
        let client = http::HttpClient::new(&account.hostname)?;
        let token = self
            .authenticate(
                &client,
                account,
                password,
                retry,
                prompter,
                ENDPOINT_LOGIN_ADMIN,
            )
            .await?;
        Ok(self.session(account, client, token))
    }
}

/// Session backed by the Stratus cluster HTTP API.
#[derive(Debug)]
struct HttpSession {
    account: Account,
    client: http::HttpClient,
    logger: Logger,
    token: Option<String>,
}

impl HttpSession {
    /// Fetch records from a list endpoint, with an optional filter expression.
    async fn records(&self, uri: &str, filter: Option<&str>) -> Result<Vec<Json>> {
        let token = self.bearer()?;
        debug!(
            self.logger, "about to GET records";
            "uri" => uri,
            "filter" => filter.unwrap_or("<all>"),
        );
        let mut request = self.client.get(uri).bearer_auth(token);
        if let Some(filter) = filter {
            request = request.query(&[("filter", filter)]);
        }
        let response = self
            .client
            .send(request)
            .await
            .context("unable to fetch records")?;
        response.check_status()?;
        response.body_as().context("unable to decode records")
    }

    fn bearer(&self) -> Result<&str> {
        match &self.token {
            Some(token) => Ok(token),
            None => Err(NotConnected::for_account(&self.account).into()),
        }
    }
}

#[async_trait]
impl Session for HttpSession {
    fn connected(&self) -> bool {
        self.token.is_some()
    }

    fn account(&self) -> &Account {
        &self.account
    }

    async fn impersonate(&self, username: &str) -> Result<SessionHandle> {
        let token = self.bearer()?;
        debug!(
            self.logger, "about to POST impersonation request";
            "hostname" => self.account.hostname.as_str(),
            "username" => username,
        );
        let request = self
            .client
            .post(ENDPOINT_IMPERSONATE)
            .bearer_auth(token)
            .json(&ImpersonateRequest { username });
        let response = self
            .client
            .send(request)
            .await
            .context("unable to impersonate user")?;
        response.check_status()?;
        let login: LoginResponse = response
            .body_as()
            .context("unable to decode impersonation response")?;
        let account = Account {
            hostname: self.account.hostname.clone(),
            username: username.to_string(),
        };
        let session = HttpSession {
            account,
            client: self.client.clone(),
            logger: self.logger.clone(),
            token: Some(login.token),
        };
        Ok(Arc::new(session))
    }

    async fn project_list(&self, filter: Option<&str>) -> Result<Vec<Json>> {
        self.records(ENDPOINT_PROJECTS, filter).await
    }

    async fn revision_list(&self, project_id: &str, filter: Option<&str>) -> Result<Vec<Json>> {
        let uri = format!("{}/{}/{}", ENDPOINT_PROJECTS, project_id, ENDPOINT_REVISIONS);
        self.records(&uri, filter).await
    }

    async fn session_list(&self, filter: Option<&str>) -> Result<Vec<Json>> {
        self.records(ENDPOINT_SESSIONS, filter).await
    }
}

/// Prompt for the account's password off the async runtime.
async fn prompt_password(prompter: &Arc<dyn Prompter>, account: &Account) -> Result<String> {
    let prompter = Arc::clone(prompter);
    let label = format!("{}@{}", account.username, account.hostname);
    let password = tokio::task::spawn_blocking(move || prompter.password(&label)).await??;
    Ok(password)
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
struct ImpersonateRequest<'a> {
    username: &'a str,
}

/// Return in case of an API 404 response.
#[derive(thiserror::Error, Debug)]
#[error("API resource not found")]
pub struct ApiNotFound;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::accounts::Account;
    use crate::session::fixture::PrompterFixture;
    use crate::session::NotConnected;
    use crate::session::Prompter;
    use crate::session::SessionFactory;

    use super::HttpSessionFactory;

    fn account() -> Account {
        Account {
            hostname: "stratus.example.com".to_string(),
            username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_password_without_retry_soft_fails() {
        let factory = HttpSessionFactory::new(crate::logging::null());
        let prompter = Arc::new(PrompterFixture::scripted("", "", ""));
        let as_prompter: Arc<dyn Prompter> = prompter.clone();
        let session = factory
            .user_session(&account(), None, false, &as_prompter)
            .await
            .expect("session to be built");
        assert!(!session.connected());
        assert_eq!(session.account(), &account());
        assert_eq!(prompter.prompts(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn unconnected_session_cannot_impersonate() {
        let factory = HttpSessionFactory::new(crate::logging::null());
        let prompter: Arc<dyn Prompter> = Arc::new(PrompterFixture::scripted("", "", ""));
        let session = factory
            .admin_session(&account(), None, false, &prompter)
            .await
            .expect("session to be built");
        let error = session
            .impersonate("bob")
            .await
            .expect_err("impersonation to fail");
        assert!(error.downcast_ref::<NotConnected>().is_some());
    }

    #[tokio::test]
    async fn unconnected_session_cannot_list_records() {
        let factory = HttpSessionFactory::new(crate::logging::null());
        let prompter: Arc<dyn Prompter> = Arc::new(PrompterFixture::scripted("", "", ""));
        let session = factory
            .user_session(&account(), None, false, &prompter)
            .await
            .expect("session to be built");
        let error = session
            .project_list(None)
            .await
            .expect_err("listing to fail");
        assert!(error.downcast_ref::<NotConnected>().is_some());
    }
}
