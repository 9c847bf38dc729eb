use anyhow::Context as _;
use anyhow::Result;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::Deserialize;

/// Abstraction over an async reqwest client to hide the low-level operations.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    url: String,
}

impl HttpClient {
    /// Initialise the low-level HTTP client for a cluster.
    pub fn new(hostname: &str) -> Result<HttpClient> {
        let client = Client::builder()
            .use_rustls_tls()
            .build()
            .context("unable to initialise the HTTP client")?;
        let url = format!("https://{}", hostname.trim_end_matches('/'));
        Ok(HttpClient { client, url })
    }

    /// Start a GET request to the cluster API.
    pub fn get(&self, uri: &str) -> RequestBuilder {
        let url = format!("{}{}", self.url, uri);
        self.client.get(&url)
    }

    /// Start a POST request to the cluster API.
    pub fn post(&self, uri: &str) -> RequestBuilder {
        let url = format!("{}{}", self.url, uri);
        self.client.post(&url)
    }

    /// Send a request to the cluster API.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .context("unable to send API request")?;
        let response = Response::build(response).await?;
        Ok(response)
    }
}

/// Response instance to store status code and JSON body.
pub struct Response {
    body: serde_json::Value,
    status: StatusCode,
}

impl Response {
    /// JSON-decode the response and add some utility methods.
    async fn build(response: reqwest::Response) -> Result<Response> {
        let status = response.status();
        let body = response
            .json()
            .await
            .context("unable to JSON decode API response")?;
        Ok(Response { body, status })
    }

    /// Decode the body of the response to the given type.
    pub fn body_as<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let body = self.body.clone();
        let body = serde_json::from_value(body)?;
        Ok(body)
    }

    /// Check the HTTP response status code for common errors.
    pub fn check_status(&self) -> Result<()> {
        match self.status {
            // Missing resources or expired sessions.
            StatusCode::NOT_FOUND => anyhow::bail!(super::ApiNotFound),

            // Status < 400 indicate success of the operation.
            status if status.as_u16() < 400 => Ok(()),

            // Other remote errors, reported by the API in the body.
            status => {
                let remote: Result<RemoteError, _> = serde_json::from_value(self.body.clone());
                match remote {
                    Ok(remote) => anyhow::bail!("(remote) {}", remote.error),
                    Err(_) => anyhow::bail!("API request failed with HTTP status {}", status),
                }
            }
        }
    }

    /// Access the response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error document returned by the cluster API.
#[derive(Deserialize)]
struct RemoteError {
    error: String,
}
