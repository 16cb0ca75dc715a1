use async_trait::async_trait;
use roster_http::HttpClient;
use tracing::instrument;
use url::Url;
use users_sdk::{Failure, Greeting, GreetingClient};

use super::failure_from_http;

/// Fetches the banner from `GET {base}/api/v1/hello`.
pub struct HttpGreetingClient {
    client: HttpClient,
    hello_url: Url,
}

impl HttpGreetingClient {
    #[must_use]
    pub fn new(client: HttpClient, hello_url: Url) -> Self {
        Self { client, hello_url }
    }
}

#[async_trait]
impl GreetingClient for HttpGreetingClient {
    #[instrument(skip_all, fields(url = %self.hello_url))]
    async fn fetch_greeting(&self) -> Result<Greeting, Failure> {
        self.client
            .get(self.hello_url.as_str())
            .send()
            .await
            .map_err(|e| failure_from_http(&e))?
            .json()
            .await
            .map_err(|e| failure_from_http(&e))
    }
}
