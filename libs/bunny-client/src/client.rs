use std::fmt;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{classify_response, Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.bunny.net/";
pub const DEFAULT_USER_AGENT: &str = concat!("bunny-client/", env!("CARGO_PKG_VERSION"));

const ACCESS_KEY_HEADER: &str = "AccessKey";

/// Client for the bunny.net REST API
///
/// Every operation issues exactly one HTTP request. Nothing is retried.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    user_agent: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"***hidden***")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[derive(Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    user_agent: String,
}

impl ClientBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut base_url = self.base_url;
        // Url::join replaces the last segment unless the base ends with a slash
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url).map_err(|err| Error::InvalidUrl {
            path: base_url.clone(),
            reason: err.to_string(),
        })?;

        Ok(Client {
            http: reqwest::Client::builder().build()?,
            base_url,
            api_key: self.api_key,
            user_agent: self.user_agent,
        })
    }
}

impl Client {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Resolve `path` against the base url
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidUrl {
                path: path.to_owned(),
                reason: err.to_string(),
            })
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!(
            %method,
            %url,
            access_key = "***hidden***",
            user_agent = %self.user_agent,
            "sending bunny.net api request"
        );
        self.http
            .request(method, url.clone())
            .header(ACCESS_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), %url, len = body.len(), "received bunny.net api response");

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(classify_response(status.as_u16(), url.as_str(), &body))
        }
    }

    fn decode<T: DeserializeOwned>(url: &Url, body: &[u8]) -> Result<T> {
        serde_json::from_slice(body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.send(self.request(Method::GET, &url), &url).await?;
        Self::decode(&url, &body)
    }

    /// GET whose successful response body is ignored
    pub(crate) async fn get_no_content(&self, url: Url) -> Result<()> {
        self.send(self.request(Method::GET, &url), &url).await?;
        Ok(())
    }

    pub(crate) async fn post<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, &url).json(body);
        let body = self.send(request, &url).await?;
        Self::decode(&url, &body)
    }

    /// POST whose successful response body is ignored
    pub(crate) async fn post_no_content<B>(&self, url: Url, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, &url).json(body);
        self.send(request, &url).await?;
        Ok(())
    }

    pub(crate) async fn delete<B>(&self, url: Url, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(Method::DELETE, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn paths_are_joined_to_base_url() {
        let client = Client::new("key").unwrap();
        assert_eq!(
            client.url("pullzone/42").unwrap().as_str(),
            "https://api.bunny.net/pullzone/42"
        );
        assert_eq!(
            client.url("/pullzone/42/addCertificate").unwrap().as_str(),
            "https://api.bunny.net/pullzone/42/addCertificate"
        );
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let client = Client::builder("key")
            .base_url("http://localhost:8080/api")
            .build()
            .unwrap();
        assert_eq!(
            client.url("storagezone/3").unwrap().as_str(),
            "http://localhost:8080/api/storagezone/3"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Client::builder("key").base_url("not a url").build();
        assert!(matches!(err, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = Client::new("secret-key").unwrap();
        let output = format!("{client:?}");
        assert!(!output.contains("secret-key"));
        assert!(output.contains("***hidden***"));
    }

    #[test]
    fn user_agent_can_be_overridden() {
        let client = Client::builder("key")
            .user_agent("terraform-provider-bunny/0.1.0")
            .build()
            .unwrap();
        assert_eq!(client.user_agent(), "terraform-provider-bunny/0.1.0");
    }
}
