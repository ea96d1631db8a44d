use std::fmt;

use async_trait::async_trait;
use ne_core::{Bookmarker, Error, InstapaperConfig, Result};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};

/// Client for Instapaper's simple `add` API.
pub struct InstapaperBookmarker {
    client: Client,
    base_url: String,
    username: String,
    password: SecretString,
}

impl fmt::Debug for InstapaperBookmarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstapaperBookmarker")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl InstapaperBookmarker {
    pub fn new(client: Client, config: &InstapaperConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: SecretString::from(config.password.expose_secret().to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/add", self.base_url)
    }
}

#[async_trait]
impl Bookmarker for InstapaperBookmarker {
    fn name(&self) -> &str {
        "Instapaper"
    }

    async fn add(&self, url: &str, title: Option<&str>) -> Result<()> {
        let mut params = vec![("url", url)];
        if let Some(title) = title {
            params.push(("title", title));
        }

        let response = self
            .client
            .get(self.endpoint())
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .query(&params)
            .send()
            .await?;

        // The API answers 201 Created on success and nothing else.
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(Error::Notification { status: status.as_u16() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> InstapaperConfig {
        InstapaperConfig {
            base_url,
            username: "reader".to_string(),
            password: SecretString::from("hunter2".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_sends_credentials_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/add"))
            .and(basic_auth("reader", "hunter2"))
            .and(query_param("url", "https://bucket/news/a.html?sig=1"))
            .and(query_param("title", "今日のニュース"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let bookmarker = InstapaperBookmarker::new(Client::new(), &config(server.uri()));
        bookmarker
            .add("https://bucket/news/a.html?sig=1", Some("今日のニュース"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_absent_title_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/add"))
            .and(query_param_is_missing("title"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let bookmarker = InstapaperBookmarker::new(Client::new(), &config(format!("{}/", server.uri())));
        bookmarker.add("https://bucket/a.html", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_created_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let bookmarker = InstapaperBookmarker::new(Client::new(), &config(server.uri()));
        let err = bookmarker.add("https://bucket/a.html", None).await.unwrap_err();
        assert!(matches!(err, Error::Notification { status: 200 }));
        assert_eq!(err.to_string(), "HTTP 200: Failed to push to Instapaper");
    }

    #[test]
    fn test_debug_redacts_password() {
        let bookmarker = InstapaperBookmarker::new(Client::new(), &config("http://x".to_string()));
        let debug = format!("{:?}", bookmarker);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
