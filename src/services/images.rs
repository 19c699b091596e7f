//! Offer image download.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::utils::http::fetch_bytes;

/// Downloads the main image of a new offer.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`ImageFetcher`] over plain HTTP GET. Non-success statuses are errors.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        fetch_bytes(&self.client, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"yay".to_vec()))
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::new(Client::new());
        let bytes = fetcher
            .fetch(&format!("{}/img.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, b"yay");
    }

    #[tokio::test]
    async fn test_fetch_missing_image_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpImageFetcher::new(Client::new());
        assert!(fetcher
            .fetch(&format!("{}/missing.jpg", server.uri()))
            .await
            .is_err());
    }
}
