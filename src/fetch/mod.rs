mod basic;
mod client;
mod error;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use error::FetchError;

/// Issues a GET for `url` with `query` appended and returns the response body.
///
/// Non-success statuses are returned as [`FetchError::Status`] rather than
/// handing an error page to the caller.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    query: &[(&str, String)],
) -> Result<Vec<u8>, FetchError> {
    let mut url = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }

    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    Ok(resp.bytes().await?.to_vec())
}


#[cfg(test)]
mod tests {
    use super::testing::CannedClient;
    use super::*;

    #[tokio::test]
    async fn test_fetch_bytes_appends_query() {
        let client = CannedClient::new(200, "{}");
        let query = [
            ("filter[route]", "Green-B".to_string()),
            ("filter[direction_id]", "0".to_string()),
        ];

        let body = fetch_bytes(&client, "https://api-v3.mbta.com/predictions", &query)
            .await
            .unwrap();

        assert_eq!(body, b"{}");
        let url = client.last_url();
        assert!(url.starts_with("https://api-v3.mbta.com/predictions?"));
        assert!(url.contains("filter%5Broute%5D=Green-B"));
        assert!(url.contains("filter%5Bdirection_id%5D=0"));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_error_status() {
        let client = CannedClient::new(429, "slow down");
        let err = fetch_bytes(&client, "https://api-v3.mbta.com/predictions", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(429)));
    }

    #[tokio::test]
    async fn test_fetch_bytes_invalid_url() {
        let client = CannedClient::new(200, "");
        let err = fetch_bytes(&client, "not a url", &[]).await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(client.seen.lock().unwrap().is_empty());
    }
}
