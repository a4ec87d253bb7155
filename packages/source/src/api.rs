//! `reqwest`-backed [`ZoneSource`] for the public data portal endpoint.
//!
//! Issues one GET per query with a fixed page size and page number. The
//! portal caps the response at that page size, so larger result sets are
//! truncated upstream; [`crate::loader`] detects and reports this.

use std::time::Duration;

use async_trait::async_trait;
use freezing_zones_zone_models::raw::ZoneEnvelope;

use crate::source_def::{ApiConfig, SourceDefinition};
use crate::{SourceError, ZoneQuery, ZoneSource, http};

/// Live upstream source.
pub struct OpenApiSource {
    definition: SourceDefinition,
    config: ApiConfig,
    client: reqwest::Client,
}

impl OpenApiSource {
    /// Builds a client with the definition's connect and read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(definition: SourceDefinition, config: ApiConfig) -> Result<Self, SourceError> {
        let timeout = Duration::from_secs(definition.timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(definition, config, client))
    }

    const fn with_client(
        definition: SourceDefinition,
        config: ApiConfig,
        client: reqwest::Client,
    ) -> Self {
        Self {
            definition,
            config,
            client,
        }
    }

    /// Builds a source from the embedded definition and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the definition is malformed, the service
    /// key is missing, or the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, SourceError> {
        let definition = SourceDefinition::embedded()?;
        let config = ApiConfig::from_env(&definition)?;
        Self::new(definition, config)
    }

    /// Returns the definition this source was built from.
    #[must_use]
    pub const fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    /// Builds the upstream query parameters for `query`.
    #[must_use]
    pub fn query_params(&self, query: &ZoneQuery) -> Vec<(String, String)> {
        let names = &self.definition.params;
        vec![
            (names.service_key.clone(), self.config.service_key.clone()),
            (names.year.clone(), query.year.to_string()),
            (names.province.clone(), query.province.clone()),
            (names.district.clone(), query.district.clone()),
            (
                names.response_type.clone(),
                self.definition.response_type.clone(),
            ),
            (
                names.page_size.clone(),
                self.definition.page_size.to_string(),
            ),
            (names.page_no.clone(), self.definition.page_no.to_string()),
        ]
    }
}

#[async_trait]
impl ZoneSource for OpenApiSource {
    fn id(&self) -> &str {
        &self.definition.id
    }

    async fn fetch(&self, query: &ZoneQuery) -> Result<ZoneEnvelope, SourceError> {
        log::info!(
            "[{}] Fetching year={} siDo={:?} guGun={:?} (numOfRows={}, pageNo={})",
            self.definition.id,
            query.year,
            query.province,
            query.district,
            self.definition.page_size,
            self.definition.page_no,
        );

        let params = self.query_params(query);
        let body = http::send_json(self.client.get(&self.config.api_url).query(&params)).await?;
        let envelope: ZoneEnvelope = serde_json::from_value(body)?;

        log::debug!(
            "[{}] Received {} item wrapper(s), totalCount={:?}",
            self.definition.id,
            envelope.wrappers().len(),
            envelope.total_count(),
        );

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use freezing_zones_zone_models::Year;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response on a local port and returns the
    /// endpoint URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/getRestFrequentzoneFreezing")
    }

    fn local_source(api_url: String) -> OpenApiSource {
        let definition = SourceDefinition::embedded().unwrap();
        let config = ApiConfig {
            api_url,
            service_key: "secret-key".to_string(),
        };
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        OpenApiSource::with_client(definition, config, client)
    }

    fn year_query() -> ZoneQuery {
        ZoneQuery::for_year(Year::new(2023).unwrap())
    }

    #[tokio::test]
    async fn server_error_is_status_error_with_redacted_url() {
        let url = serve_once("500 Internal Server Error", "{}").await;

        let err = local_source(url).fetch(&year_query()).await.unwrap_err();

        match err {
            SourceError::Status { status, url } => {
                assert_eq!(status, 500);
                assert!(url.contains("serviceKey="));
                assert!(!url.contains("secret-key"));
                assert!(url.contains("searchYearCd=2023"));
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_json_error() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = local_source(url).fetch(&year_query()).await.unwrap_err();

        assert!(matches!(err, SourceError::Json(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn json_body_decodes_envelope() {
        let url = serve_once(
            "200 OK",
            r#"{"resultCode":"00","totalCount":"1","items":[{"item":{"sido_sgg_nm":"강원 춘천시","la_crd":"37.88","lo_crd":"127.72","occrrnc_cnt":"4"}}]}"#,
        )
        .await;

        let envelope = local_source(url).fetch(&year_query()).await.unwrap();

        assert_eq!(envelope.wrappers().len(), 1);
        assert_eq!(envelope.total_count(), Some(1));
    }

    fn source() -> OpenApiSource {
        let definition = SourceDefinition::embedded().unwrap();
        let config = ApiConfig {
            api_url: definition.api_url.clone(),
            service_key: "test-key".to_string(),
        };
        OpenApiSource::new(definition, config).unwrap()
    }

    #[test]
    fn builds_single_page_query() {
        let query = ZoneQuery {
            province: "42".to_string(),
            ..ZoneQuery::for_year(Year::new(2022).unwrap())
        };
        let params = source().query_params(&query);
        let get = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("serviceKey"), Some("test-key"));
        assert_eq!(get("searchYearCd"), Some("2022"));
        assert_eq!(get("siDo"), Some("42"));
        assert_eq!(get("guGun"), Some(""));
        assert_eq!(get("type"), Some("json"));
        assert_eq!(get("numOfRows"), Some("500"));
        assert_eq!(get("pageNo"), Some("1"));
    }

    #[test]
    fn uses_definition_id() {
        assert_eq!(source().id(), "koroad_freezing_zones");
    }
}
