//! HTTP record client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use marcfix_core::Result;
use marcfix_core::error::{ApiError, ClientError, Error};
use marcfix_core::record::{Record, UpdateOptions, UpdateResponse};
use marcfix_core::traits::RecordClient;
use marcfix_core::types::{ApiUrl, RecordId};

use crate::credentials::Credentials;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn map_reqwest(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_connect() {
        ClientError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        ClientError::Decode {
            message: err.to_string(),
        }
    } else {
        ClientError::Http {
            message: err.to_string(),
        }
    };
    Error::Client(err)
}

/// Talks to the record API over HTTP(S), with basic auth when credentials
/// are configured.
///
/// Records are read with `GET {api}/bib/{id}` and written with
/// `POST {api}/bib/{id}`.
#[derive(Debug, Clone)]
pub struct HttpRecordClient {
    client: reqwest::Client,
    api: ApiUrl,
    credentials: Option<Credentials>,
}

impl HttpRecordClient {
    /// Create a client for the given API endpoint.
    ///
    /// Reads need no credentials; the API decides whether an anonymous
    /// update is allowed.
    pub fn new(api: ApiUrl, credentials: Option<Credentials>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("marcfix/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self {
            client,
            api,
            credentials,
        })
    }

    /// The API endpoint.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(credentials.username(), Some(credentials.password()))
            }
            None => request,
        }
    }

    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(%status, "API response");

        if status.is_success() {
            response.json::<R>().await.map_err(map_reqwest)
        } else {
            Err(Error::Client(ClientError::Api(
                self.parse_error_response(response).await,
            )))
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        ApiError::new(status, message)
    }
}

#[async_trait]
impl RecordClient for HttpRecordClient {
    #[instrument(skip(self), fields(api = %self.api, %id))]
    async fn load_record(&self, id: &RecordId) -> Result<Option<Record>> {
        let url = self.api.record_url(id);
        debug!(%url, "loading record");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(map_reqwest)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    #[instrument(skip(self, record), fields(api = %self.api, bypass = options.bypass_low_validation))]
    async fn update_record(
        &self,
        record: &Record,
        options: &UpdateOptions,
    ) -> Result<UpdateResponse> {
        let id = record.id()?;
        let url = self.api.record_url(&id);
        debug!(%id, "updating record");

        let mut request = self.authorize(self.client.post(&url)).json(record);
        if options.bypass_low_validation {
            request = request.query(&[("bypass_low_validation", "true")]);
        }

        let response = request.send().await.map_err(map_reqwest)?;
        self.handle_response(response).await
    }
}
