use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use futures_util::StreamExt;
use grid_core::{RequestParams, Row};
use serde_json::Value;
use url::Url;

use crate::template::{expand_template, placeholders};
use crate::{FailureKind, FetchError, GridError};

const KNOWN_PARAMS: [&str; 6] = ["term", "orderby", "skip", "take", "page", "limit"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Relative templates resolve against this.
    pub base_url: Option<Url>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            base_url: None,
        }
    }
}

/// One remote operation: a page of rows or a total count.
#[async_trait::async_trait]
pub trait Fetch<T>: Send + Sync {
    async fn fetch(&self, params: &RequestParams) -> Result<T, FetchError>;
}

/// Adapts an async closure into a [`Fetch`] implementation.
pub struct FnFetcher<F> {
    f: F,
}

#[async_trait::async_trait]
impl<T, F, Fut> Fetch<T> for FnFetcher<F>
where
    F: Fn(RequestParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    T: Send + 'static,
{
    async fn fetch(&self, params: &RequestParams) -> Result<T, FetchError> {
        (self.f)(params.clone()).await
    }
}

/// Either a directly callable fetcher or a URL template with `{param}` placeholders.
pub enum FetchCapability<T> {
    Direct(Arc<dyn Fetch<T>>),
    UrlTemplate(String),
}

impl<T: Send + 'static> FetchCapability<T> {
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        Self::Direct(Arc::new(FnFetcher { f }))
    }

    pub fn url(template: impl Into<String>) -> Self {
        Self::UrlTemplate(template.into())
    }
}

impl<T> fmt::Debug for FetchCapability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchCapability::Direct(_) => f.write_str("Direct(..)"),
            FetchCapability::UrlTemplate(template) => {
                f.debug_tuple("UrlTemplate").field(template).finish()
            }
        }
    }
}

/// Row and count capabilities for an async grid. Both are required.
#[derive(Debug, Default)]
pub struct AsyncSources {
    pub data: Option<FetchCapability<Vec<Row>>>,
    pub count: Option<FetchCapability<u64>>,
}

impl AsyncSources {
    pub fn new(data: FetchCapability<Vec<Row>>, count: FetchCapability<u64>) -> Self {
        Self {
            data: Some(data),
            count: Some(count),
        }
    }

    /// Resolves both capabilities to uniform callables, validating templates up front
    /// against the instance's `url_params`.
    pub fn resolve(
        self,
        settings: &FetchSettings,
        url_params: &BTreeMap<String, String>,
    ) -> Result<ResolvedSources, GridError> {
        let data = self.data.ok_or(GridError::MissingCapability("data"))?;
        let count = self.count.ok_or(GridError::MissingCapability("count"))?;
        Ok(ResolvedSources {
            data: resolve(data, settings, url_params)?,
            count: resolve(count, settings, url_params)?,
        })
    }
}

#[derive(Clone)]
pub struct ResolvedSources {
    pub data: Arc<dyn Fetch<Vec<Row>>>,
    pub count: Arc<dyn Fetch<u64>>,
}

fn resolve<T>(
    capability: FetchCapability<T>,
    settings: &FetchSettings,
    url_params: &BTreeMap<String, String>,
) -> Result<Arc<dyn Fetch<T>>, GridError>
where
    TemplateFetcher: Fetch<T>,
    T: 'static,
{
    match capability {
        FetchCapability::Direct(fetcher) => Ok(fetcher),
        FetchCapability::UrlTemplate(template) => {
            Ok(Arc::new(TemplateFetcher::with_url_params(
                template,
                settings.clone(),
                url_params,
            )?))
        }
    }
}

/// GETs the expanded template and decodes the JSON body.
#[derive(Debug, Clone)]
pub struct TemplateFetcher {
    template: String,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl TemplateFetcher {
    pub fn new(template: impl Into<String>, settings: FetchSettings) -> Result<Self, GridError> {
        Self::with_url_params(template, settings, &BTreeMap::new())
    }

    /// Validates the template as it will be expanded for a grid carrying `url_params`.
    pub fn with_url_params(
        template: impl Into<String>,
        settings: FetchSettings,
        url_params: &BTreeMap<String, String>,
    ) -> Result<Self, GridError> {
        let template = template.into();
        let invalid = |reason: String| GridError::InvalidTemplate {
            template: template.clone(),
            reason,
        };
        if template.trim().is_empty() {
            return Err(invalid("template is empty".to_string()));
        }
        let probe_params = RequestParams {
            extra: url_params.clone(),
            ..RequestParams::default()
        };
        let probe = expand_template(&template, &probe_params.pairs());
        resolve_url(settings.base_url.as_ref(), &probe).map_err(|err| invalid(err.message))?;
        for name in placeholders(&template) {
            if !KNOWN_PARAMS.contains(&name) && !url_params.contains_key(name) {
                engine_debug!("template placeholder {{{}}} has no value and stays as-is", name);
            }
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| invalid(err.to_string()))?;

        Ok(Self {
            template,
            settings,
            client,
        })
    }

    pub fn url_for(&self, params: &RequestParams) -> Result<Url, FetchError> {
        let expanded = expand_template(&self.template, &params.pairs());
        resolve_url(self.settings.base_url.as_ref(), &expanded)
    }

    pub async fn rows(&self, params: &RequestParams) -> Result<Vec<Row>, FetchError> {
        match self.get_json(params).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(FetchError::new(
                FailureKind::Decode,
                format!("expected a JSON array of rows, got {}", kind_of(&other)),
            )),
        }
    }

    pub async fn count(&self, params: &RequestParams) -> Result<u64, FetchError> {
        let body = self.get_json(params).await?;
        parse_count(&body).ok_or_else(|| {
            FetchError::new(
                FailureKind::Decode,
                format!("expected a non-negative count, got {body}"),
            )
        })
    }

    async fn get_json(&self, params: &RequestParams) -> Result<Value, FetchError> {
        let url = self.url_for(params)?;
        engine_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetch<Vec<Row>> for TemplateFetcher {
    async fn fetch(&self, params: &RequestParams) -> Result<Vec<Row>, FetchError> {
        self.rows(params).await
    }
}

#[async_trait::async_trait]
impl Fetch<u64> for TemplateFetcher {
    async fn fetch(&self, params: &RequestParams) -> Result<u64, FetchError> {
        self.count(params).await
    }
}

fn resolve_url(base: Option<&Url>, raw: &str) -> Result<Url, FetchError> {
    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    let url = parsed.map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {other}"),
        )),
    }
}

/// Accepts a JSON number or a numeric string.
fn parse_count(body: &Value) -> Option<u64> {
    match body {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => {
            engine_warn!("count response is not a number: {}", body);
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
