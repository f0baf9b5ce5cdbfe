use futures::stream::{self, LocalBoxStream, StreamExt};
use js_sys::{Object, Promise, Reflect, Uint8Array};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, ReadableStreamDefaultReader, Request, RequestCredentials, RequestInit, Response};

use super::{ApiError, QueryParams, RetryPolicy};
use crate::i18n::Locale;

pub const API_PREFIX: &str = "/api/v1";

/// Byte chunks of a streamed response body, in arrival order.
pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>, ApiError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully built request, independent of how it gets sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builds and sends requests against the dashboard API.
///
/// The locale is injected at construction time; every request carries the
/// matching `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base: String,
    locale: Locale,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(locale: Locale) -> Self {
        Self {
            base: API_PREFIX.to_string(),
            locale,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Resolves a resource path against the API prefix. Paths that already
    /// include the prefix are left alone.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with(&self.base) {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base.trim_end_matches('/'), path)
    }

    pub fn get(&self, path: &str, params: &QueryParams) -> RequestSpec {
        RequestSpec {
            method: Method::Get,
            url: params.append_to(&self.url(path)),
            headers: self.default_headers("application/json"),
            body: None,
        }
    }

    pub fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        accept: &str,
    ) -> Result<RequestSpec, ApiError> {
        let mut headers = self.default_headers(accept);
        headers.push(("Content-Type".to_string(), "application/json".to_string()));
        Ok(RequestSpec {
            method: Method::Post,
            url: self.url(path),
            headers,
            body: Some(serde_json::to_string(body)?),
        })
    }

    fn default_headers(&self, accept: &str) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), accept.to_string()),
            ("Accept-Language".to_string(), self.locale.accept_language()),
        ]
    }

    /// GET returning the untyped JSON payload.
    pub async fn get_json(&self, path: &str, params: &QueryParams) -> Result<Value, ApiError> {
        self.get_json_at(&self.get(path, params).url).await
    }

    /// GET against an already built URL (see [`ApiClient::get`]).
    pub async fn get_json_at(&self, url: &str) -> Result<Value, ApiError> {
        let spec = RequestSpec {
            method: Method::Get,
            url: url.to_string(),
            headers: self.default_headers("application/json"),
            body: None,
        };
        let response = self.send_with_retry(&spec).await?;
        read_json(&response).await
    }

    pub async fn get_typed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, ApiError> {
        let value = self.get_json(path, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POSTs a JSON body and hands back the response body as a byte stream.
    /// `Ok(None)` means the response had no readable body.
    pub async fn post_stream<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Option<ByteStream>, ApiError> {
        let spec = self.post_json(path, body, "text/event-stream")?;
        let response = self.send_with_retry(&spec).await?;
        Ok(response.body().map(|body| {
            let reader: ReadableStreamDefaultReader = body.get_reader().unchecked_into();
            reader_stream(reader)
        }))
    }

    async fn send_with_retry(&self, spec: &RequestSpec) -> Result<Response, ApiError> {
        let mut attempt = 0;
        loop {
            match send(spec).await {
                Err(e) if e.is_conflict() => match self.retry.delay_for(attempt) {
                    Some(delay) => {
                        debug!("409 on {}, retrying in {delay:?}", spec.url);
                        sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        warn!("Giving up on {} after {attempt} conflict retries", spec.url);
                        return Err(e);
                    }
                },
                other => return other,
            }
        }
    }
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Transport(
        e.as_string()
            .or_else(|| {
                Reflect::get(&e, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{e:?}")),
    )
}

/// Sends one request through the browser `fetch` API. Non-2xx statuses are
/// turned into `ApiError::Status`.
async fn send(spec: &RequestSpec) -> Result<Response, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;

    let headers = Headers::new().map_err(js_error)?;
    for (name, value) in &spec.headers {
        headers.set(name, value).map_err(js_error)?;
    }

    let init = RequestInit::new();
    init.set_method(spec.method.as_str());
    init.set_credentials(RequestCredentials::SameOrigin);
    init.set_headers(&headers);
    if let Some(body) = &spec.body {
        init.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(&spec.url, &init).map_err(js_error)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if response.ok() {
        Ok(response)
    } else {
        let message = read_text(&response).await.unwrap_or_default();
        Err(ApiError::Status {
            status: response.status(),
            message,
        })
    }
}

async fn read_text(response: &Response) -> Result<String, ApiError> {
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))
}

async fn read_json(response: &Response) -> Result<Value, ApiError> {
    let text = read_text(response).await?;
    Ok(serde_json::from_str(&text)?)
}

async fn read_chunk(reader: &ReadableStreamDefaultReader) -> Result<Option<Vec<u8>>, ApiError> {
    let result: Object = JsFuture::from(reader.read())
        .await
        .map_err(js_error)?
        .unchecked_into();
    let done = Reflect::get(&result, &JsValue::from_str("done"))
        .map_err(js_error)?
        .as_bool()
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(&result, &JsValue::from_str("value")).map_err(js_error)?;
    Ok(Some(Uint8Array::new(&value).to_vec()))
}

fn reader_stream(reader: ReadableStreamDefaultReader) -> ByteStream {
    stream::unfold(Some(reader), |reader| async move {
        let reader = reader?;
        match read_chunk(&reader).await {
            Ok(Some(bytes)) => Some((Ok(bytes), Some(reader))),
            Ok(None) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
    .boxed_local()
}

pub(crate) async fn sleep(duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                .ok()
        });
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRequest;

    fn client() -> ApiClient {
        ApiClient::new(Locale::new("nl"))
    }

    #[test]
    fn test_get_builds_prefixed_url_with_locale() {
        let params = QueryParams::new().with("page", 1u32).with("title", "");
        let spec = client().get("/docs/documents", &params);
        assert_eq!(spec.method, Method::Get);
        assert_eq!(spec.url, "/api/v1/docs/documents?page=1");
        assert_eq!(spec.header("accept-language"), Some("nl-NL"));
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_url_keeps_existing_prefix() {
        assert_eq!(client().url("/api/v1/meet/rooms"), "/api/v1/meet/rooms");
        assert_eq!(client().url("drive/documents"), "/api/v1/drive/documents");
    }

    #[test]
    fn test_post_json_for_stream() {
        let spec = client()
            .post_json(
                "/ai/chat/completions",
                &ChatRequest {
                    prompt: "Hoi".to_string(),
                },
                "text/event-stream",
            )
            .unwrap();
        assert_eq!(spec.method, Method::Post);
        assert_eq!(spec.header("Accept"), Some("text/event-stream"));
        assert_eq!(spec.header("Content-Type"), Some("application/json"));
        assert_eq!(spec.body.as_deref(), Some(r#"{"prompt":"Hoi"}"#));
    }
}
