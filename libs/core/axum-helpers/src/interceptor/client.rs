//! Outgoing HTTP client whose every call is timed.

use super::{Invocation, TimingInterceptor};
use reqwest::{Client, Request, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// `reqwest::Client` wrapper that routes each call through a [`TimingInterceptor`].
///
/// Non-2xx responses are failures (`error_for_status`), so they are never timed.
///
/// # Example
/// ```ignore
/// use axum_helpers::InterceptedClient;
///
/// let client = InterceptedClient::new(reqwest::Client::new());
/// let users: Vec<User> = client.get_json("http://localhost:8080/users").await?;
/// ```
#[derive(Clone, Debug)]
pub struct InterceptedClient {
    inner: Client,
    interceptor: TimingInterceptor,
}

impl InterceptedClient {
    pub const SIGNATURE_PREFIX: &'static str = "HttpClient::";

    pub fn new(inner: Client) -> Self {
        Self::with_interceptor(inner, TimingInterceptor::http_client())
    }

    pub fn with_interceptor(inner: Client, interceptor: TimingInterceptor) -> Self {
        Self { inner, interceptor }
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }

    fn invocation(method: &str) -> Invocation {
        Invocation::new(format!("{}{}", Self::SIGNATURE_PREFIX, method))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, reqwest::Error> {
        self.interceptor
            .around(Self::invocation("get_json").arg(url), async {
                self.inner
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<T>()
                    .await
            })
            .await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, reqwest::Error>
    where
        B: Serialize + fmt::Debug + ?Sized,
        T: DeserializeOwned,
    {
        self.interceptor
            .around(Self::invocation("post_json").arg(url).arg(body), async {
                self.inner
                    .post(url)
                    .json(body)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<T>()
                    .await
            })
            .await
    }

    pub async fn put_json<B, T>(&self, url: &str, body: &B) -> Result<T, reqwest::Error>
    where
        B: Serialize + fmt::Debug + ?Sized,
        T: DeserializeOwned,
    {
        self.interceptor
            .around(Self::invocation("put_json").arg(url).arg(body), async {
                self.inner
                    .put(url)
                    .json(body)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<T>()
                    .await
            })
            .await
    }

    pub async fn delete(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        self.interceptor
            .around(Self::invocation("delete").arg(url), async {
                let response = self.inner.delete(url).send().await?.error_for_status()?;
                Ok(response.status())
            })
            .await
    }

    /// Sends a prepared request. Only transport errors are failures here.
    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let invocation = Self::invocation("execute")
            .arg(request.method())
            .arg(request.url().as_str());
        self.interceptor
            .around(invocation, self.inner.execute(request))
            .await
    }
}
