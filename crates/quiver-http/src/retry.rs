use std::future::Future;
use std::time::{Duration, SystemTime};

use http::header::RETRY_AFTER;
use http::{HeaderMap, Method, StatusCode};
use tracing::info;

/// Retry policy configuration.
///
/// A response is retried when its status is in `retry_on_status_codes`, the
/// request method is in `allowed_methods`, fewer than `max_retries` retries
/// have happened, and the next delay still fits in the remaining
/// `retry_time_limit` budget. Once any of those fail, the last response is
/// returned as-is.
#[derive(Debug, Clone)]
pub struct RetryHandlerOptions {
    pub max_retries: u32,
    /// The delay before retry `n` is `backoff_factor * 2^(n-1)` seconds plus
    /// up to one second of jitter, capped at `backoff_max`.
    pub backoff_factor: f64,
    pub backoff_max: Duration,
    /// Cumulative budget across all delays of one request.
    pub retry_time_limit: Duration,
    pub retry_on_status_codes: Vec<StatusCode>,
    pub allowed_methods: Vec<Method>,
    /// When set, a parseable `Retry-After` response header overrides the
    /// computed backoff.
    pub respect_retry_after_header: bool,
}

impl Default for RetryHandlerOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.5,
            backoff_max: Duration::from_secs(120),
            retry_time_limit: Duration::from_secs(180),
            retry_on_status_codes: vec![
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ],
            allowed_methods: vec![
                Method::HEAD,
                Method::GET,
                Method::OPTIONS,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
            ],
            respect_retry_after_header: true,
        }
    }
}

impl RetryHandlerOptions {
    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        self.retry_on_status_codes.contains(&status)
    }

    pub fn is_method_retryable(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }
}

/// The response surface the retry loop needs. Separated from the concrete
/// client type so the loop is testable without a live transport.
pub trait RetryableResponse {
    fn status(&self) -> StatusCode;
    fn headers(&self) -> &HeaderMap;
}

impl RetryableResponse for wreq::Response {
    fn status(&self) -> StatusCode {
        wreq::Response::status(self)
    }

    fn headers(&self) -> &HeaderMap {
        wreq::Response::headers(self)
    }
}

/// `Retry-After` as a delay: either delta-seconds or an HTTP-date.
pub fn retry_after_delay(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let when = httpdate::parse_http_date(value).ok()?;
    when.duration_since(SystemTime::now()).ok()
}

/// Exponential-backoff request retrier layered over any send function.
pub struct RetryHandler {
    options: RetryHandlerOptions,
}

impl RetryHandler {
    pub fn new(options: RetryHandlerOptions) -> Self {
        Self { options }
    }

    fn backoff_delay(&self, retry_number: u32) -> Duration {
        let exponent = retry_number.saturating_sub(1).min(16);
        let backoff =
            Duration::from_secs_f64(self.options.backoff_factor * f64::from(1u32 << exponent));
        let jitter = Duration::from_millis(rand::random::<u64>() % 1000);
        (backoff + jitter).min(self.options.backoff_max)
    }

    fn delay_for(&self, retry_number: u32, headers: &HeaderMap) -> Duration {
        if self.options.respect_retry_after_header
            && let Some(delay) = retry_after_delay(headers)
        {
            return delay;
        }
        self.backoff_delay(retry_number)
    }

    /// Sends through `attempt` until the response is not retryable or the
    /// retry budget runs out; the last response is returned unmodified
    /// either way. `attempt` receives the zero-based retry count so the
    /// caller can stamp retried requests. Transport errors are not retried.
    pub async fn send<R, E, F, Fut>(&self, method: &Method, mut attempt: F) -> Result<R, E>
    where
        R: RetryableResponse,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let mut remaining = self.options.retry_time_limit;
        let mut retry_count: u32 = 0;
        loop {
            let response = attempt(retry_count).await?;
            if !self.options.is_method_retryable(method)
                || !self.options.is_retryable_status(response.status())
                || retry_count >= self.options.max_retries
            {
                return Ok(response);
            }
            let delay = self.delay_for(retry_count + 1, response.headers());
            if delay > remaining {
                return Ok(response);
            }
            info!(
                event = "request_retry",
                method = %method,
                status = response.status().as_u16(),
                attempt = retry_count + 1,
                delay_ms = delay.as_millis() as u64
            );
            tokio::time::sleep(delay).await;
            remaining = remaining.saturating_sub(delay);
            retry_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct StubResponse {
        status: StatusCode,
        headers: HeaderMap,
    }

    impl StubResponse {
        fn new(status: StatusCode) -> Self {
            Self {
                status,
                headers: HeaderMap::new(),
            }
        }

        fn with_retry_after(status: StatusCode, value: &str) -> Self {
            let mut headers = HeaderMap::new();
            headers.insert(RETRY_AFTER, value.parse().unwrap());
            Self { status, headers }
        }
    }

    impl RetryableResponse for StubResponse {
        fn status(&self) -> StatusCode {
            self.status
        }

        fn headers(&self) -> &HeaderMap {
            &self.headers
        }
    }

    fn instant_options() -> RetryHandlerOptions {
        RetryHandlerOptions {
            backoff_max: Duration::ZERO,
            ..RetryHandlerOptions::default()
        }
    }

    #[tokio::test]
    async fn retries_until_success() {
        let handler = RetryHandler::new(instant_options());
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let response: Result<StubResponse, Infallible> = handler
            .send(&Method::GET, |_| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Ok(StubResponse::new(StatusCode::SERVICE_UNAVAILABLE))
                    } else {
                        Ok(StubResponse::new(StatusCode::OK))
                    }
                }
            })
            .await;

        assert_eq!(response.unwrap().status(), StatusCode::OK);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_last_response() {
        let handler = RetryHandler::new(RetryHandlerOptions {
            max_retries: 2,
            ..instant_options()
        });
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let response: Result<StubResponse, Infallible> = handler
            .send(&Method::GET, |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(StubResponse::new(StatusCode::TOO_MANY_REQUESTS))
                }
            })
            .await;

        assert_eq!(response.unwrap().status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_allowed_methods_are_never_retried() {
        let handler = RetryHandler::new(instant_options());
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let response: Result<StubResponse, Infallible> = handler
            .send(&Method::POST, |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(StubResponse::new(StatusCode::SERVICE_UNAVAILABLE))
                }
            })
            .await;

        assert_eq!(response.unwrap().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_after_beyond_the_time_budget_stops_retrying() {
        let handler = RetryHandler::new(RetryHandlerOptions {
            retry_time_limit: Duration::from_secs(60),
            ..RetryHandlerOptions::default()
        });
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let response: Result<StubResponse, Infallible> = handler
            .send(&Method::GET, |_| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(StubResponse::with_retry_after(
                        StatusCode::TOO_MANY_REQUESTS,
                        "120",
                    ))
                }
            })
            .await;

        // 120s exceeds the 60s budget: no sleep, original response surfaced.
        assert_eq!(response.unwrap().status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_attempt_numbers_are_passed_through() {
        let handler = RetryHandler::new(RetryHandlerOptions {
            max_retries: 1,
            ..instant_options()
        });
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = seen.clone();

        let _: Result<StubResponse, Infallible> = handler
            .send(&Method::GET, |attempt| {
                let record = record.clone();
                async move {
                    record.lock().unwrap().push(attempt);
                    Ok(StubResponse::new(StatusCode::SERVICE_UNAVAILABLE))
                }
            })
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn retry_after_parses_seconds_and_http_dates() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "120".parse().unwrap());
        assert_eq!(retry_after_delay(&headers), Some(Duration::from_secs(120)));

        let future = SystemTime::now() + Duration::from_secs(30);
        headers.insert(RETRY_AFTER, httpdate::fmt_http_date(future).parse().unwrap());
        let delay = retry_after_delay(&headers).unwrap();
        assert!(delay <= Duration::from_secs(30));
        assert!(delay > Duration::from_secs(20));

        headers.insert(RETRY_AFTER, "garbage".parse().unwrap());
        assert_eq!(retry_after_delay(&headers), None);
    }

    #[test]
    fn backoff_grows_exponentially_and_caps() {
        let handler = RetryHandler::new(RetryHandlerOptions::default());
        let first = handler.backoff_delay(1);
        let third = handler.backoff_delay(3);
        // 0.5s and 2s bases, each with up to 1s of jitter.
        assert!(first >= Duration::from_millis(500) && first < Duration::from_millis(1500));
        assert!(third >= Duration::from_secs(2) && third < Duration::from_secs(3));

        let capped = RetryHandler::new(RetryHandlerOptions {
            backoff_max: Duration::from_secs(1),
            ..RetryHandlerOptions::default()
        });
        assert!(capped.backoff_delay(30) <= Duration::from_secs(1));
    }
}
