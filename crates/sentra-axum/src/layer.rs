//! Edge enforcement filter
//!
//! Tower middleware that gates every inbound request: allow-listed paths
//! pass untouched; everything else must present a bearer access credential
//! that verifies locally (signature + expiry + kind). Verified identity
//! attributes are injected as headers, replacing any client-supplied values
//! of the same names, and as an [`AuthContext`] request extension.
//!
//! All credential failure states collapse into one bodiless `401`; the
//! response never reveals which check failed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderName, HeaderValue, Request, Response, StatusCode};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use sentra_auth_core::{hash_token, RevocationStore, StoreError, TokenCodec};

use crate::context::AuthContext;
use crate::path::PathMatcher;
use crate::{BEARER_PREFIX, HEADER_TENANT_ID, HEADER_USERNAME, HEADER_USER_ID};

/// How the filter treats revocation.
///
/// `CacheOnly` trusts local verification alone: a logged-out credential
/// stays accepted until natural expiry (staleness bounded by the access
/// validity). `StoreChecked` pays one store round trip per request for zero
/// staleness and fails closed when the store is unreachable.
#[derive(Clone, Default)]
pub enum RevocationPolicy {
    #[default]
    CacheOnly,
    StoreChecked(Arc<dyn RevocationStore>),
}

impl std::fmt::Debug for RevocationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CacheOnly => write!(f, "CacheOnly"),
            Self::StoreChecked(_) => write!(f, "StoreChecked"),
        }
    }
}

/// Configuration for the edge filter
#[derive(Debug, Clone, Default)]
pub struct EdgeConfig {
    /// Paths forwarded with no credential check
    pub allow_paths: PathMatcher,
    /// Revocation policy (default: cache-only)
    pub policy: RevocationPolicy,
}

impl EdgeConfig {
    /// Create a config with the given allow-list patterns
    #[must_use]
    pub fn new<I, P>(allow_patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            allow_paths: PathMatcher::new(allow_patterns),
            policy: RevocationPolicy::CacheOnly,
        }
    }

    /// Set the revocation policy
    #[must_use]
    pub fn with_policy(mut self, policy: RevocationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Tower layer that adds edge credential enforcement to a service
#[derive(Clone)]
pub struct EdgeLayer {
    codec: Arc<TokenCodec>,
    config: Arc<EdgeConfig>,
}

impl EdgeLayer {
    #[must_use]
    pub fn new(codec: TokenCodec, config: EdgeConfig) -> Self {
        Self {
            codec: Arc::new(codec),
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for EdgeLayer {
    type Service = EdgeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EdgeService {
            inner,
            codec: Arc::clone(&self.codec),
            config: Arc::clone(&self.config),
        }
    }
}

/// The edge enforcement service
#[derive(Clone)]
pub struct EdgeService<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    config: Arc<EdgeConfig>,
}

impl<S> EdgeService<S> {
    /// Verify the request's bearer credential locally.
    ///
    /// Returns the context and raw credential on success; `None` for every
    /// failure state (missing, malformed, bad signature, wrong kind,
    /// expired) so the caller answers a uniform 401.
    fn verify(&self, req: &Request<Body>) -> Option<(AuthContext, String)> {
        let token = extract_bearer(req)?;

        let claims = match self.codec.decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("edge rejected credential: {}", e);
                return None;
            }
        };
        if claims.is_expired() {
            tracing::debug!("edge rejected expired credential");
            return None;
        }
        // Refresh credentials never pass where an access credential is
        // required
        let Ok(context) = AuthContext::try_from(&claims) else {
            tracing::debug!("edge rejected non-access credential");
            return None;
        };

        Some((context, token))
    }
}

/// Extract the bearer credential using the fixed scheme prefix
fn extract_bearer(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix(BEARER_PREFIX).map(str::to_string)
}

/// Overwrite identity headers with verified values and attach the context.
///
/// Client-supplied values of the same names are removed first; downstream
/// services may treat these headers as authoritative.
fn annotate(req: &mut Request<Body>, context: &AuthContext) {
    let user_id = HeaderName::from_static(HEADER_USER_ID);
    let username = HeaderName::from_static(HEADER_USERNAME);
    let tenant_id = HeaderName::from_static(HEADER_TENANT_ID);

    let headers = req.headers_mut();
    headers.remove(&user_id);
    headers.remove(&username);
    headers.remove(&tenant_id);

    if let Ok(value) = HeaderValue::from_str(&context.identity_id.to_string()) {
        headers.insert(user_id, value);
    }
    if let Ok(value) = HeaderValue::from_str(&context.display_name) {
        headers.insert(username, value);
    }
    if let Ok(value) = HeaderValue::from_str(&context.tenant_id.to_string()) {
        headers.insert(tenant_id, value);
    }

    req.extensions_mut().insert(context.clone());
}

type StoreFuture = Pin<Box<dyn Future<Output = Result<bool, StoreError>> + Send>>;

impl<S, ResBody> Service<Request<Body>> for EdgeService<S>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = EdgeFuture<S, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Allow-listed paths forward with no credential check
        if self.config.allow_paths.matches(req.uri().path()) {
            return EdgeFuture {
                state: State::Calling {
                    future: self.inner.call(req),
                },
            };
        }

        let Some((context, token)) = self.verify(&req) else {
            return EdgeFuture {
                state: State::Reject,
            };
        };

        match &self.config.policy {
            RevocationPolicy::CacheOnly => {
                annotate(&mut req, &context);
                EdgeFuture {
                    state: State::Calling {
                        future: self.inner.call(req),
                    },
                }
            }
            RevocationPolicy::StoreChecked(store) => {
                let store = Arc::clone(store);
                let key = hash_token(&token);
                let future: StoreFuture =
                    Box::pin(async move { store.contains(&key).await });
                EdgeFuture {
                    state: State::CheckingRevocation {
                        future,
                        inner: Some(self.inner.clone()),
                        req: Some(req),
                        context: Some(context),
                    },
                }
            }
        }
    }
}

pin_project! {
    /// Future for the edge enforcement service
    pub struct EdgeFuture<S, ResBody>
    where
        S: Service<Request<Body>, Response = Response<ResBody>>,
    {
        #[pin]
        state: State<S, ResBody>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<S, ResBody>
    where
        S: Service<Request<Body>, Response = Response<ResBody>>,
    {
        CheckingRevocation {
            future: StoreFuture,
            inner: Option<S>,
            req: Option<Request<Body>>,
            context: Option<AuthContext>,
        },
        Calling {
            #[pin]
            future: S::Future,
        },
        Reject,
        Done,
    }
}

/// Uniform bodiless 401; no detail about which check failed
fn unauthorized<ResBody: Default>() -> Response<ResBody> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .body(ResBody::default())
        .unwrap()
}

impl<S, ResBody> Future for EdgeFuture<S, ResBody>
where
    S: Service<Request<Body>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ResBody: Default + Send + 'static,
{
    type Output = Result<S::Response, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let this = self.as_mut().project();

            match this.state.project() {
                StateProj::CheckingRevocation {
                    future,
                    inner,
                    req,
                    context,
                } => match future.as_mut().poll(cx) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(Ok(false)) => {
                        let mut request = req.take().expect("request taken once");
                        let ctx = context.take().expect("context taken once");
                        annotate(&mut request, &ctx);
                        let mut service = inner.take().expect("service taken once");
                        let future = service.call(request);
                        self.set(EdgeFuture {
                            state: State::Calling { future },
                        });
                    }
                    Poll::Ready(Ok(true)) => {
                        tracing::debug!("edge rejected revoked credential");
                        self.set(EdgeFuture { state: State::Done });
                        return Poll::Ready(Ok(unauthorized()));
                    }
                    Poll::Ready(Err(e)) => {
                        // Fail closed: unreachable store never means
                        // "not revoked"
                        tracing::error!("revocation check failed: {}", e);
                        self.set(EdgeFuture { state: State::Done });
                        return Poll::Ready(Ok(unauthorized()));
                    }
                },
                StateProj::Calling { future } => {
                    return future.poll(cx);
                }
                StateProj::Reject => {
                    self.set(EdgeFuture { state: State::Done });
                    return Poll::Ready(Ok(unauthorized()));
                }
                StateProj::Done => {
                    panic!("polled after completion");
                }
            }
        }
    }
}
