use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
    Router,
};
use futures_util::future::BoxFuture;
use http::StatusCode;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{self, Poll},
};
use tower::{Service, ServiceExt};

/// Ordered list of handlers that serve emoji images
///
/// Every handler gets a shot at the request in registration order.
/// A `404 Not Found` passes the request on to the next handler, any other response is final.
/// If nobody could serve the request, the chain answers with a `404 Not Found` itself.
#[derive(Clone, Default)]
pub struct DispatchChain {
    handlers: Arc<Vec<Router>>,
}

impl DispatchChain {
    pub fn push(&mut self, handler: Router) -> &mut Self {
        Arc::make_mut(&mut self.handlers).push(handler);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Rebuild a request from the parts of the original one
///
/// Only the first attempt receives the original body.
fn replay(parts: &http::request::Parts, body: Body) -> Request {
    let mut request = Request::new(body);
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = parts.uri.clone();
    *request.version_mut() = parts.version;
    *request.headers_mut() = parts.headers.clone();
    *request.extensions_mut() = parts.extensions.clone();
    request
}

async fn dispatch(handlers: Arc<Vec<Router>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let mut body = Some(body);

    for handler in handlers.iter() {
        let request = replay(&parts, body.take().unwrap_or_else(Body::empty));
        let response = handler
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        if response.status() != StatusCode::NOT_FOUND {
            return response;
        }
    }

    debug!(path = %parts.uri.path(), "no handler could serve the request");
    StatusCode::NOT_FOUND.into_response()
}

impl Service<Request> for DispatchChain {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handlers = Arc::clone(&self.handlers);
        Box::pin(async move { Ok(dispatch(handlers, request).await) })
    }
}

#[cfg(test)]
mod test {
    use super::DispatchChain;
    use axum::{body::Body, extract::Request, routing, Router};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn request(path: &str) -> Request {
        Request::get(path).body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn empty_chain_is_not_found() {
        let chain = DispatchChain::default();
        let response = chain.oneshot(request("/smile.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn not_found_falls_through() {
        let mut chain = DispatchChain::default();
        chain
            .push(Router::new().route("/first.png", routing::get(|| async { "first" })))
            .push(Router::new().route("/second.png", routing::get(|| async { "second" })));

        let response = chain.clone().oneshot(request("/second.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "second");

        let response = chain.oneshot(request("/third.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn first_match_wins() {
        let mut chain = DispatchChain::default();
        chain
            .push(Router::new().route("/smile.png", routing::get(|| async { "first" })))
            .push(Router::new().route("/smile.png", routing::get(|| async { "second" })));

        let response = chain.oneshot(request("/smile.png")).await.unwrap();
        assert_eq!(body_text(response).await, "first");
    }

    #[tokio::test]
    async fn other_errors_stop_the_chain() {
        let mut chain = DispatchChain::default();
        chain
            .push(Router::new().route(
                "/smile.png",
                routing::get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            ))
            .push(Router::new().route("/smile.png", routing::get(|| async { "second" })));

        let response = chain.oneshot(request("/smile.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn headers_reach_later_handlers() {
        let mut chain = DispatchChain::default();
        chain.push(Router::new()).push(Router::new().route(
            "/smile.png",
            routing::get(|headers: http::HeaderMap| async move {
                headers
                    .get("x-forwarded-marker")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned()
            }),
        ));

        let request = Request::get("/smile.png")
            .header("x-forwarded-marker", "present")
            .body(Body::empty())
            .unwrap();
        let response = chain.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "present");
    }
}
