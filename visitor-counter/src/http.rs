use {
    std::{convert::Infallible, pin::Pin, net::SocketAddr},
    serde_json::Value,
    tokio::net::TcpListener,
    tracing::{info, error},
    hyper::{server::conn::http1, Request, Response, StatusCode, body::Bytes},
    hyper_util::rt::tokio::{TokioIo, TokioTimer},
    http_body_util::Full,
    visitor_counter_core::InvocationResponse,
    crate::{handler::CounterHandler, error::{CounterError, ServeError}},
};

/// Serves the counter over plain http for local development.
#[derive(Clone)]
pub struct HttpHandler {
    handler: CounterHandler,
}

impl HttpHandler {
    pub fn new(handler: CounterHandler) -> Self {
        Self {
            handler,
        }
    }
}

impl<B> hyper::service::Service<Request<B>> for HttpHandler {
    type Response = Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, _req: Request<B>) -> Self::Future {
        let handler = self.handler.clone();
        Box::pin(async move {
            let response = match handler.handle(Value::Null).await {
                Ok(v) => v,
                Err(err) => response_for_error(&err),
            };
            Ok(into_hyper_response(response))
        })
    }
}

fn response_for_error(err: &CounterError) -> InvocationResponse {
    match err {
        CounterError::Store(_) => InvocationResponse::new()
            .status(502)
            .header("Content-Type", "text/plain")
            .body("counter: store unavailable.\n"),
        CounterError::Serialization { .. } => response_internal_error(),
    }
}

fn response_internal_error() -> InvocationResponse {
    InvocationResponse::new()
        .status(500)
        .header("Content-Type", "text/plain")
        .body("counter: internal error.\n")
}

fn into_hyper_response(response: InvocationResponse) -> Response<Full<Bytes>> {
    match response.into_http_response() {
        Ok(v) => v.map(|body| Full::new(Bytes::from(body))),
        Err(err) => {
            error!("failed to convert response: {err:?}");
            let mut response = Response::new(Full::new(Bytes::from_static(b"counter: internal error.\n")));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

pub async fn serve(port: u16, handler: CounterHandler) -> Result<(), ServeError> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = TcpListener::bind(addr).await.map_err(ServeError::FailedToBind)?;
    info!("running on {addr:?}");
    serve_listener(listener, handler).await
}

pub async fn serve_listener(listener: TcpListener, handler: CounterHandler) -> Result<(), ServeError> {
    let service = HttpHandler::new(handler);
    loop {
        let (tcp, _) = listener.accept().await.map_err(ServeError::FailedToAccept)?;
        let io = TokioIo::new(tcp);

        let service = service.clone();
        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await {
                error!("failed to serve connection: {err:?}");
            }
        });
    }
}
