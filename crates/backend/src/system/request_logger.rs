use axum::{body::Body, extract::Request, middleware::Next, response::Response};

/// Простой middleware для логирования запросов
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_millis();
    if status >= 500 {
        tracing::error!("{} {} -> {} ({} ms)", method, path, status, duration);
    } else if status >= 400 {
        tracing::warn!("{} {} -> {} ({} ms)", method, path, status, duration);
    } else {
        tracing::info!("{} {} -> {} ({} ms)", method, path, status, duration);
    }
    response
}
