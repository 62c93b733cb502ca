pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, HeaderName, Method};
    use axum::middleware;
    use axum::{
        routing::{get, post},
        Router,
    };
    use contracts::shared::csrf::CSRF_HEADER;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::{ServeDir, ServeFile};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    // Initialize database (creates the memorial table if needed)
    shared::data::db::initialize_database(&config.database_path())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_bytes(CSRF_HEADER.as_bytes())?,
        ]);

    let static_dir = config.static_dir();
    let dist_dir = config.dist_dir();
    tracing::info!(
        "Serving static files from {}, frontend from {}",
        static_dir.display(),
        dist_dir.display()
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/csrf", get(system::csrf::issue_token))
        // Memorial read/create
        .route(
            "/api/memorials",
            get(handlers::a001_memorial::list_all).post(handlers::a001_memorial::create),
        )
        .route(
            "/api/memorials/testdata",
            post(handlers::a001_memorial::insert_test_data),
        )
        .route(
            "/api/memorials/:id",
            get(handlers::a001_memorial::get_by_id),
        )
        // Inline edits
        .route(
            "/memorials/:id/update-banner/",
            post(handlers::a001_memorial::update_banner),
        )
        .route(
            "/memorials/:id/update-name/",
            post(handlers::a001_memorial::update_name),
        )
        .route(
            "/memorials/:id/update-dates/",
            post(handlers::a001_memorial::update_dates),
        )
        .route(
            "/memorials/:id/update-quote/",
            post(handlers::a001_memorial::update_quote),
        )
        .route(
            "/memorials/:id/update-biography/",
            post(handlers::a001_memorial::update_biography),
        )
        .nest_service("/static", ServeDir::new(&static_dir))
        // Client-side pages (`/`, `/memorials/{id}/`) all load index.html
        .fallback_service(
            ServeDir::new(&dist_dir).fallback(ServeFile::new(dist_dir.join("index.html"))),
        )
        .layer(middleware::from_fn(system::csrf::require_csrf))
        .layer(middleware::from_fn(system::request_logger::request_logger))
        .layer(cors);

    let addr = config.socket_addr()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
