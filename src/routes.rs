// routes.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        chat::chat_handler,
        contacts::contacts_handler,
        notifications::notifications_handler,
        offers::offers_handler,
        posts,
        skills::skills_handler,
        users::{makers_handler, users_handler},
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Browsing is open; everything that acts on data needs a session.
    let public_post_routes = Router::new()
        .route("/", get(posts::get_feed))
        .route("/map", get(posts::get_map_posts))
        .route("/:post_id", get(posts::get_post))
        .route("/:post_id/comments", get(posts::get_comments));

    let protected_post_routes = Router::new()
        .route("/", post(posts::create_post))
        .route("/:post_id/comments", post(posts::create_comment))
        .route("/:post_id/offers", get(posts::get_post_offers))
        .route("/:post_id/fixed", put(posts::mark_fixed))
        .route("/:post_id/unassign", put(posts::unassign_maker))
        .route("/:post_id/cancel", put(posts::cancel_post))
        .route("/:post_id/reviews", post(posts::submit_review))
        .layer(middleware::from_fn(auth));

    let post_routes = public_post_routes.merge(protected_post_routes);

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/skills", skills_handler())
        .nest("/makers", makers_handler())
        .nest("/posts", post_routes)
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest("/offers", offers_handler().layer(middleware::from_fn(auth)))
        .nest("/contacts", contacts_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/notifications",
            notifications_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/chat", chat_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .nest("/api", api_route)
        .route("/health", get(health_check))
}
