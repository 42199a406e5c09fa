use crate::api::models::AppState;
use crate::api::review::handlers::{
    create_review_handler, delete_review_handler, list_reviews_handler, update_review_handler,
};
use axum::{
    Router,
    routing::{MethodRouter, get, put},
};

pub const API_PREFIX: &str = "/api/movies";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(API_PREFIX, collection())
        // `/api/movies/` is served like `/api/movies`
        .route(&format!("{API_PREFIX}/"), collection())
        .route(
            &format!("{API_PREFIX}/{{id}}"),
            put(update_review_handler).delete(delete_review_handler),
        )
}

fn collection() -> MethodRouter<AppState> {
    get(list_reviews_handler).post(create_review_handler)
}
