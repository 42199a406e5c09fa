use crate::api::auth::Identity;
use crate::api::models::*;
use crate::api::review::payload::{NewReview, ReviewPatch, parse_body};
use crate::api::review::query::ListQuery;
use crate::storage::{Review, now_iso};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Review>> {
    let reviews = state.storage.read_all().await;
    let results = ListQuery::from_pairs(params).apply(reviews);

    info!(found = results.len(), "Listed reviews");

    Json(results)
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    identity: Identity,
    body: Bytes,
) -> Result<(StatusCode, Json<Review>), AppError> {
    // Validate
    let request = NewReview::from_json(&parse_body(&body)?)?;

    let mut reviews = state.storage.try_read_all().await?;
    if reviews
        .iter()
        .any(|r| r.is_owned_by(&identity.id) && r.has_title(&request.movie_title))
    {
        return Err(AppError::Conflict);
    }

    let now = now_iso();
    let review = Review {
        id: Uuid::new_v4().to_string(),
        movie_title: request.movie_title,
        director: request.director,
        review_text: request.review_text,
        rating: request.rating,
        tags: request.tags,
        user_id: identity.id,
        created_at: now.clone(),
        updated_at: now,
    };

    reviews.push(review.clone());
    state.storage.write_all(&reviews).await?;

    info!(review_id = %review.id, user_id = %review.user_id, "Review created");

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
    body: Bytes,
) -> Result<Json<Review>, AppError> {
    let body = parse_body(&body)?;

    let mut reviews = state.storage.try_read_all().await?;
    let review = reviews
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(AppError::NotFound)?;

    if !review.is_owned_by(&identity.id) {
        return Err(AppError::Forbidden(
            "Forbidden: you can only update your own review".to_string(),
        ));
    }

    // Nothing is applied unless every present field is valid
    let patch = ReviewPatch::from_json(&body)?;
    if let Some(rating) = patch.rating {
        review.rating = rating;
    }
    if let Some(text) = patch.review_text {
        review.review_text = text;
    }
    if let Some(tags) = patch.tags {
        review.tags = tags;
    }
    review.updated_at = now_iso();

    let updated = review.clone();
    state.storage.write_all(&reviews).await?;

    info!(review_id = %updated.id, user_id = %identity.id, "Review updated");

    Ok(Json(updated))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut reviews = state.storage.try_read_all().await?;
    let index = reviews
        .iter()
        .position(|r| r.id == id)
        .ok_or(AppError::NotFound)?;

    if !(identity.is_admin || reviews[index].is_owned_by(&identity.id)) {
        return Err(AppError::Forbidden(
            "Forbidden: only owner or admin can delete".to_string(),
        ));
    }

    let removed = reviews.remove(index);
    state.storage.write_all(&reviews).await?;

    info!(
        review_id = %removed.id,
        user_id = %identity.id,
        admin = identity.is_admin,
        "Review deleted"
    );

    Ok(Json(DeleteResponse {
        success: true,
        message: "Review deleted".to_string(),
    }))
}
