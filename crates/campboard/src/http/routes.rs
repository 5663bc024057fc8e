//! Camp API routes.
//!
//! Handlers parse the path and body, call one store operation, and shape the
//! result with the views in [`crate::serialize`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;

use super::error::ApiResult;
use super::AppState;
use crate::error::{Entity, Error};
use crate::models::{CamperPatch, NewCamper, NewSignup};
use crate::serialize::{
    ActivityView, CamperDetailView, CamperEnvelope, CamperList, CamperView, SignupCreatedView,
};

type Body<T> = Result<Json<T>, JsonRejection>;
type Id = Result<Path<i64>, PathRejection>;

/// Create the camp API routes.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/campers", get(list_campers).post(create_camper))
        .route(
            "/campers/{id}",
            get(get_camper).patch(update_camper).delete(delete_camper),
        )
        .route("/activities", get(list_activities))
        .route("/activities/{id}", delete(delete_activity))
        .route("/signups", post(create_signup))
        .with_state(state)
}

/// Any path segment that does not parse as an integer id names no record,
/// so every path rejection becomes the entity's 404.
fn record_id(id: Id, entity: Entity) -> ApiResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|_| Error::NotFound(entity).into())
}

async fn index() -> &'static str {
    ""
}

// ==================
// Campers
// ==================

async fn list_campers(State(state): State<Arc<AppState>>) -> ApiResult<Json<CamperList>> {
    let campers = state.storage.list_campers()?;
    Ok(Json(CamperList::new(&campers)))
}

async fn create_camper(
    State(state): State<Arc<AppState>>,
    body: Body<NewCamper>,
) -> ApiResult<(StatusCode, Json<CamperView>)> {
    let Json(input) = body?;
    let camper = state.storage.create_camper(&input)?;
    info!("Created camper {}", camper.id);
    Ok((StatusCode::CREATED, Json(CamperView::from(&camper))))
}

async fn get_camper(
    State(state): State<Arc<AppState>>,
    id: Id,
) -> ApiResult<Json<CamperEnvelope>> {
    let id = record_id(id, Entity::Camper)?;
    let (camper, signups) = state
        .storage
        .camper_with_signups(id)?
        .ok_or(Error::NotFound(Entity::Camper))?;

    Ok(Json(CamperEnvelope {
        camper: CamperDetailView::new(&camper, &signups),
    }))
}

async fn update_camper(
    State(state): State<Arc<AppState>>,
    id: Id,
    body: Body<CamperPatch>,
) -> ApiResult<Json<CamperView>> {
    let id = record_id(id, Entity::Camper)?;
    // A missing camper is reported before the body is looked at.
    if state.storage.get_camper(id)?.is_none() {
        return Err(Error::NotFound(Entity::Camper).into());
    }
    let Json(patch) = body?;
    let camper = state.storage.update_camper(id, &patch)?;
    Ok(Json(CamperView::from(&camper)))
}

async fn delete_camper(State(state): State<Arc<AppState>>, id: Id) -> ApiResult<StatusCode> {
    let id = record_id(id, Entity::Camper)?;
    state.storage.delete_camper(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Activities
// ==================

async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ActivityView>>> {
    let activities = state.storage.list_activities()?;
    Ok(Json(activities.iter().map(ActivityView::from).collect()))
}

async fn delete_activity(State(state): State<Arc<AppState>>, id: Id) -> ApiResult<StatusCode> {
    let id = record_id(id, Entity::Activity)?;
    state.storage.delete_activity(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Signups
// ==================

async fn create_signup(
    State(state): State<Arc<AppState>>,
    body: Body<NewSignup>,
) -> ApiResult<(StatusCode, Json<SignupCreatedView>)> {
    let Json(input) = body?;
    let detail = state.storage.create_signup(&input)?;
    info!(
        "Camper {} signed up for activity {}",
        detail.camper.id, detail.activity.id
    );
    Ok((StatusCode::CREATED, Json(SignupCreatedView::from(&detail))))
}
