//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    protocol::{CreateChoreRequest, CreateMemberRequest, CreateRewardRequest, RedeemRequest, RewardsQuery},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chore_tracker_core::{ChoreId, Command, CommandResult, HouseholdError, MemberId, NewChore};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_dashboard,
        list_members,
        create_member,
        remove_member,
        member_points,
        member_redemptions,
        nudge_member,
        list_chores,
        create_chore,
        toggle_chore,
        delete_chore,
        clear_completed,
        reset_recurring,
        list_rewards,
        create_reward,
        redeem_reward,
        month_calendar,
        day_calendar,
        run_command,
    ),
    components(
        schemas(CreateMemberRequest, CreateChoreRequest, CreateRewardRequest, RedeemRequest)
    ),
    tags(
        (name = "Chore Tracker API", description = "Family members, chores, points and rewards.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

type Rejection = (StatusCode, String);

/// Maps a household failure onto an HTTP status. Storage failures are logged
/// and hidden from the client.
fn reject(e: HouseholdError) -> Rejection {
    let status = match &e {
        HouseholdError::Port(port) => {
            error!("Household storage failure: {:?}", port);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access household data".to_string(),
            );
        }
        HouseholdError::UnknownMember(_)
        | HouseholdError::UnknownChore(_)
        | HouseholdError::UnknownReward(_) => StatusCode::NOT_FOUND,
        HouseholdError::DuplicateMember(_) => StatusCode::CONFLICT,
        HouseholdError::InsufficientPoints { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_REQUEST,
    };
    warn!(status = status.as_u16(), "Rejected request: {}", e);
    (status, e.to_string())
}

//=========================================================================================
// Dashboard
//=========================================================================================

/// Every view of the household, recomputed from the stored collections.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Members with balances, ordered chores, summary and leaderboard"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    let dashboard = state.household.dashboard().await.map_err(reject)?;
    Ok(Json(dashboard))
}

//=========================================================================================
// Members
//=========================================================================================

#[utoipa::path(
    get,
    path = "/members",
    responses((status = 200, description = "Registered family members"))
)]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    let members = state.household.members().await.map_err(reject)?;
    Ok(Json(members))
}

/// Register a family member. Names are unique ignoring case.
#[utoipa::path(
    post,
    path = "/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created"),
        (status = 400, description = "Empty name"),
        (status = 409, description = "A member with this name already exists")
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let member = state.household.add_member(&req.name).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a member and unassign all of their chores.
#[utoipa::path(
    delete,
    path = "/members/{id}",
    params(("id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member removed; reports how many chores were unassigned"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let unassigned = state
        .household
        .remove_member(&MemberId(id))
        .await
        .map_err(reject)?;
    Ok(Json(json!({ "unassigned": unassigned })))
}

#[utoipa::path(
    get,
    path = "/members/{id}/points",
    params(("id" = String, Path, description = "Member id")),
    responses((status = 200, description = "Current point balance, 0 for unknown members"))
)]
pub async fn member_points(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let member_id = MemberId(id);
    let points = state.household.balance(&member_id).await.map_err(reject)?;
    Ok(Json(json!({ "memberId": member_id, "points": points })))
}

#[utoipa::path(
    get,
    path = "/members/{id}/redemptions",
    params(("id" = String, Path, description = "Member id")),
    responses((status = 200, description = "Rewards this member has redeemed, oldest first"))
)]
pub async fn member_redemptions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let history = state
        .household
        .redemptions_for(&MemberId(id))
        .await
        .map_err(reject)?;
    Ok(Json(history))
}

/// Remind a member of their pending chores.
#[utoipa::path(
    post,
    path = "/members/{id}/nudge",
    params(("id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Delivered, refused, or a fallback message to show"),
        (status = 400, description = "The member has no pending chores"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn nudge_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let outcome = state.household.nudge(&MemberId(id)).await.map_err(reject)?;
    Ok(Json(outcome))
}

//=========================================================================================
// Chores
//=========================================================================================

/// Chores in display order: pending first, then by priority and due date.
#[utoipa::path(
    get,
    path = "/chores",
    responses((status = 200, description = "All chores in display order"))
)]
pub async fn list_chores(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    let chores = state.household.chores_for_display().await.map_err(reject)?;
    Ok(Json(chores))
}

#[utoipa::path(
    post,
    path = "/chores",
    request_body = CreateChoreRequest,
    responses(
        (status = 201, description = "Chore created"),
        (status = 400, description = "Missing text, assignee or due date, or priority out of range"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn create_chore(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateChoreRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let chore = state
        .household
        .create_chore(NewChore::from(req))
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(chore)))
}

/// Flip a chore's completion, awarding or deducting its points.
#[utoipa::path(
    post,
    path = "/chores/{id}/toggle",
    params(("id" = i64, Path, description = "Chore id")),
    responses(
        (status = 200, description = "New completion state, points moved and resulting balance"),
        (status = 404, description = "Unknown chore")
    )
)]
pub async fn toggle_chore(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let outcome = state
        .household
        .toggle_chore(ChoreId(id))
        .await
        .map_err(reject)?;
    Ok(Json(CommandResult::from(outcome)))
}

#[utoipa::path(
    delete,
    path = "/chores/{id}",
    params(("id" = i64, Path, description = "Chore id")),
    responses(
        (status = 200, description = "The deleted chore"),
        (status = 404, description = "Unknown chore")
    )
)]
pub async fn delete_chore(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let chore = state
        .household
        .delete_chore(ChoreId(id))
        .await
        .map_err(reject)?;
    Ok(Json(chore))
}

#[utoipa::path(
    delete,
    path = "/chores/completed",
    responses((status = 200, description = "Number of completed chores removed"))
)]
pub async fn clear_completed(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let removed = state.household.clear_completed().await.map_err(reject)?;
    Ok(Json(json!({ "removed": removed })))
}

#[utoipa::path(
    post,
    path = "/chores/reset",
    responses((status = 200, description = "Ids of recurring chores made pending again"))
)]
pub async fn reset_recurring(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let reset = state.household.reset_recurring().await.map_err(reject)?;
    Ok(Json(json!({ "reset": reset })))
}

//=========================================================================================
// Rewards
//=========================================================================================

/// The reward catalog, with each reward marked affordable or locked.
#[utoipa::path(
    get,
    path = "/rewards",
    params(RewardsQuery),
    responses((status = 200, description = "Catalog entries with `canAfford`"))
)]
pub async fn list_rewards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RewardsQuery>,
) -> Result<impl IntoResponse, Rejection> {
    let member_id = query.member_id.map(MemberId);
    let offers = state
        .household
        .offers(member_id.as_ref())
        .await
        .map_err(reject)?;
    Ok(Json(offers))
}

#[utoipa::path(
    post,
    path = "/rewards",
    request_body = CreateRewardRequest,
    responses(
        (status = 201, description = "Reward added to the catalog"),
        (status = 400, description = "Invalid or duplicate reward")
    )
)]
pub async fn create_reward(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRewardRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let reward = state.household.add_reward(req.into()).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(reward)))
}

/// Spend a member's points on a reward.
#[utoipa::path(
    post,
    path = "/rewards/{id}/redeem",
    params(("id" = String, Path, description = "Reward id")),
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "The recorded redemption"),
        (status = 400, description = "No member selected"),
        (status = 404, description = "Unknown reward or member"),
        (status = 422, description = "Not enough points")
    )
)]
pub async fn redeem_reward(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RedeemRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let member_id = req.member_id.filter(|m| !m.trim().is_empty()).map(MemberId);
    let redemption = state
        .household
        .redeem(&id, member_id.as_ref())
        .await
        .map_err(reject)?;
    Ok(Json(redemption))
}

//=========================================================================================
// Calendar
//=========================================================================================

#[utoipa::path(
    get,
    path = "/calendar/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1 to 12")
    ),
    responses(
        (status = 200, description = "42-cell month grid with task counts"),
        (status = 400, description = "Invalid month")
    )
)]
pub async fn month_calendar(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, Rejection> {
    let grid = state.household.month_grid(year, month).await.map_err(reject)?;
    Ok(Json(grid))
}

#[utoipa::path(
    get,
    path = "/calendar/day/{date}",
    params(("date" = String, Path, description = "Day as YYYY-MM-DD")),
    responses((status = 200, description = "Chores due on that day"))
)]
pub async fn day_calendar(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
) -> Result<impl IntoResponse, Rejection> {
    let tasks = state.household.day_tasks(date).await.map_err(reject)?;
    Ok(Json(tasks))
}

//=========================================================================================
// Command Dispatch
//=========================================================================================

/// Run a single tagged command, e.g. `{"type": "toggle_chore", "chore_id": 1}`.
#[utoipa::path(
    post,
    path = "/commands",
    request_body(content_type = "application/json", description = "A command tagged by `type`."),
    responses(
        (status = 200, description = "The command result and, for mutations, the recomputed dashboard"),
        (status = 400, description = "Validation failure")
    )
)]
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, Rejection> {
    let _guard = state.begin_write().await;
    let outcome = state.household.dispatch(command).await.map_err(reject)?;
    Ok(Json(outcome))
}
