use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use uuid::Uuid;
use tracing::{error, warn};

use crate::game::error::MatchError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::live_match::{
    CreateMatchRequest, MatchSummaryResponse, RecordCardRequest, RecordGoalRequest,
    RecordIncidentRequest, RecordSubstitutionRequest, SetLineupRequest, SetMinuteRequest,
    SubstitutionCandidatesQuery, SummaryQuery,
};
use crate::models::player::UpsertPlayerRequest;
use crate::services::live_match_service::{LiveMatchError, LiveMatchService};

/// Map service failures onto HTTP statuses with the shared response envelope.
pub fn error_response(e: &LiveMatchError) -> HttpResponse {
    let body = ApiResponse::<()>::error(e.to_string());
    match e {
        LiveMatchError::Match(MatchError::Unauthorized { .. }) => HttpResponse::Forbidden().json(body),
        LiveMatchError::Match(MatchError::InvalidTransition { .. })
        | LiveMatchError::Match(MatchError::NoGoalToUndo)
        | LiveMatchError::Conflict(_) => HttpResponse::Conflict().json(body),
        LiveMatchError::Match(MatchError::PlayerAttributionRequired { .. }) => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        LiveMatchError::Match(_) | LiveMatchError::Selection(_) => HttpResponse::BadRequest().json(body),
        LiveMatchError::NotFound(_) | LiveMatchError::PlayerNotFound(_) => HttpResponse::NotFound().json(body),
        LiveMatchError::Store(store_error) => {
            error!("Storage failure: {}", store_error);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Storage error"))
        }
    }
}

fn respond<T: Serialize>(result: Result<T, LiveMatchError>, message: &str) -> Result<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(message, data))),
        Err(e) => {
            warn!("{} failed: {}", message, e);
            Ok(error_response(&e))
        }
    }
}

pub async fn list_matches(
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.list_matches(claims.role).await, "Matches retrieved")
}

pub async fn create_match(
    service: web::Data<LiveMatchService>,
    body: web::Json<CreateMatchRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match service.create_match(claims.role, body.into_inner()).await {
        Ok(created) => Ok(HttpResponse::Created().json(ApiResponse::success("Match created", created))),
        Err(e) => {
            warn!("Match creation by {} failed: {}", claims.username, e);
            Ok(error_response(&e))
        }
    }
}

pub async fn get_match(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.get_match(claims.role, match_id).await, "Match retrieved")
}

pub async fn set_lineup(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<SetLineupRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    respond(service.set_lineup(match_id, claims.role, body.player_ids).await, "Lineup updated")
}

pub async fn start_match(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.start_match(match_id, claims.role).await, "Match started")
}

pub async fn end_match(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.end_match(match_id, claims.role).await, "Match finished")
}

pub async fn record_halftime(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.record_halftime(match_id, claims.role).await, "Half-time recorded")
}

pub async fn record_goal(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<RecordGoalRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(
        service.record_goal(match_id, claims.role, &body.team, body.player_id).await,
        "Goal recorded",
    )
}

pub async fn undo_last_goal(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.undo_last_goal(match_id, claims.role).await, "Last goal removed")
}

pub async fn record_card(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<RecordCardRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(
        service.record_card(match_id, claims.role, &body.team, body.color, body.player_id).await,
        "Card recorded",
    )
}

pub async fn record_incident(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<RecordIncidentRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(
        service.record_incident(match_id, claims.role, body.kind, &body.team, body.player_id).await,
        "Incident recorded",
    )
}

pub async fn record_substitution(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<RecordSubstitutionRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(
        service
            .record_substitution(match_id, claims.role, &body.team, body.player_out_id, body.player_in_id)
            .await,
        "Substitution recorded",
    )
}

pub async fn substitution_candidates(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    query: web::Query<SubstitutionCandidatesQuery>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(
        service.substitution_candidates(match_id, claims.role, query.player_out).await,
        "Substitution candidates retrieved",
    )
}

pub async fn set_minute(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    body: web::Json<SetMinuteRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.set_minute(match_id, claims.role, body.minute).await, "Minute updated")
}

pub async fn increment_minute(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.increment_minute(match_id, claims.role).await, "Minute updated")
}

pub async fn decrement_minute(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.decrement_minute(match_id, claims.role).await, "Minute updated")
}

pub async fn match_summary(
    service: web::Data<LiveMatchService>,
    match_id: Uuid,
    query: web::Query<SummaryQuery>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    let result = service
        .match_summary(match_id, claims.role, query.context)
        .await
        .map(|text| MatchSummaryResponse { match_id, text });
    respond(result, "Summary generated")
}

pub async fn get_roster(
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.active_roster(claims.role).await, "Roster retrieved")
}

pub async fn upsert_player(
    service: web::Data<LiveMatchService>,
    body: web::Json<UpsertPlayerRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    respond(service.upsert_player(claims.role, body.into_inner().into()).await, "Player saved")
}
