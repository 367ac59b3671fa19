// src/routes/matches.rs
use actix_web::{delete, get, post, put, web, HttpResponse, Result};
use uuid::Uuid;

use crate::handlers::match_handler;
use crate::middleware::auth::Claims;
use crate::models::live_match::{
    CreateMatchRequest, RecordCardRequest, RecordGoalRequest, RecordIncidentRequest,
    RecordSubstitutionRequest, SetLineupRequest, SetMinuteRequest, SubstitutionCandidatesQuery, SummaryQuery,
};
use crate::models::player::UpsertPlayerRequest;
use crate::services::LiveMatchService;

/// List all matches, newest first
#[get("")]
async fn list_matches(
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::list_matches(service, claims).await
}

/// Create an upcoming match
#[post("")]
async fn create_match(
    service: web::Data<LiveMatchService>,
    body: web::Json<CreateMatchRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::create_match(service, body, claims).await
}

#[get("/{match_id}")]
async fn get_match(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::get_match(service, path.into_inner(), claims).await
}

/// Set the lineup before kickoff
#[put("/{match_id}/lineup")]
async fn set_lineup(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<SetLineupRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::set_lineup(service, path.into_inner(), body, claims).await
}

#[post("/{match_id}/start")]
async fn start_match(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::start_match(service, path.into_inner(), claims).await
}

#[post("/{match_id}/end")]
async fn end_match(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::end_match(service, path.into_inner(), claims).await
}

#[post("/{match_id}/halftime")]
async fn record_halftime(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::record_halftime(service, path.into_inner(), claims).await
}

#[post("/{match_id}/goals")]
async fn record_goal(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<RecordGoalRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::record_goal(service, path.into_inner(), body, claims).await
}

/// Remove the most recent goal
#[delete("/{match_id}/goals/last")]
async fn undo_last_goal(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::undo_last_goal(service, path.into_inner(), claims).await
}

#[post("/{match_id}/cards")]
async fn record_card(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<RecordCardRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::record_card(service, path.into_inner(), body, claims).await
}

/// Injuries, penalties and corners
#[post("/{match_id}/incidents")]
async fn record_incident(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<RecordIncidentRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::record_incident(service, path.into_inner(), body, claims).await
}

#[post("/{match_id}/substitutions")]
async fn record_substitution(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<RecordSubstitutionRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::record_substitution(service, path.into_inner(), body, claims).await
}

/// Outgoing and incoming pools for the substitution picker
#[get("/{match_id}/substitutions/candidates")]
async fn substitution_candidates(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    query: web::Query<SubstitutionCandidatesQuery>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::substitution_candidates(service, path.into_inner(), query, claims).await
}

#[put("/{match_id}/minute")]
async fn set_minute(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    body: web::Json<SetMinuteRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::set_minute(service, path.into_inner(), body, claims).await
}

#[post("/{match_id}/minute/increment")]
async fn increment_minute(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::increment_minute(service, path.into_inner(), claims).await
}

#[post("/{match_id}/minute/decrement")]
async fn decrement_minute(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::decrement_minute(service, path.into_inner(), claims).await
}

/// Share text for announcements: created, started or finished
#[get("/{match_id}/summary")]
async fn match_summary(
    path: web::Path<Uuid>,
    service: web::Data<LiveMatchService>,
    query: web::Query<SummaryQuery>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::match_summary(service, path.into_inner(), query, claims).await
}

/// Active roster
#[get("")]
async fn get_roster(
    service: web::Data<LiveMatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::get_roster(service, claims).await
}

#[post("")]
async fn upsert_player(
    service: web::Data<LiveMatchService>,
    body: web::Json<UpsertPlayerRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse> {
    match_handler::upsert_player(service, body, claims).await
}
