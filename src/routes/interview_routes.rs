use crate::dto::interview_dto::{
    CompleteInterviewRequest, InterviewQuery, QuotaQuery, RescheduleInterviewRequest,
    ScheduleInterviewRequest,
};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::interview::{Interview, InterviewResults};
use crate::services::interview_service::ScheduleInterview;
use crate::services::quota_service::QuotaUsage;
use crate::utils::{time, validation::validate};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewQuery>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list(query.application_id.as_deref(), query.interviewer_id.as_deref())
        .await;
    Ok(Json(interviews))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Interview>> {
    Ok(Json(state.interview_service.get(&id).await?))
}

pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let interview = state
        .interview_service
        .schedule(
            ScheduleInterview {
                application_id: payload.application_id,
                interview_type: payload.interview_type,
                interviewer_id: payload.interviewer_id,
                scheduled_date: payload.scheduled_date,
            },
            &claims.sub,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn complete_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteInterviewRequest>,
) -> Result<Json<Interview>> {
    validate(&payload)?;
    let interview = state
        .interview_service
        .complete(
            &id,
            InterviewResults {
                outcome: payload.outcome,
                score: payload.score,
                notes: payload.notes,
                recommendation: payload.recommendation,
            },
            &claims.sub,
        )
        .await?;
    Ok(Json(interview))
}

pub async fn reschedule_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<RescheduleInterviewRequest>,
) -> Result<Json<Interview>> {
    let interview = state
        .interview_service
        .reschedule(&id, payload.new_date, payload.reason, &claims.sub)
        .await?;
    Ok(Json(interview))
}

pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Interview>> {
    Ok(Json(state.interview_service.cancel(&id, &claims.sub).await?))
}

pub async fn interviewer_quota(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<QuotaQuery>,
) -> Result<Json<QuotaUsage>> {
    let date = match query.date.as_deref() {
        Some(raw) => time::from_rfc3339(raw)
            .map_err(|_| Error::BadRequest("date must be an RFC 3339 timestamp".to_string()))?,
        None => time::now(),
    };
    Ok(Json(state.quota_service.quota_for(&id, date).await?))
}
