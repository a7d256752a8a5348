use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use townpulse_service::{
	AreaProfileResponse, OverviewSnapshot, ProfileRequest, RankingRequest, RankingResponse,
	ServiceError, StoreKind,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/market/overview", get(overview))
		.route("/v1/market/rankings", get(rankings))
		.route("/v1/areas/{area}/profile", get(area_profile))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
	pub flat_type: String,
	pub budget: f64,
	pub window_months: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
	pub flat_type: Option<String>,
	pub window_months: Option<i32>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn overview(State(state): State<AppState>) -> Result<Json<OverviewSnapshot>, ApiError> {
	let response = state.service.overview().await?;
	Ok(Json(response))
}

async fn rankings(
	State(state): State<AppState>,
	Query(query): Query<RankingQuery>,
) -> Result<Json<RankingResponse>, ApiError> {
	let response = state
		.service
		.rank_by_affordability(RankingRequest {
			flat_type: query.flat_type,
			budget: query.budget,
			window_months: query.window_months,
		})
		.await?;
	Ok(Json(response))
}

async fn area_profile(
	State(state): State<AppState>,
	Path(area): Path<String>,
	Query(query): Query<ProfileQuery>,
) -> Result<Json<AreaProfileResponse>, ApiError> {
	let response = state
		.service
		.area_profile(ProfileRequest {
			area,
			flat_type: query.flat_type,
			window_months: query.window_months,
		})
		.await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidArgument { message } => {
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_argument", message)
			},
			ServiceError::DataSourceUnavailable { store, message } => ApiError::new(
				StatusCode::SERVICE_UNAVAILABLE,
				"data_source_unavailable",
				match store {
					StoreKind::Relational => format!("Relational store unavailable: {message}"),
					StoreKind::Document => format!("Document store unavailable: {message}"),
				},
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
