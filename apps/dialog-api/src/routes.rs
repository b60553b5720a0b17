use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use dialog_domain::{Actor, Dialog};
use dialog_pagination::PaginatedList;
use dialog_service::{
	CreateDialogRequest, CreateDialogResponse, DeleteDialogRequest, DeleteDialogResponse,
	DialogSummary, Error as ServiceError, ReindexReport, SearchDialogsRequest,
	UpdateDialogRequest, UpdateDialogResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/v1/enduser/dialogs/search", post(search_dialogs))
		.route("/api/v1/enduser/dialogs/{id}", get(get_dialog))
		.route("/api/v1/serviceowner/dialogs", post(create_dialog))
		.route(
			"/api/v1/serviceowner/dialogs/{id}",
			axum::routing::put(update_dialog).delete(delete_dialog),
		)
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/api/v1/admin/search/rebuild", post(reindex_search)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_dialogs(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SearchDialogsRequest>,
) -> Result<Json<PaginatedList<DialogSummary>>, ApiError> {
	let actor = actor_from_headers(&headers)?;
	let response = state.service.search_dialogs(&actor, payload).await?;

	Ok(Json(response))
}

async fn get_dialog(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Json<Dialog>, ApiError> {
	let actor = actor_from_headers(&headers)?;
	let response = state.service.get_dialog(&actor, id).await?;

	Ok(Json(response))
}

async fn create_dialog(
	State(state): State<AppState>,
	Json(payload): Json<CreateDialogRequest>,
) -> Result<(StatusCode, Json<CreateDialogResponse>), ApiError> {
	let response = state.service.create_dialog(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_dialog(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
	Json(payload): Json<UpdateDialogRequest>,
) -> Result<Json<UpdateDialogResponse>, ApiError> {
	let if_match = if_match_from_headers(&headers)?;
	let response = state.service.update_dialog(id, if_match, payload).await?;

	Ok(Json(response))
}

async fn delete_dialog(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	headers: HeaderMap,
) -> Result<Json<DeleteDialogResponse>, ApiError> {
	let if_match = if_match_from_headers(&headers)?;
	let response =
		state.service.delete_dialog(DeleteDialogRequest { id, if_match }).await?;

	Ok(Json(response))
}

async fn reindex_search(State(state): State<AppState>) -> Result<Json<ReindexReport>, ApiError> {
	let response = state.service.reindex_search().await?;

	Ok(Json(response))
}

fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
	let party = headers
		.get("x-dialog-party")
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| {
			json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				"The x-dialog-party header is required.",
				None,
			)
		})?;
	let is_system_user = headers
		.get("x-dialog-system-user")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.eq_ignore_ascii_case("true"));

	Ok(if is_system_user { Actor::system_user(party) } else { Actor::new(party) })
}

fn if_match_from_headers(headers: &HeaderMap) -> Result<Uuid, ApiError> {
	let raw = headers.get("if-match").and_then(|value| value.to_str().ok()).ok_or_else(
		|| {
			json_error(
				StatusCode::PRECONDITION_REQUIRED,
				"precondition_required",
				"The If-Match header is required.",
				None,
			)
		},
	)?;

	Uuid::parse_str(raw.trim().trim_matches('"')).map_err(|_| {
		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			"The If-Match header must be a revision UUID.",
			None,
		)
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message, fields } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				if fields.is_empty() { None } else { Some(fields) },
			),
			ServiceError::Forbidden { message } => {
				json_error(StatusCode::FORBIDDEN, "forbidden", message, None)
			},
			ServiceError::NotFound { message } => {
				json_error(StatusCode::NOT_FOUND, "not_found", message, None)
			},
			ServiceError::Conflict { message } => {
				json_error(StatusCode::CONFLICT, "conflict", message, None)
			},
			ServiceError::Upstream { message } => {
				tracing::warn!(%message, "Upstream authorization call failed.");

				json_error(
					StatusCode::BAD_GATEWAY,
					"upstream_unavailable",
					"An upstream dependency failed.",
					None,
				)
			},
			ServiceError::Storage { message } => {
				tracing::error!(%message, "Storage operation failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"An internal error occurred.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}
