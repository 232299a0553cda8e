use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::form::{BirthdayForm, FormErrors, FORM_LEVEL};
use crate::models::birthday::{Birthday, BirthdayView, DeleteResponse, DetailResponse, SubmitResponse};
use crate::models::page::{ListQuery, PageResponse};
use crate::pagination::{requested_offset, Paginator};
use crate::AppState;

/// A body that does not decode into a form is a form-level error.
fn unreadable_form(rejection: JsonRejection) -> AppError {
    tracing::warn!(error = %rejection.body_text(), "Submission body rejected");
    AppError::Form(FormErrors::from([(
        FORM_LEVEL.to_string(),
        rejection.body_text(),
    )]))
}

/// GET /api/v1/birthdays?page=N — one page of birthdays in id order.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(
        handler = "list",
        page = ?params.page,
        page_size = state.page_size,
        "Handler: GET /api/v1/birthdays"
    );

    let raw_page = params.page.as_deref();
    let wanted = requested_offset(raw_page, state.page_size);

    tracing::debug!(handler = "list", offset = wanted, "Dispatching to repo.list");
    let (mut rows, mut total_count) = state.repo.list(wanted, state.page_size).await?;
    let mut page = Paginator::new(total_count, state.page_size).get_page(raw_page);
    tracing::debug!(
        handler = "list",
        rows_fetched = rows.len(),
        total_count,
        page_number = page.number,
        total_pages = page.total_pages,
        "Repo returned"
    );

    // the requested page was out of range and resolved to the last one
    if page.offset != wanted {
        tracing::debug!(handler = "list", offset = page.offset, "Dispatching to repo.list");
        (rows, total_count) = state.repo.list(page.offset, page.size).await?;
        page = Paginator::new(total_count, state.page_size).page_at(page.number);
        tracing::debug!(handler = "list", rows_fetched = rows.len(), "Repo returned");
    }

    let today = (state.today)();
    let entries = rows
        .iter()
        .map(|row| row.to_view(today))
        .collect::<Result<Vec<BirthdayView>, _>>()?;

    tracing::info!(
        handler = "list",
        returned = entries.len(),
        page_number = page.number,
        status = 200,
        "Responding: page of birthdays"
    );

    Ok(Json(PageResponse {
        entries,
        page_number: page.number,
        page_size: page.size,
        total_pages: page.total_pages,
        total_count,
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }))
}

/// GET /api/v1/birthdays/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(handler = "detail", id, "Handler: GET /api/v1/birthdays/:id");

    tracing::debug!(handler = "detail", "Dispatching to repo.get");
    let birthday = state
        .repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Birthday {id} not found")))?;

    let entry = birthday.to_view((state.today)())?;

    tracing::info!(
        handler = "detail",
        id,
        countdown_days = entry.countdown_days,
        status = 200,
        "Responding: birthday found"
    );

    Ok(Json(DetailResponse {
        countdown_days: entry.countdown_days,
        entry,
    }))
}

/// POST /api/v1/birthdays — create from a submitted form.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<BirthdayForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(handler = "create", "Handler: POST /api/v1/birthdays");

    let Json(form) = payload.map_err(unreadable_form)?;

    let cleaned = form.clean(&state.guard)?;
    tracing::debug!(handler = "create", first_name = %cleaned.first_name, "Form cleaned");

    tracing::debug!(handler = "create", "Dispatching to repo.create");
    let id = state.repo.create(&cleaned).await?;
    tracing::debug!(handler = "create", id, "Repo returned: birthday created");

    let entry = Birthday {
        id,
        first_name: cleaned.first_name,
        last_name: cleaned.last_name,
        birthday: cleaned.birthday,
    }
    .to_view((state.today)())?;

    tracing::info!(
        handler = "create",
        id,
        countdown_days = entry.countdown_days,
        status = 201,
        "Responding: birthday created"
    );

    Ok((StatusCode::CREATED, Json(SubmitResponse::accepted(entry))))
}

/// PUT /api/v1/birthdays/:id — edit; the submission is cleaned exactly like a create.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<BirthdayForm>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(handler = "update", id, "Handler: PUT /api/v1/birthdays/:id");

    tracing::debug!(handler = "update", "Dispatching to repo.get");
    if state.repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Birthday {id} not found")));
    }

    let Json(form) = payload.map_err(unreadable_form)?;
    let cleaned = form.clean(&state.guard)?;

    tracing::debug!(handler = "update", "Dispatching to repo.update");
    if !state.repo.update(id, &cleaned).await? {
        return Err(AppError::NotFound(format!("Birthday {id} not found")));
    }

    let entry = Birthday {
        id,
        first_name: cleaned.first_name,
        last_name: cleaned.last_name,
        birthday: cleaned.birthday,
    }
    .to_view((state.today)())?;

    tracing::info!(
        handler = "update",
        id,
        countdown_days = entry.countdown_days,
        status = 200,
        "Responding: birthday updated"
    );

    Ok(Json(SubmitResponse::accepted(entry)))
}

/// DELETE /api/v1/birthdays/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(handler = "delete", id, "Handler: DELETE /api/v1/birthdays/:id");

    tracing::debug!(handler = "delete", "Dispatching to repo.delete");
    let deleted = state.repo.delete(id).await?;
    tracing::debug!(handler = "delete", deleted, "Repo returned");

    if !deleted {
        return Err(AppError::NotFound(format!("Birthday {id} not found")));
    }

    tracing::info!(handler = "delete", id, status = 200, "Responding: birthday deleted");

    Ok(Json(DeleteResponse { deleted: true }))
}
