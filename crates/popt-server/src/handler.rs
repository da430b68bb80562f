use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use popt_sdk::{Entry, OptimizeRequest, Optimizer, Template, VersionComparison};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Run `f` against the optimizer on the blocking pool. The stores do
/// synchronous file I/O under a mutex.
pub(crate) async fn blocking<T, F>(state: AppState, f: F) -> ServerResult<T>
where
    F: FnOnce(&Optimizer) -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?
}

/// Health check handler.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Info handler.
pub async fn info(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    blocking(state, |opt| {
        Ok(Json(json!({
            "name": "popt-server",
            "version": env!("CARGO_PKG_VERSION"),
            "provider": opt.provider_name(),
            "historyCap": opt.entries().cap(),
            "entries": opt.entries().len(),
        })))
    })
    .await
}

// ---- History ----

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<Entry>>> {
    blocking(state, move |opt| Ok(Json(opt.search(&params.q)))).await
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Entry>> {
    blocking(state, move |opt| Ok(Json(opt.entry(&id)?))).await
}

/// Insert or replace an entry. The body must be a complete entry record
/// whose id matches the path.
pub async fn put_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ServerResult<Json<Entry>> {
    let entry = Entry::from_record(&body).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    if entry.id != id {
        return Err(ServerError::BadRequest(format!(
            "entry id {} does not match path id {id}",
            entry.id
        )));
    }
    blocking(state, move |opt| {
        opt.save_entry(&entry)?;
        Ok(Json(entry))
    })
    .await
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let removed = blocking(state, move |opt| Ok(opt.delete_entry(&id)?)).await?;
    Ok(if removed { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND })
}

/// The whole history as a downloadable JSON attachment.
pub async fn export_history(State(state): State<AppState>) -> ServerResult<Response> {
    let doc = blocking(state, |opt| Ok(opt.export()?)).await?;
    let disposition = format!("attachment; filename=\"{}\"", doc.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.body,
    )
        .into_response())
}

/// Merge an exported document into the history. The raw body is parsed
/// here so malformed JSON gets the same error shape as a wrong root type.
pub async fn import_history(
    State(state): State<AppState>,
    body: String,
) -> ServerResult<Json<Value>> {
    let report = blocking(state, move |opt| Ok(opt.import(&body)?)).await?;
    info!(imported = report.imported, total = report.total, "import via api");
    Ok(Json(json!({
        "imported": report.imported,
        "dropped": report.dropped,
        "total": report.total,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// Word diff between two states of an entry. Without `from` and `to` the
/// latest stored version is compared with the current result.
pub async fn compare(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CompareParams>,
) -> ServerResult<Json<VersionComparison>> {
    let range = match (params.from, params.to) {
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => {
            return Err(ServerError::BadRequest(
                "from and to must be given together".into(),
            ))
        }
    };
    blocking(state, move |opt| Ok(Json(opt.compare(&id, range)?))).await
}

// ---- Templates ----

pub async fn list_templates(State(state): State<AppState>) -> ServerResult<Json<Vec<Template>>> {
    blocking(state, |opt| Ok(Json(opt.list_templates()))).await
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Template>> {
    blocking(state, move |opt| Ok(Json(opt.template(&id)?))).await
}

pub async fn put_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(template): Json<Template>,
) -> ServerResult<Json<Template>> {
    if template.id != id {
        return Err(ServerError::BadRequest(format!(
            "template id {} does not match path id {id}",
            template.id
        )));
    }
    blocking(state, move |opt| {
        opt.save_template(&template)?;
        Ok(Json(template))
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct NewTemplate {
    pub content: String,
}

/// Save `content` as a new, automatically named template.
pub async fn create_template(
    State(state): State<AppState>,
    Json(body): Json<NewTemplate>,
) -> ServerResult<(StatusCode, Json<Template>)> {
    let template = blocking(state, move |opt| Ok(opt.save_as_template(&body.content)?)).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let removed = blocking(state, move |opt| Ok(opt.delete_template(&id)?)).await?;
    Ok(if removed { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND })
}

// ---- Optimization ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeBody {
    pub prompt: String,
    pub entry_id: Option<String>,
    pub tags: Option<Vec<String>>,
    pub template_id: Option<String>,
}

impl From<OptimizeBody> for OptimizeRequest {
    fn from(body: OptimizeBody) -> Self {
        OptimizeRequest {
            prompt: body.prompt,
            entry_id: body.entry_id,
            tags: body.tags,
            template_id: body.template_id,
        }
    }
}

/// The store reads and writes around the completion call run inline on the
/// worker; only the completion itself awaits.
pub async fn optimize(
    State(state): State<AppState>,
    Json(body): Json<OptimizeBody>,
) -> ServerResult<Json<Entry>> {
    let entry = state.optimize(body.into()).await?;
    Ok(Json(entry))
}
