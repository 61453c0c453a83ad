//! Request handlers.
//!
//! Store operations may touch the filesystem, so each one runs on the
//! blocking thread pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use folio_core::{
    route_host, ContentHash, HostRoute, Metadata, NewPage, PageChange, PageDiff, Project,
    ProjectResult, ProjectSelector, ProjectStore, ProjectView, SiteAddress, VersionId,
    VersionSummary,
};

use crate::error::ApiError;

/// Shared state of every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: ProjectStore,
    pub base_domain: Arc<str>,
    pub default_page: Arc<str>,
}

/// A page as sent by clients on create and update.
#[derive(Clone, Debug, Deserialize)]
pub struct PagePayload {
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    /// Remove the page. Only valid on update.
    #[serde(default)]
    pub delete: bool,
}

impl PagePayload {
    fn into_new_page(self) -> Result<NewPage, ApiError> {
        if self.delete {
            return Err(ApiError::bad_request(format!(
                "page {:?}: delete is only valid on update",
                self.name
            )));
        }
        let Some(content) = self.content else {
            return Err(ApiError::bad_request(format!("page {:?} has no content", self.name)));
        };
        Ok(NewPage::new(self.name, content).with_metadata(self.metadata.unwrap_or_default()))
    }

    fn into_diff(self) -> Result<PageDiff, ApiError> {
        if self.delete {
            return Ok(PageDiff::delete(self.name));
        }
        let Some(content) = self.content else {
            return Err(ApiError::bad_request(format!(
                "page {:?} needs content or \"delete\": true",
                self.name
            )));
        };
        Ok(PageDiff {
            name: self.name,
            change: PageChange::Put {
                content: content.into_bytes(),
                metadata: self.metadata,
            },
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub pages: Vec<PagePayload>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

/// Unwrap a JSON body, reporting a malformed one as a 400 `{"error"}`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Run a store operation off the async executor.
async fn blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ProjectResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .map_err(ApiError::from)
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn list_projects_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let store = state.store.clone();
    Ok(Json(blocking(move || store.list_projects()).await?))
}

pub async fn create_project_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<Json<ProjectView>, ApiError> {
    let request = json_body(payload)?;
    let pages = request
        .pages
        .into_iter()
        .map(PagePayload::into_new_page)
        .collect::<Result<Vec<_>, _>>()?;
    let store = state.store.clone();
    let name = request.name;
    Ok(Json(blocking(move || store.create_project(&name, pages)).await?))
}

pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<ProjectView>, ApiError> {
    let version = parse_version(&name, query.version.as_deref())?;
    let store = state.store.clone();
    Ok(Json(
        blocking(move || store.get_project(&name, version.as_ref())).await?,
    ))
}

pub async fn update_project_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<Vec<PagePayload>>, JsonRejection>,
) -> Result<Json<ProjectView>, ApiError> {
    let diffs = json_body(payload)?
        .into_iter()
        .map(PagePayload::into_diff)
        .collect::<Result<Vec<_>, _>>()?;
    let store = state.store.clone();
    Ok(Json(
        blocking(move || store.update_project(&name, &diffs)).await?,
    ))
}

pub async fn list_versions_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<VersionSummary>>, ApiError> {
    let store = state.store.clone();
    Ok(Json(
        blocking(move || store.list_project_versions(&name)).await?,
    ))
}

pub async fn raw_content_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Response, ApiError> {
    let hash: ContentHash = hash
        .parse()
        .map_err(|e| ApiError::bad_request(format!("invalid content hash: {e}")))?;
    let store = state.store.clone();
    let content = blocking(move || store.get_content(&hash)).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        content,
    )
        .into_response())
}

/// `GET /` on any host.
pub async fn site_index_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    match route(&state, &headers, &uri)? {
        HostRoute::Project(selector) => {
            let page = state.default_page.to_string();
            serve_page(state, selector, page).await
        }
        HostRoute::Api | HostRoute::Apex | HostRoute::Foreign => {
            Ok(Json(json!({ "message": "Hello World!" })).into_response())
        }
    }
}

/// `GET /:page` on any host.
pub async fn site_page_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ApiError> {
    match route(&state, &headers, &uri)? {
        HostRoute::Project(selector) => serve_page(state, selector, page).await,
        _ => Err(ApiError::not_found(format!("no route for /{page}"))),
    }
}

fn route(state: &AppState, headers: &HeaderMap, uri: &Uri) -> Result<HostRoute, ApiError> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.host())
        .unwrap_or_default();
    Ok(route_host(host, &state.base_domain)?)
}

async fn serve_page(
    state: AppState,
    selector: ProjectSelector,
    page: String,
) -> Result<Response, ApiError> {
    let address = SiteAddress {
        selector,
        page: Some(page),
    };
    let store = state.store.clone();
    let resolved = blocking(move || store.resolve(&address)).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        resolved.content,
    )
        .into_response())
}

fn parse_version(project: &str, version: Option<&str>) -> Result<Option<VersionId>, ApiError> {
    version
        .map(|v| {
            VersionId::parse(v).map_err(|_| {
                ApiError::from(folio_core::ProjectError::VersionNotFound {
                    project: project.to_string(),
                    version: v.to_string(),
                })
            })
        })
        .transpose()
}
