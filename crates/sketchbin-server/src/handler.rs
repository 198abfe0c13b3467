use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use sketchbin_types::{DocumentId, DocumentSummary};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Ids that do not parse are reported as absent, never as a bad request.
fn parse_id(raw: &str) -> ServerResult<DocumentId> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

/// Clients post JSON as `text/plain`, so the content type is ignored.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> ServerResult<T> {
    serde_json::from_slice(body).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "msg": "pong" }))
}

pub async fn create_document(State(state): State<AppState>, body: Bytes) -> ServerResult<Json<Value>> {
    let id = state.store.create(&body)?;
    tracing::debug!(%id, size = body.len(), "document created");
    Ok(Json(json!({ "id": id })))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ServerResult<Response> {
    let id = parse_id(&raw)?;
    let payload = state.store.find(&id)?.ok_or(ServerError::NotFound)?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], payload).into_response())
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&raw)?;
    if !state.store.delete(&id)? {
        return Err(ServerError::NotFound);
    }
    tracing::debug!(%id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: DocumentId,
    pub size: u64,
    pub created_at: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_link: Option<String>,
}

impl ListEntry {
    fn from_summary(summary: DocumentSummary, config: &ServerConfig) -> Self {
        let share_link = summary
            .key
            .as_deref()
            .map(|key| config.share_link(&summary.id, key));
        Self {
            id: summary.id,
            size: summary.size,
            created_at: summary.created_at.map(|t| t.to_rfc3339()),
            name: summary.name,
            share_link,
        }
    }
}

pub async fn list_documents(State(state): State<AppState>) -> ServerResult<Json<Vec<ListEntry>>> {
    let entries = state
        .store
        .list()?
        .into_iter()
        .map(|s| ListEntry::from_summary(s, &state.config))
        .collect();
    Ok(Json(entries))
}

#[derive(Debug, Default, Deserialize)]
struct NameBody {
    #[serde(default)]
    name: Option<String>,
}

/// Distinguishes an explicit `null` from an absent field.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
struct MetaBody {
    #[serde(default, deserialize_with = "deserialize_some")]
    name: Option<Option<String>>,
    #[serde(default)]
    key: Option<String>,
}

fn name_response(state: &AppState, id: &DocumentId) -> ServerResult<Json<Value>> {
    let name = state.store.get_name(id)?;
    Ok(Json(json!({ "id": id, "name": name })))
}

pub async fn set_document_name(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> ServerResult<Json<Value>> {
    let id = parse_id(&raw)?;
    let body: NameBody = parse_json(&body)?;
    if !state.store.set_name(&id, body.name.as_deref())? {
        return Err(ServerError::NotFound);
    }
    name_response(&state, &id)
}

pub async fn set_document_meta(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> ServerResult<Json<Value>> {
    let body: MetaBody = parse_json(&body)?;
    if body.name.is_none() && body.key.is_none() {
        return Err(ServerError::BadRequest("name or key required".into()));
    }
    let id = parse_id(&raw)?;
    if !state.store.exists(&id)? {
        return Err(ServerError::NotFound);
    }
    if let Some(name) = &body.name {
        if !state.store.set_name(&id, name.as_deref())? {
            return Err(ServerError::NotFound);
        }
    }
    if let Some(key) = &body.key {
        if !state.store.set_key(&id, key)? {
            return Err(ServerError::NotFound);
        }
    }
    name_response(&state, &id)
}

const COMMIT_ACTION: &str = "documents:commit";
const BATCH_GET_ACTION: &str = "documents:batchGet";

/// `POST /v1/projects/:project/databases/:database/:action`.
///
/// Project and database are accepted and ignored; there is a single
/// namespace per process.
pub async fn docdb_action(
    State(state): State<AppState>,
    Path((_project, _database, action)): Path<(String, String, String)>,
    body: Bytes,
) -> ServerResult<Response> {
    match action.as_str() {
        COMMIT_ACTION => {
            let response = state.docdb.commit(parse_json(&body)?)?;
            Ok(Json(response).into_response())
        }
        BATCH_GET_ACTION => {
            let results = state.docdb.batch_get(parse_json(&body)?)?;
            Ok(Json(results).into_response())
        }
        _ => Err(ServerError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_not_found() {
        let not_hex = "z".repeat(32);
        for raw in ["", "abc", "../../etc/passwd", not_hex.as_str()] {
            assert!(matches!(parse_id(raw), Err(ServerError::NotFound)));
        }
        assert!(parse_id(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn meta_body_distinguishes_null_from_absent() {
        let absent: MetaBody = parse_json(br#"{"key":"k"}"#).unwrap();
        assert_eq!(absent.name, None);

        let null: MetaBody = parse_json(br#"{"name":null}"#).unwrap();
        assert_eq!(null.name, Some(None));

        let set: MetaBody = parse_json(br#"{"name":"x"}"#).unwrap();
        assert_eq!(set.name, Some(Some("x".into())));
    }

    #[test]
    fn invalid_json_is_bad_request() {
        let err = parse_json::<NameBody>(b"{not json").unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }
}
