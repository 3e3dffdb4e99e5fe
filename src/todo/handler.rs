//! Request routing for the list API
//!
//! Maps `(method, path)` pairs onto store operations and turns the results
//! into responses. Routes are matched in this order:
//!
//! | Method | Path                  | Result                                  |
//! |--------|-----------------------|-----------------------------------------|
//! | GET    | `/api/list/<id>`      | list JSON, or `{}` if unknown           |
//! | POST   | `/api/list/new`       | `{"id":N}`                              |
//! | POST   | `/api/list/<id>`      | empty; body `id` must equal `<id>`      |
//! | DELETE | `/api/list/<id>`      | empty                                   |
//! | other  |                       | 404                                     |
//!
//! Replacing or deleting an unknown list is not an error.

use crate::http::parser::{parse_list_id, LIST_PATH};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::todo::json::{format_created, format_list};
use crate::todo::model::{ListId, TodoList};
use crate::todo::store::Store;

const NEW_LIST_PATH: &str = "/api/list/new";

/// Reasons a routed request is rejected
#[derive(Debug)]
pub enum HandlerError {
    /// Path has no parsable list id
    InvalidListId,
    /// Body is not a list document
    InvalidBody(serde_json::Error),
    /// Body `id` disagrees with the id in the path
    IdMismatch { path: ListId, body: ListId },
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::InvalidListId
            | HandlerError::InvalidBody(_)
            | HandlerError::IdMismatch { .. } => StatusCode::BadRequest,
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::InvalidListId => write!(f, "invalid list id in path"),
            HandlerError::InvalidBody(e) => write!(f, "invalid list body: {}", e),
            HandlerError::IdMismatch { path, body } => {
                write!(f, "body id {} does not match path id {}", body, path)
            }
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::InvalidBody(e) => Some(e),
            _ => None,
        }
    }
}

/// Handles list API requests against a shared store
#[derive(Debug, Clone)]
pub struct ListHandler {
    store: Store,
}

impl ListHandler {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Route a request and produce its response.
    ///
    /// Rejections are logged here and never propagate past the response.
    pub async fn handle(&self, request: &Request) -> Response {
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "Routing request"
        );

        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "Rejected request"
                );
                Response::status(e.status())
            }
        }
    }

    async fn dispatch(&self, request: &Request) -> Result<Response, HandlerError> {
        let path = request.path.as_str();
        let on_list = path.starts_with(LIST_PATH);

        match request.method {
            Method::GET if on_list => self.get_list(path).await,
            Method::POST if path == NEW_LIST_PATH => self.create_list(request).await,
            Method::POST if on_list => self.replace_list(request).await,
            Method::DELETE if on_list => self.delete_list(path).await,
            _ => Ok(Response::not_found()),
        }
    }

    async fn get_list(&self, path: &str) -> Result<Response, HandlerError> {
        let id = list_id(path)?;
        let list = self.store.get(id).await;

        Ok(Response::ok(format_list(list.as_ref())))
    }

    async fn create_list(&self, request: &Request) -> Result<Response, HandlerError> {
        let list = decode_body(request)?;
        let id = self.store.create(list).await;

        Ok(Response::ok(format_created(id)))
    }

    async fn replace_list(&self, request: &Request) -> Result<Response, HandlerError> {
        let id = list_id(&request.path)?;
        let list = decode_body(request)?;

        if list.id != id {
            return Err(HandlerError::IdMismatch { path: id, body: list.id });
        }

        self.store.replace(list).await;
        Ok(Response::empty())
    }

    async fn delete_list(&self, path: &str) -> Result<Response, HandlerError> {
        let id = list_id(path)?;
        self.store.delete(id).await;

        Ok(Response::empty())
    }
}

fn list_id(path: &str) -> Result<ListId, HandlerError> {
    parse_list_id(path).map_err(|_| HandlerError::InvalidListId)
}

/// Decodes a list body. A bare `null` decodes as an empty list.
fn decode_body(request: &Request) -> Result<TodoList, HandlerError> {
    tracing::trace!(body = request.body_str().unwrap_or("<non-utf8>"), "Received request body");

    serde_json::from_slice::<Option<TodoList>>(&request.body)
        .map(Option::unwrap_or_default)
        .map_err(HandlerError::InvalidBody)
}
