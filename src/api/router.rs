//! Request routing for the example REST resource
//!
//! Routes:
//! - `GET    /example/users`     list ids
//! - `GET    /example/user/:id`  fetch one user
//! - `POST   /example/user`      create (`{"name": ...}`)
//! - `PATCH  /example/user/:id`  rename (`{"name": ...}`)
//! - `DELETE /example/user/:id`  remove

use crate::api::users::UserStore;
use crate::error::{ApiError, ApiResult};
use crate::html::url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub path: String,
    #[serde(default)]
    pub body: Value,
    /// Language the caller wants pages rendered in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Null,
            lang: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Path without query string or trailing slash
    pub fn route_path(&self) -> &str {
        let path = self.path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        }
    }

    /// Value of a query string parameter, percent-decoded
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::query_param(&self.path, name)
    }

    fn name(&self) -> Option<&str> {
        self.body.get("name").and_then(Value::as_str)
    }
}

/// Outgoing response: a status code and a JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self {
            status: error.status(),
            body: json!({
                "error": error.kind(),
                "message": error.to_string(),
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Users,
    User,
    UserById(String),
}

impl Route {
    fn parse(path: &str) -> ApiResult<Option<Self>> {
        let route = match path {
            "/example/users" => Some(Route::Users),
            "/example/user" => Some(Route::User),
            _ => match path.strip_prefix("/example/user/") {
                Some(id) if !id.contains('/') => {
                    let id = urlencoding::decode(id)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid id encoding: {}", e)))?;
                    Some(Route::UserById(id.into_owned()))
                }
                _ => None,
            },
        };
        Ok(route)
    }
}

/// Maps requests onto the [`UserStore`] handlers
#[derive(Debug, Default)]
pub struct Router {
    store: UserStore,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one request; handler errors become error responses
    pub fn handle(&mut self, request: &Request) -> Response {
        match self.dispatch(request) {
            Ok(body) => Response::ok(body),
            Err(e) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status = e.status(),
                    "{}",
                    e
                );
                Response::from_error(&e)
            }
        }
    }

    /// Whether `path` belongs to the REST surface
    pub fn matches(path: &str) -> bool {
        path.starts_with("/example/")
    }

    fn dispatch(&mut self, request: &Request) -> ApiResult<Value> {
        let path = request.route_path();
        let route = Route::parse(path)?.ok_or_else(|| ApiError::RouteNotFound {
            method: request.method.to_string(),
            path: path.to_string(),
        })?;

        match (request.method, route) {
            (Method::Get, Route::Users) => Ok(json!(self.store.list())),
            (Method::Post, Route::User) => {
                let id = self.store.create(request.name())?;
                Ok(Value::String(id))
            }
            (Method::Get, Route::UserById(id)) => {
                let user = self.store.get(&id)?;
                Ok(json!(user))
            }
            (Method::Patch, Route::UserById(id)) => {
                self.store.update(&id, request.name())?;
                Ok(Value::Null)
            }
            (Method::Delete, Route::UserById(id)) => {
                self.store.delete(&id)?;
                Ok(Value::Null)
            }
            (method, _) => Err(ApiError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            }),
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }
}
