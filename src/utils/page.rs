//! Page objects.
//!
//! Page routes answer with the name of the client-side component to render
//! and its props. Every page carries the shared `auth` props.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use storehub_auth::Authorization;
use storehub_core::AppError;
use utoipa::ToSchema;

use crate::utils::flash::Flashed;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page {
    #[schema(value_type = String)]
    pub component: &'static str,
    #[schema(value_type = Object)]
    pub props: Map<String, Value>,
}

impl Page {
    pub fn new(component: &'static str, auth: &Authorization) -> Result<Self, AppError> {
        let mut props = Map::new();
        props.insert("auth".to_string(), serde_json::to_value(auth.summary())?);
        Ok(Self { component, props })
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Result<Self, AppError> {
        self.props.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Adds `errors`, `old` and `flash.success`.
    pub fn with_flashed(self, flashed: Flashed) -> Result<Self, AppError> {
        self.with("errors", flashed.errors)?
            .with("old", flashed.old)?
            .with("flash", serde_json::json!({ "success": flashed.success }))
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
