//! # Item API HTTP Server
//!
//! Axum router and server for the item endpoints.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::context::{extract_context, UserContext};
use super::errors::{RestError, RestResult};
use crate::config::{ConfigResult, ServiceConfig};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::service::{
    CreateItemDto, GetItemsPageDto, ItemService, ItemViewModel, ItemsPageViewModel, UpdateItemDto,
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Item server state
pub struct ItemServer<S: ItemService> {
    service: Arc<S>,
    editors: HashSet<i64>,
    cors_origins: Vec<HeaderValue>,
}

impl<S: ItemService + 'static> ItemServer<S> {
    pub fn new(service: S, editors: HashSet<i64>) -> Self {
        Self {
            service: Arc::new(service),
            editors,
            cors_origins: Vec::new(),
        }
    }

    /// Fails if a configured CORS origin does not parse
    pub fn from_config(service: S, config: &ServiceConfig) -> ConfigResult<Self> {
        Ok(Self {
            service: Arc::new(service),
            editors: config.editor_set(),
            cors_origins: config.cors_origin_values()?,
        })
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
        if self.cors_origins.is_empty() {
            return layer.allow_origin(Any);
        }
        layer.allow_origin(AllowOrigin::list(self.cors_origins.clone()))
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let cors = self.cors_layer();
        let state = Arc::new(self);

        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/api/items",
                get(list_handler::<S>).post(create_handler::<S>),
            )
            .route(
                "/api/items/:id",
                get(get_handler::<S>)
                    .put(update_handler::<S>)
                    .delete(delete_handler::<S>),
            )
            .route("/api/user/can-edit", get(can_edit_handler::<S>))
            .layer(cors)
            .with_state(state)
    }

    fn context(&self, headers: &HeaderMap) -> RestResult<UserContext> {
        extract_context(headers, &self.editors)
    }
}

/// Shared state type
type ServerState<S> = Arc<ItemServer<S>>;

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Paged, sorted, filtered list
async fn list_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    query: Result<Query<GetItemsPageDto>, QueryRejection>,
) -> RestResult<Json<ItemsPageViewModel>> {
    let Query(dto) = query.map_err(|e| RestError::InvalidQueryParam(e.body_text()))?;

    let page = server.service.get_items_page(
        dto.query.as_deref(),
        dto.page,
        dto.page_size,
        dto.descending,
    )?;
    Ok(Json(page))
}

async fn get_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    Path(id): Path<i64>,
) -> RestResult<Json<ItemViewModel>> {
    Ok(Json(server.service.get_item(id)?))
}

async fn create_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    headers: HeaderMap,
    body: Result<Json<CreateItemDto>, JsonRejection>,
) -> RestResult<Json<ItemViewModel>> {
    let ctx = server.context(&headers)?;
    ctx.require_edit()?;
    let Json(dto) = body.map_err(|e| RestError::InvalidBody(e.body_text()))?;

    Ok(Json(server.service.create_item(dto, ctx.user_id)?))
}

async fn update_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Result<Json<UpdateItemDto>, JsonRejection>,
) -> RestResult<StatusCode> {
    let ctx = server.context(&headers)?;
    ctx.require_edit()?;
    let Json(mut dto) = body.map_err(|e| RestError::InvalidBody(e.body_text()))?;

    if dto.id == 0 {
        dto.id = id;
    } else if dto.id != id {
        return Err(RestError::InvalidArgument(format!(
            "Body id {} does not match path id {}",
            dto.id, id
        )));
    }

    server.service.update_item(dto, ctx.user_id)?;
    Ok(StatusCode::OK)
}

async fn delete_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> RestResult<StatusCode> {
    let ctx = server.context(&headers)?;
    ctx.require_edit()?;

    server.service.delete_item(id)?;
    Ok(StatusCode::OK)
}

async fn can_edit_handler<S: ItemService + 'static>(
    State(server): State<ServerState<S>>,
    headers: HeaderMap,
) -> RestResult<Json<bool>> {
    let ctx = server.context(&headers)?;
    Ok(Json(ctx.can_edit))
}

/// Bind `addr` and serve `router` until Ctrl-C
pub async fn serve(router: Router, addr: &str) -> std::io::Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}: {}", addr, e)))?;

    let listener = TcpListener::bind(addr).await?;
    log_event_with_fields(Event::Serving, &[("addr", &addr.to_string())]);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    log_event(Event::ShutdownComplete);
    Ok(())
}
