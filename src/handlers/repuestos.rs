use super::common::{map_service_error, success_response};
use crate::{
    entities::repuesto::Model as RepuestoModel, errors::ApiError, handlers::AppState,
    repositories::repuesto_no_encontrado,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepuestoResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub cantidad: i32,
    #[schema(value_type = String)]
    pub precio_compra: Decimal,
    #[schema(value_type = String)]
    pub precio_venta: Decimal,
    /// Stock value, `cantidad * precio_venta`
    #[schema(value_type = String)]
    pub total: Decimal,
}

impl From<RepuestoModel> for RepuestoResponse {
    fn from(model: RepuestoModel) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            descripcion: model.descripcion,
            cantidad: model.cantidad,
            precio_compra: model.precio_compra,
            precio_venta: model.precio_venta,
            total: model.total,
        }
    }
}

/// List spare parts with their current stock
#[utoipa::path(
    get,
    path = "/api/v1/repuestos",
    responses(
        (status = 200, description = "Parts returned", body = [RepuestoResponse]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn list_repuestos(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let repuestos = state
        .services
        .repuestos
        .listar()
        .await
        .map_err(map_service_error)?;

    let body: Vec<RepuestoResponse> = repuestos.into_iter().map(RepuestoResponse::from).collect();
    Ok(success_response(body))
}

/// Get a spare part by ID
#[utoipa::path(
    get,
    path = "/api/v1/repuestos/{id}",
    params(
        ("id" = i32, Path, description = "Part ID")
    ),
    responses(
        (status = 200, description = "Part returned", body = RepuestoResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "repuestos"
)]
pub async fn get_repuesto(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let repuesto = state
        .services
        .repuestos
        .obtener(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| map_service_error(repuesto_no_encontrado(id)))?;

    Ok(success_response(RepuestoResponse::from(repuesto)))
}

pub fn repuesto_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_repuestos))
        .route("/:id", get(get_repuesto))
}
