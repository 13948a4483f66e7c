use super::common::{
    created_response, map_service_error, success_response, validate_input, MessageResponse,
};
use crate::{
    entities::compra_por_repuesto::Model as DetalleCompraModel,
    errors::ApiError,
    handlers::AppState,
    repositories::{compra_no_encontrada, CompraConProveedor},
    services::{CompraDetallada, DetalleEntrada, NuevaCompra},
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Request and response DTOs

fn no_negativo(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_value"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct DetalleCompraRequest {
    #[validate(range(min = 1))]
    pub repuesto_id: i32,
    #[validate(range(min = 1))]
    pub cantidad: i32,
    /// Defaults to the part's current purchase price
    #[validate(custom = "no_negativo")]
    #[schema(value_type = Option<String>, example = "5.00")]
    pub precio_compra: Option<Decimal>,
    /// Markup percentage applied to the purchase price, defaults to 0
    #[validate(custom = "no_negativo")]
    #[schema(value_type = Option<String>, example = "20")]
    pub porcentaje_ganancia: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CompraRequest {
    #[validate(range(min = 1))]
    pub proveedor_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub numerofactura: String,
    #[validate]
    #[serde(default)]
    pub detalles: Vec<DetalleCompraRequest>,
}

impl From<CompraRequest> for NuevaCompra {
    fn from(request: CompraRequest) -> Self {
        Self {
            proveedor_id: request.proveedor_id,
            numerofactura: request.numerofactura,
            detalles: request
                .detalles
                .into_iter()
                .map(|d| DetalleEntrada {
                    repuesto_id: d.repuesto_id,
                    cantidad: d.cantidad,
                    precio_compra: d.precio_compra,
                    porcentaje_ganancia: d.porcentaje_ganancia,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetalleCompraResponse {
    pub id: i32,
    pub repuesto_id: i32,
    pub cantidad: i32,
    #[schema(value_type = String)]
    pub precio_compra: Decimal,
    #[schema(value_type = String)]
    pub precio_venta: Decimal,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
}

impl From<DetalleCompraModel> for DetalleCompraResponse {
    fn from(model: DetalleCompraModel) -> Self {
        Self {
            id: model.id,
            repuesto_id: model.repuesto_id,
            cantidad: model.cantidad,
            precio_compra: model.precio_compra,
            precio_venta: model.precio_venta,
            subtotal: model.subtotal,
        }
    }
}

/// Purchase header with supplier fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompraResponse {
    pub id: i32,
    pub fecha: DateTime<Utc>,
    pub proveedor_id: i32,
    pub proveedor_nombre: String,
    pub nombre_empresa: Option<String>,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub numerofactura: String,
    /// Present on single-purchase lookups only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalles: Option<Vec<DetalleCompraResponse>>,
}

impl From<CompraConProveedor> for CompraResponse {
    fn from(compra: CompraConProveedor) -> Self {
        Self {
            id: compra.id,
            fecha: compra.fecha,
            proveedor_id: compra.proveedor_id,
            proveedor_nombre: compra.proveedor_nombre,
            nombre_empresa: compra.nombre_empresa,
            total: compra.total,
            numerofactura: compra.numerofactura,
            detalles: None,
        }
    }
}

impl From<CompraDetallada> for CompraResponse {
    fn from(detallada: CompraDetallada) -> Self {
        let mut response = Self::from(detallada.compra);
        response.detalles = Some(
            detallada
                .detalles
                .into_iter()
                .map(DetalleCompraResponse::from)
                .collect(),
        );
        response
    }
}

// Handler functions

/// List all purchases, newest first
#[utoipa::path(
    get,
    path = "/api/v1/compras",
    responses(
        (status = 200, description = "Purchases returned", body = [CompraResponse],
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "compras"
)]
pub async fn list_compras(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let compras = state
        .services
        .compras
        .listar()
        .await
        .map_err(map_service_error)?;

    let body: Vec<CompraResponse> = compras.into_iter().map(CompraResponse::from).collect();
    Ok(success_response(body))
}

/// Get a purchase with its lines
#[utoipa::path(
    get,
    path = "/api/v1/compras/{id}",
    params(
        ("id" = i32, Path, description = "Purchase ID")
    ),
    responses(
        (status = 200, description = "Purchase returned", body = CompraResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "compras"
)]
pub async fn get_compra(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let compra = state
        .services
        .compras
        .obtener(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| map_service_error(compra_no_encontrada(id)))?;

    Ok(success_response(CompraResponse::from(compra)))
}

/// Register a purchase and add its lines to stock
#[utoipa::path(
    post,
    path = "/api/v1/compras",
    request_body = CompraRequest,
    responses(
        (status = 201, description = "Purchase created", body = MessageResponse,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced part not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "compras"
)]
pub async fn create_compra(
    State(state): State<AppState>,
    Json(payload): Json<CompraRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let id = state
        .services
        .compras
        .crear(payload.into())
        .await
        .map_err(map_service_error)?;

    info!(compra_id = id, "Purchase created");
    Ok(created_response(MessageResponse::with_id(
        "Compra creada exitosamente",
        id,
    )))
}

/// Replace a purchase's header and lines
#[utoipa::path(
    put,
    path = "/api/v1/compras/{id}",
    params(
        ("id" = i32, Path, description = "Purchase ID")
    ),
    request_body = CompraRequest,
    responses(
        (status = 200, description = "Purchase updated", body = MessageResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "compras"
)]
pub async fn update_compra(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompraRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .compras
        .actualizar(id, payload.into())
        .await
        .map_err(map_service_error)?;

    info!(compra_id = id, "Purchase updated");
    Ok(success_response(MessageResponse::new(
        "Compra actualizada exitosamente",
    )))
}

/// Delete a purchase and revert its stock
#[utoipa::path(
    delete,
    path = "/api/v1/compras/{id}",
    params(
        ("id" = i32, Path, description = "Purchase ID")
    ),
    responses(
        (status = 200, description = "Purchase deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "compras"
)]
pub async fn delete_compra(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .compras
        .eliminar(id)
        .await
        .map_err(map_service_error)?;

    info!(compra_id = id, "Purchase deleted");
    Ok(success_response(MessageResponse::new(
        "Compra eliminada exitosamente",
    )))
}

/// Creates the router for purchase endpoints
pub fn compra_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_compras).post(create_compra))
        .route(
            "/:id",
            get(get_compra).put(update_compra).delete(delete_compra),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(detalles: Vec<DetalleCompraRequest>) -> CompraRequest {
        CompraRequest {
            proveedor_id: 1,
            numerofactura: "F-100".to_string(),
            detalles,
        }
    }

    fn linea() -> DetalleCompraRequest {
        DetalleCompraRequest {
            repuesto_id: 3,
            cantidad: 2,
            precio_compra: Some(dec!(10)),
            porcentaje_ganancia: None,
        }
    }

    #[test]
    fn nested_lines_are_validated() {
        assert!(request(vec![linea()]).validate().is_ok());

        let bad = DetalleCompraRequest {
            cantidad: 0,
            ..linea()
        };
        assert!(request(vec![bad]).validate().is_err());

        let negative = DetalleCompraRequest {
            precio_compra: Some(dec!(-1)),
            ..linea()
        };
        assert!(request(vec![negative]).validate().is_err());
    }

    #[test]
    fn empty_invoice_number_is_invalid() {
        let mut req = request(vec![]);
        req.numerofactura = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_detalles_deserializes_as_empty() {
        let req: CompraRequest =
            serde_json::from_value(serde_json::json!({ "proveedor_id": 1, "numerofactura": "A" }))
                .unwrap();
        assert!(req.detalles.is_empty());
    }

    #[test]
    fn request_converts_to_service_input() {
        let nueva: NuevaCompra = request(vec![linea()]).into();
        assert_eq!(nueva.proveedor_id, 1);
        assert_eq!(nueva.detalles.len(), 1);
        assert_eq!(nueva.detalles[0].precio_compra, Some(dec!(10)));
        assert_eq!(nueva.detalles[0].porcentaje_ganancia, None);
    }
}
