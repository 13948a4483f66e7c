use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taller API",
        version = "0.1.0",
        description = r#"
# Taller API

Backend for a repair shop: supplier purchases and the spare-parts stock they feed.

## Purchases

Registering a purchase adds every line's quantity to the referenced part and
updates its purchase and sale prices. Updating a purchase reverts the stock of
its previous lines before applying the new ones; deleting it reverts them. Each
of these runs in a single database transaction.

## Error Handling

Errors share one body format:

```json
{
  "error": "Not Found",
  "message": "Compra con ID 42 no encontrada",
  "request_id": "5f0c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "compras", description = "Supplier purchases"),
        (name = "repuestos", description = "Spare-parts inventory")
    ),
    paths(
        // Purchases
        crate::handlers::compras::list_compras,
        crate::handlers::compras::get_compra,
        crate::handlers::compras::create_compra,
        crate::handlers::compras::update_compra,
        crate::handlers::compras::delete_compra,

        // Parts
        crate::handlers::repuestos::list_repuestos,
        crate::handlers::repuestos::get_repuesto,
    ),
    components(
        schemas(
            crate::handlers::common::MessageResponse,
            crate::handlers::compras::CompraRequest,
            crate::handlers::compras::DetalleCompraRequest,
            crate::handlers::compras::CompraResponse,
            crate::handlers::compras::DetalleCompraResponse,
            crate::handlers::repuestos::RepuestoResponse,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDocV1::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_purchase_and_part_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Taller API"));
        assert!(json.contains("/api/v1/compras/{id}"));
        assert!(json.contains("/api/v1/repuestos"));
        assert!(json.contains("CompraRequest"));
    }
}
