mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{decimal, response_json, TestApp};

#[tokio::test]
async fn purchase_http_lifecycle() {
    let app = TestApp::new().await;
    let proveedor = app.seed_proveedor("Repuestos Norte").await;
    let filtro = app.seed_repuesto("Filtro de aceite", 10, dec!(5), dec!(6)).await;

    // Create
    let response = app
        .request(
            Method::POST,
            "/api/v1/compras",
            Some(json!({
                "proveedor_id": proveedor.id,
                "numerofactura": "F-001",
                "detalles": [
                    { "repuesto_id": filtro.id, "cantidad": 4, "precio_compra": "5", "porcentaje_ganancia": "20" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert!(body["message"].as_str().is_some());
    let id = body["id"].as_i64().expect("purchase id");

    // Get
    let response = app
        .request(Method::GET, &format!("/api/v1/compras/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["numerofactura"], "F-001");
    assert_eq!(body["proveedor_nombre"], "Repuestos Norte");
    assert_eq!(decimal(&body["total"]), dec!(20));
    let detalles = body["detalles"].as_array().expect("detalles array");
    assert_eq!(detalles.len(), 1);
    assert_eq!(decimal(&detalles[0]["precio_venta"]), dec!(6));

    // Part stock through the inventory endpoint
    let response = app
        .request(Method::GET, &format!("/api/v1/repuestos/{}", filtro.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["cantidad"], 14);
    assert_eq!(decimal(&body["total"]), dec!(84));

    // Update
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/compras/{}", id),
            Some(json!({
                "proveedor_id": proveedor.id,
                "numerofactura": "F-001-B",
                "detalles": [
                    { "repuesto_id": filtro.id, "cantidad": 2, "precio_compra": 5, "porcentaje_ganancia": 20 }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_json(response).await["message"].is_string());
    assert_eq!(app.repuesto(filtro.id).await.cantidad, 12);

    // List
    let response = app.request(Method::GET, "/api/v1/compras", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let compras = body.as_array().expect("array body");
    assert_eq!(compras.len(), 1);
    assert_eq!(compras[0]["numerofactura"], "F-001-B");
    assert_eq!(decimal(&compras[0]["total"]), dec!(10));
    assert!(compras[0].get("detalles").is_none());

    // Delete
    let response = app
        .request(Method::DELETE, &format!("/api/v1/compras/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.repuesto(filtro.id).await.cantidad, 10);

    let response = app
        .request(Method::GET, &format!("/api/v1/compras/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_purchase_returns_404() {
    let app = TestApp::new().await;
    let proveedor = app.seed_proveedor("Nadie").await;

    let response = app.request(Method::GET, "/api/v1/compras/12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Not found: Compra con ID 12345 no encontrada");
    assert!(body["request_id"].is_string());

    let response = app
        .request(
            Method::PUT,
            "/api/v1/compras/12345",
            Some(json!({ "proveedor_id": proveedor.id, "numerofactura": "X", "detalles": [] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(Method::DELETE, "/api/v1/compras/12345", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_part_returns_404_and_changes_nothing() {
    let app = TestApp::new().await;
    let proveedor = app.seed_proveedor("Frenos").await;
    let disco = app.seed_repuesto("Disco", 2, dec!(40), dec!(40)).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/compras",
            Some(json!({
                "proveedor_id": proveedor.id,
                "numerofactura": "F-404",
                "detalles": [
                    { "repuesto_id": disco.id, "cantidad": 1 },
                    { "repuesto_id": 999, "cantidad": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await["message"],
        "Not found: Repuesto con ID 999 no encontrado"
    );

    assert_eq!(app.repuesto(disco.id).await.cantidad, 2);
    let body = response_json(app.request(Method::GET, "/api/v1/compras", None).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn invalid_payloads_return_400() {
    let app = TestApp::new().await;
    let proveedor = app.seed_proveedor("Validaciones").await;
    let repuesto = app.seed_repuesto("Junta", 1, dec!(3), dec!(3)).await;

    let cases = [
        json!({ "proveedor_id": proveedor.id, "numerofactura": "", "detalles": [] }),
        json!({
            "proveedor_id": proveedor.id,
            "numerofactura": "F-1",
            "detalles": [{ "repuesto_id": repuesto.id, "cantidad": 0 }]
        }),
        json!({
            "proveedor_id": proveedor.id,
            "numerofactura": "F-1",
            "detalles": [{ "repuesto_id": repuesto.id, "cantidad": 1, "precio_compra": "-2" }]
        }),
    ];

    for payload in cases {
        let response = app
            .request(Method::POST, "/api/v1/compras", Some(payload))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.repuesto(repuesto.id).await.cantidad, 1);
}

#[tokio::test]
async fn request_id_is_echoed_on_responses() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/compras", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_and_status_endpoints_answer() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "up");

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["environment"], "test");
}

#[tokio::test]
async fn repuestos_list_is_ordered_by_name() {
    let app = TestApp::new().await;
    app.seed_repuesto("Zapata", 1, dec!(1), dec!(1)).await;
    app.seed_repuesto("Amortiguador", 1, dec!(1), dec!(1)).await;

    let response = app.request(Method::GET, "/api/v1/repuestos", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let nombres: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["nombre"].as_str())
        .collect();
    assert_eq!(nombres, vec!["Amortiguador", "Zapata"]);

    let response = app.request(Method::GET, "/api/v1/repuestos/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_json(response).await["message"],
        "Not found: Repuesto con ID 999 no encontrado"
    );
}
