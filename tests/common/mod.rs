#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::Value;
use taller_api::{
    config::AppConfig,
    db,
    entities::{proveedor, repuesto},
    AppState,
};
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a freshly migrated database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A second connection would open a different in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = taller_api::app_router(state.clone());

        Self { router, state }
    }

    pub async fn seed_proveedor(&self, nombre: &str) -> proveedor::Model {
        proveedor::ActiveModel {
            nombre: Set(nombre.to_string()),
            nombre_empresa: Set(Some(format!("{} S.A.", nombre))),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("insert proveedor")
    }

    /// Insert a part with `total = cantidad * precio_venta`
    pub async fn seed_repuesto(
        &self,
        nombre: &str,
        cantidad: i32,
        precio_compra: Decimal,
        precio_venta: Decimal,
    ) -> repuesto::Model {
        repuesto::ActiveModel {
            nombre: Set(nombre.to_string()),
            descripcion: Set(None),
            cantidad: Set(cantidad),
            precio_compra: Set(precio_compra),
            precio_venta: Set(precio_venta),
            total: Set(Decimal::from(cantidad) * precio_venta),
            ..Default::default()
        }
        .insert(self.state.db.as_ref())
        .await
        .expect("insert repuesto")
    }

    pub async fn repuesto(&self, id: i32) -> repuesto::Model {
        repuesto::Entity::find_by_id(id)
            .one(self.state.db.as_ref())
            .await
            .expect("query repuesto")
            .expect("repuesto exists")
    }

    /// Send a request against the full application router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Reads a decimal serialized either as a JSON string or a number
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.to_string().parse().expect("decimal number"),
        other => panic!("expected decimal, got {other}"),
    }
}
