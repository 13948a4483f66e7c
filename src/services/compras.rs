//! Purchase workflow.
//!
//! Create, update and delete each run as one transaction spanning the
//! purchase header, its lines and the stock of every part they reference.
//! Lines are applied strictly in input order; a part that appears twice in
//! one purchase accumulates quantity and keeps the prices of its last line.

use crate::{
    db::{run_in_transaction, DbPool},
    entities::compra_por_repuesto::Model as DetalleCompraModel,
    errors::ServiceError,
    repositories::{
        compra_no_encontrada, repuesto_no_encontrado, CompraConProveedor, CompraHeader,
        CompraRepository, DetalleCompraRepository, NuevoDetalle, RepuestoRepository,
        RepuestoStock,
    },
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One requested purchase line.
///
/// `precio_compra` defaults to the part's current purchase price and
/// `porcentaje_ganancia` defaults to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetalleEntrada {
    pub repuesto_id: i32,
    pub cantidad: i32,
    pub precio_compra: Option<Decimal>,
    pub porcentaje_ganancia: Option<Decimal>,
}

/// Input for creating or fully replacing a purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NuevaCompra {
    pub proveedor_id: i32,
    pub numerofactura: String,
    pub detalles: Vec<DetalleEntrada>,
}

/// Purchase header with supplier fields and its current lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompraDetallada {
    #[serde(flatten)]
    pub compra: CompraConProveedor,
    pub detalles: Vec<DetalleCompraModel>,
}

/// Derived prices for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineaCalculada {
    pub precio_venta: Decimal,
    pub subtotal: Decimal,
}

fn desbordamiento(campo: &str) -> ServiceError {
    ServiceError::ValidationError(format!("{} fuera de rango", campo))
}

/// `precio_venta = precio_compra * (1 + porcentaje/100)`, `subtotal = cantidad * precio_compra`
pub fn calcular_linea(
    cantidad: i32,
    precio_compra: Decimal,
    porcentaje_ganancia: Decimal,
) -> Result<LineaCalculada, ServiceError> {
    let factor = Decimal::ONE
        .checked_add(porcentaje_ganancia / Decimal::ONE_HUNDRED)
        .ok_or_else(|| desbordamiento("porcentaje_ganancia"))?;
    let precio_venta = precio_compra
        .checked_mul(factor)
        .ok_or_else(|| desbordamiento("precio_venta"))?;
    let subtotal = Decimal::from(cantidad)
        .checked_mul(precio_compra)
        .ok_or_else(|| desbordamiento("subtotal"))?;

    Ok(LineaCalculada {
        precio_venta,
        subtotal,
    })
}

/// Stock value of a part: `cantidad * precio_venta`
pub fn valor_inventario(cantidad: i32, precio_venta: Decimal) -> Result<Decimal, ServiceError> {
    Decimal::from(cantidad)
        .checked_mul(precio_venta)
        .ok_or_else(|| desbordamiento("total"))
}

fn validar(compra: &NuevaCompra) -> Result<(), ServiceError> {
    if compra.numerofactura.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "numerofactura es obligatorio".to_string(),
        ));
    }

    for (i, detalle) in compra.detalles.iter().enumerate() {
        if detalle.cantidad <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "detalles[{}]: cantidad debe ser mayor que 0",
                i
            )));
        }
        if detalle.precio_compra.is_some_and(|p| p < Decimal::ZERO) {
            return Err(ServiceError::ValidationError(format!(
                "detalles[{}]: precio_compra no puede ser negativo",
                i
            )));
        }
        if detalle.porcentaje_ganancia.is_some_and(|p| p < Decimal::ZERO) {
            return Err(ServiceError::ValidationError(format!(
                "detalles[{}]: porcentaje_ganancia no puede ser negativo",
                i
            )));
        }
    }

    Ok(())
}

/// Insert `detalles` as lines of `compra_id` and add their quantities to stock.
/// Returns the sum of the new lines' subtotals.
async fn aplicar_detalles<C>(
    conn: &C,
    compra_id: i32,
    detalles: &[DetalleEntrada],
) -> Result<Decimal, ServiceError>
where
    C: ConnectionTrait,
{
    let mut total = Decimal::ZERO;

    for detalle in detalles {
        let repuesto = RepuestoRepository::find_by_id(conn, detalle.repuesto_id)
            .await?
            .ok_or_else(|| repuesto_no_encontrado(detalle.repuesto_id))?;

        let precio_compra = detalle.precio_compra.unwrap_or(repuesto.precio_compra);
        let porcentaje = detalle.porcentaje_ganancia.unwrap_or(Decimal::ZERO);
        let linea = calcular_linea(detalle.cantidad, precio_compra, porcentaje)?;

        DetalleCompraRepository::create(
            conn,
            NuevoDetalle {
                compras_id: compra_id,
                repuesto_id: detalle.repuesto_id,
                cantidad: detalle.cantidad,
                precio_compra,
                precio_venta: linea.precio_venta,
                subtotal: linea.subtotal,
            },
        )
        .await?;

        total = total
            .checked_add(linea.subtotal)
            .ok_or_else(|| desbordamiento("total"))?;

        let nueva_cantidad = repuesto
            .cantidad
            .checked_add(detalle.cantidad)
            .ok_or_else(|| desbordamiento("cantidad"))?;
        let stock = RepuestoStock {
            cantidad: nueva_cantidad,
            precio_compra,
            precio_venta: linea.precio_venta,
            total: valor_inventario(nueva_cantidad, linea.precio_venta)?,
        };

        debug!(
            compra_id,
            repuesto_id = detalle.repuesto_id,
            cantidad = nueva_cantidad,
            "stock incrementado"
        );
        RepuestoRepository::update_stock(conn, repuesto, stock).await?;
    }

    Ok(total)
}

/// Undo the stock effect of every current line of `compra_id`.
/// Quantities floor at zero; sale prices are left as they are.
async fn revertir_detalles<C>(conn: &C, compra_id: i32) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let detalles = DetalleCompraRepository::find_by_compra(conn, compra_id).await?;

    for detalle in detalles {
        let Some(repuesto) = RepuestoRepository::find_by_id(conn, detalle.repuesto_id).await?
        else {
            warn!(
                compra_id,
                repuesto_id = detalle.repuesto_id,
                "repuesto ya no existe; se omite la reversión"
            );
            continue;
        };

        let cantidad = repuesto.cantidad.saturating_sub(detalle.cantidad).max(0);
        let stock = RepuestoStock {
            cantidad,
            precio_compra: repuesto.precio_compra,
            precio_venta: repuesto.precio_venta,
            total: valor_inventario(cantidad, repuesto.precio_venta)?,
        };

        debug!(
            compra_id,
            repuesto_id = detalle.repuesto_id,
            cantidad,
            "stock revertido"
        );
        RepuestoRepository::update_stock(conn, repuesto, stock).await?;
    }

    Ok(())
}

/// Service for supplier purchases
#[derive(Clone)]
pub struct CompraService {
    db: Arc<DbPool>,
}

impl CompraService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Create a purchase, add its lines to stock and return the new ID
    #[instrument(skip(self, compra), fields(proveedor_id = compra.proveedor_id, lineas = compra.detalles.len()))]
    pub async fn crear(&self, compra: NuevaCompra) -> Result<i32, ServiceError> {
        validar(&compra)?;

        let id = run_in_transaction(self.db.as_ref(), "compra.crear", move |txn| {
            Box::pin(async move {
                let compra_id = CompraRepository::create(
                    txn,
                    CompraHeader {
                        fecha: Utc::now(),
                        proveedor_id: compra.proveedor_id,
                        total: Decimal::ZERO,
                        numerofactura: compra.numerofactura.clone(),
                    },
                )
                .await?;

                let total = aplicar_detalles(txn, compra_id, &compra.detalles).await?;

                CompraRepository::update(
                    txn,
                    compra_id,
                    CompraHeader {
                        fecha: Utc::now(),
                        proveedor_id: compra.proveedor_id,
                        total,
                        numerofactura: compra.numerofactura,
                    },
                )
                .await?;

                Ok(compra_id)
            })
        })
        .await?;

        counter!("taller.compras.created", 1);
        info!(compra_id = id, "Compra creada");
        Ok(id)
    }

    /// Replace the header fields and every line of a purchase.
    ///
    /// Stock from the old lines is reverted before the new lines are applied;
    /// the original `fecha` is kept.
    #[instrument(skip(self, compra), fields(proveedor_id = compra.proveedor_id, lineas = compra.detalles.len()))]
    pub async fn actualizar(&self, id: i32, compra: NuevaCompra) -> Result<(), ServiceError> {
        validar(&compra)?;

        run_in_transaction(self.db.as_ref(), "compra.actualizar", move |txn| {
            Box::pin(async move {
                let existente = CompraRepository::find_by_id(txn, id)
                    .await?
                    .ok_or_else(|| compra_no_encontrada(id))?;

                revertir_detalles(txn, id).await?;
                DetalleCompraRepository::delete_by_compra(txn, id).await?;

                let total = aplicar_detalles(txn, id, &compra.detalles).await?;

                CompraRepository::update(
                    txn,
                    id,
                    CompraHeader {
                        fecha: existente.fecha,
                        proveedor_id: compra.proveedor_id,
                        total,
                        numerofactura: compra.numerofactura,
                    },
                )
                .await
            })
        })
        .await?;

        counter!("taller.compras.updated", 1);
        info!(compra_id = id, "Compra actualizada");
        Ok(())
    }

    /// Delete a purchase and take its lines back out of stock
    #[instrument(skip(self))]
    pub async fn eliminar(&self, id: i32) -> Result<(), ServiceError> {
        run_in_transaction(self.db.as_ref(), "compra.eliminar", move |txn| {
            Box::pin(async move {
                if CompraRepository::find_by_id(txn, id).await?.is_none() {
                    return Err(compra_no_encontrada(id));
                }

                revertir_detalles(txn, id).await?;
                DetalleCompraRepository::delete_by_compra(txn, id).await?;
                CompraRepository::delete(txn, id).await
            })
        })
        .await?;

        counter!("taller.compras.deleted", 1);
        info!(compra_id = id, "Compra eliminada");
        Ok(())
    }

    /// Purchase with supplier fields and lines, or `None` if it does not exist
    #[instrument(skip(self))]
    pub async fn obtener(&self, id: i32) -> Result<Option<CompraDetallada>, ServiceError> {
        let db = self.db.as_ref();

        let Some(compra) = CompraRepository::find_with_proveedor(db, id).await? else {
            return Ok(None);
        };
        let detalles = DetalleCompraRepository::find_by_compra(db, id).await?;

        Ok(Some(CompraDetallada { compra, detalles }))
    }

    /// All purchases with supplier fields, newest first
    #[instrument(skip(self))]
    pub async fn listar(&self) -> Result<Vec<CompraConProveedor>, ServiceError> {
        CompraRepository::find_all(self.db.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn compra_con(detalles: Vec<DetalleEntrada>) -> NuevaCompra {
        NuevaCompra {
            proveedor_id: 1,
            numerofactura: "F-001".to_string(),
            detalles,
        }
    }

    fn detalle(cantidad: i32) -> DetalleEntrada {
        DetalleEntrada {
            repuesto_id: 1,
            cantidad,
            precio_compra: Some(dec!(5)),
            porcentaje_ganancia: Some(dec!(20)),
        }
    }

    #[test]
    fn linea_applies_markup_to_sale_price_only() {
        let linea = calcular_linea(4, dec!(5), dec!(20)).unwrap();
        assert_eq!(linea.precio_venta, dec!(6));
        assert_eq!(linea.subtotal, dec!(20));
    }

    #[test]
    fn linea_supports_fractional_markup() {
        let linea = calcular_linea(3, dec!(12.50), dec!(12.5)).unwrap();
        assert_eq!(linea.precio_venta, dec!(14.0625));
        assert_eq!(linea.subtotal, dec!(37.50));
    }

    #[test]
    fn linea_overflow_is_a_validation_error() {
        assert_matches!(
            calcular_linea(i32::MAX, Decimal::MAX, Decimal::ZERO),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn inventory_value_is_quantity_times_sale_price() {
        assert_eq!(valor_inventario(14, dec!(6)).unwrap(), dec!(84));
        assert_eq!(valor_inventario(0, dec!(6)).unwrap(), Decimal::ZERO);
    }

    #[rstest]
    #[case(detalle(0))]
    #[case(detalle(-3))]
    #[case(DetalleEntrada { precio_compra: Some(dec!(-1)), ..detalle(1) })]
    #[case(DetalleEntrada { porcentaje_ganancia: Some(dec!(-10)), ..detalle(1) })]
    fn invalid_lines_are_rejected(#[case] linea: DetalleEntrada) {
        assert_matches!(
            validar(&compra_con(vec![linea])),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn blank_invoice_number_is_rejected() {
        let mut compra = compra_con(vec![detalle(1)]);
        compra.numerofactura = "   ".to_string();
        assert_matches!(validar(&compra), Err(ServiceError::ValidationError(_)));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![detalle(1)])]
    #[case(vec![DetalleEntrada { precio_compra: None, porcentaje_ganancia: None, ..detalle(2) }])]
    #[case(vec![DetalleEntrada { precio_compra: Some(Decimal::ZERO), ..detalle(2) }])]
    fn valid_purchases_pass(#[case] detalles: Vec<DetalleEntrada>) {
        assert!(validar(&compra_con(detalles)).is_ok());
    }

    proptest! {
        #[test]
        fn subtotal_is_quantity_times_purchase_price(
            cantidad in 1i32..10_000,
            centavos in 0i64..10_000_000,
            porcentaje in 0u32..500,
        ) {
            let precio = Decimal::new(centavos, 2);
            let linea = calcular_linea(cantidad, precio, Decimal::from(porcentaje)).unwrap();
            prop_assert_eq!(linea.subtotal, Decimal::from(cantidad) * precio);
            prop_assert!(linea.precio_venta >= precio);
        }

        #[test]
        fn zero_markup_keeps_sale_price_equal_to_purchase_price(
            cantidad in 1i32..10_000,
            centavos in 0i64..10_000_000,
        ) {
            let precio = Decimal::new(centavos, 2);
            let linea = calcular_linea(cantidad, precio, Decimal::ZERO).unwrap();
            prop_assert_eq!(linea.precio_venta, precio);
        }
    }
}
