use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::models::bancos::BancoId;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
// Tres clases: validación (rechazada antes de abrir transacción),
// precondición (detectada dentro de la transacción, aborta limpio) e
// infraestructura (reintentable por el llamador, nunca aplicada a medias).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Stock insuficiente: faltan {faltante} unidades")]
    StockInsuficiente { faltante: Decimal },

    #[error("Capital insuficiente en {banco}")]
    CapitalInsuficiente { banco: BancoId },

    #[error("Cliente no resuelto: se requiere un id o un nombre")]
    ClienteNoResuelto,

    #[error("Distribuidor no resuelto: se requiere un id o un nombre")]
    DistribuidorNoResuelto,

    #[error("La cantidad debe ser mayor a cero")]
    CantidadInvalida,

    #[error("Precio inválido")]
    PrecioInvalido,

    #[error("El monto debe ser mayor a cero")]
    MontoInvalido,

    #[error("Se requiere un banco de origen para el pago inicial")]
    BancoOrigenRequerido,

    #[error("La operación ya está liquidada")]
    YaLiquidada,

    #[error("El abono excede el monto restante")]
    AbonoExcedente,

    #[error("El banco origen y destino no pueden ser iguales")]
    TransferenciaInvalida,

    #[error("Registro no encontrado")]
    NoEncontrado,

    // Variante para errores de base de datos (sqlx)
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolvemos todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Precondiciones: la transacción se abortó sin efectos.
            AppError::StockInsuficiente { .. } => (StatusCode::CONFLICT, "stock insuficiente"),
            AppError::CapitalInsuficiente { .. } => (StatusCode::CONFLICT, "capital insuficiente"),
            AppError::YaLiquidada => (StatusCode::CONFLICT, "la operación ya está liquidada"),
            AppError::AbonoExcedente => (StatusCode::CONFLICT, "el abono excede el monto restante"),

            AppError::ClienteNoResuelto => (StatusCode::UNPROCESSABLE_ENTITY, "cliente no resuelto"),
            AppError::DistribuidorNoResuelto => {
                (StatusCode::UNPROCESSABLE_ENTITY, "distribuidor no resuelto")
            }
            AppError::CantidadInvalida => (StatusCode::UNPROCESSABLE_ENTITY, "cantidad inválida"),
            AppError::PrecioInvalido => (StatusCode::UNPROCESSABLE_ENTITY, "precio inválido"),
            AppError::MontoInvalido => (StatusCode::UNPROCESSABLE_ENTITY, "monto inválido"),
            AppError::BancoOrigenRequerido => {
                (StatusCode::UNPROCESSABLE_ENTITY, "banco de origen requerido")
            }
            AppError::TransferenciaInvalida => {
                (StatusCode::UNPROCESSABLE_ENTITY, "transferencia inválida")
            }

            AppError::NoEncontrado | AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "registro no encontrado")
            }

            // Infraestructura: nada quedó escrito, el llamador puede
            // reintentar con la misma entrada.
            ref e => {
                tracing::error!("Error de infraestructura: {}", e);
                let body = Json(json!({
                    "error": "Error de infraestructura. Reintente la operación.",
                    "retryable": true,
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
