// src/common/texto.rs

use uuid::Uuid;

/// Regla de normalización para buscar partes por nombre: recorte de
/// espacios y minúsculas Unicode. La búsqueda y el alta usan siempre
/// esta misma función; la columna `nombre_normalizado` es única.
pub fn normalizar_nombre(nombre: &str) -> String {
    nombre.trim().to_lowercase()
}

/// Prefijo corto de un id para conceptos legibles ("Venta #a1b2c3d4").
pub fn id_corto(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorta_y_pasa_a_minusculas() {
        assert_eq!(normalizar_nombre("  Juan Pérez  "), "juan pérez");
    }

    #[test]
    fn nombres_equivalentes_colisionan() {
        assert_eq!(normalizar_nombre("ACME Corp"), normalizar_nombre("acme corp "));
    }

    #[test]
    fn id_corto_toma_ocho_caracteres() {
        let id = Uuid::new_v4();
        assert_eq!(id_corto(&id).len(), 8);
        assert!(id.to_string().starts_with(&id_corto(&id)));
    }
}
