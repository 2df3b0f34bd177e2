// src/common/notify.rs

use tokio::sync::broadcast;

/// Vista que quedó obsoleta tras un commit exitoso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VistaInvalidada {
    Ventas,
    Compras,
    Bancos,
}

// ---
// Señal "vistas invalidadas"
// ---
// Se dispara exactamente una vez por commit exitoso. Las capas de
// presentación se suscriben; el núcleo nunca espera por ellas ni falla
// si no hay nadie escuchando.
#[derive(Clone)]
pub struct NotificadorVistas {
    tx: broadcast::Sender<VistaInvalidada>,
}

impl NotificadorVistas {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn suscribir(&self) -> broadcast::Receiver<VistaInvalidada> {
        self.tx.subscribe()
    }

    /// Disparo y olvido: el `Err` de un canal sin receptores se ignora.
    pub fn notificar(&self, vista: VistaInvalidada) {
        let _ = self.tx.send(vista);
    }
}

impl Default for NotificadorVistas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notificar_sin_suscriptores_no_falla() {
        let notificador = NotificadorVistas::new();
        notificador.notificar(VistaInvalidada::Ventas);
    }

    #[tokio::test]
    async fn suscriptor_recibe_la_vista() {
        let notificador = NotificadorVistas::new();
        let mut rx = notificador.suscribir();
        notificador.notificar(VistaInvalidada::Bancos);
        assert_eq!(rx.recv().await.unwrap(), VistaInvalidada::Bancos);
    }
}
