//! Signal d'annulation d'une requête d'itinéraire.
//!
//! Paire handle/signal sur un `watch` : le tracker garde le handle, la requête
//! en vol écoute le signal.

use tokio::sync::watch;

pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace : ne dépend pas de la présence d'un récepteur
        self.tx.send_replace(true);
    }
}

impl CancelSignal {
    /// Signal qui ne se déclenche jamais.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // le sender est lâché : changed() échoue et cancelled() reste en attente
        drop(tx);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Se résout quand l'annulation est demandée. Reste en attente si le
    /// handle est lâché sans annuler.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
