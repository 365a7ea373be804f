use parking_lot::Mutex;
use std::sync::Arc;

/// État mutable partagé entre handlers (verrou jamais tenu à travers un `.await`)
pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Exécute `f` sous le verrou ; tout ce que `f` lit ou modifie ailleurs
/// (tracker compris) est vu de façon cohérente avec la valeur partagée.
pub fn with_locked<T, R>(state: &Shared<T>, f: impl FnOnce(&mut T) -> R) -> R {
    let mut guard = state.lock();
    f(&mut guard)
}
