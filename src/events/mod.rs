mod observers;
mod pointer;

pub use observers::{wire_observers, Observers};
pub use pointer::{wire_pointer_handlers, PointerListeners};
