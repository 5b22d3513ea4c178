pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{InteractionEvent, StateTransition};
pub use machine::InteractionMachine;
pub use model::InteractionState;
