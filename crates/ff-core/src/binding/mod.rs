//! Input binding domain models.
mod binding;
mod state;

pub use binding::InputBinding;
pub use state::ProcessingState;
