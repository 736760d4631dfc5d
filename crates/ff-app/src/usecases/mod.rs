//! One reactive use case per system fact: a selection changed, an
//! operation was requested, a result (or its timeout) arrived, a reset
//! was asked for.

mod handle_result;
mod handle_selection;
mod request_operation;
mod reset_input;

pub use handle_result::HandleProcessingResult;
pub use handle_selection::HandleSelectionChanged;
pub use request_operation::RequestOperation;
pub use reset_input::ResetInput;
