use crate::callout::CalloutError;
use crate::editor::EditorError;
use crate::render::export::ExportError;
use crate::state::StateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Callout(#[from] CalloutError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
