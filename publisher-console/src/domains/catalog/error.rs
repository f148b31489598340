use crate::infra::error::ApiError;

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Why a controller action did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("No dialog is open")]
    DialogClosed,

    #[error("Editing without a selected record")]
    NothingSelected,

    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,

    #[error("A delete is already in flight")]
    DeleteInFlight,

    #[error("A save is already in flight")]
    SaveInFlight,
}
