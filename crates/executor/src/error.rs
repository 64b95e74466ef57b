use api_client::ApiError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
