pub mod errors;

pub use errors::{ApiError, ClientError, RefreshError, StorageError};
