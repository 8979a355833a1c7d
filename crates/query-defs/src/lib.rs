pub mod file_item;
pub mod loader;
pub mod local;
pub mod metadata;
pub mod query_type;

pub use file_item::FileItem;
pub use loader::{Loader, LoaderError};
pub use local::LocalLoader;
pub use metadata::SourceMetadata;
pub use query_type::{QueryType, classify};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
