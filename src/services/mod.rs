// Service exports
pub mod appwrite;
pub mod auth;
pub mod cache;
pub mod locks;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use auth::{AuthError, Authenticator, Claims};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use locks::DocumentLocks;
