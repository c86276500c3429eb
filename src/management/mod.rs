mod cache;
mod resolver;

pub use cache::CACHE_VERSION;
pub use cache::CacheError;
pub use cache::CacheManager;
pub use resolver::MetadataResolver;
pub use resolver::find_matching_result;
pub use resolver::release_query;
