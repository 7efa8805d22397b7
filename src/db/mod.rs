pub mod file;
pub mod redis;
pub mod store;

pub use file::FilePreferenceStore;
pub use self::redis::{create_redis_client, RedisPreferenceStore};
pub use store::{MemoryPreferenceStore, PreferenceKey, PreferenceStore};
