//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_key_value_store;
mod postgres_employee_repository;
mod postgres_role_repository;
mod postgres_user_repository;
mod redis_key_value_store;
mod system_clock;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
pub use postgres_employee_repository::PostgresEmployeeRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_key_value_store::RedisKeyValueStore;
pub use system_clock::SystemClock;
