//! Public surface for the `apidoc-console` crate.
//!
//! Wires the pure documentation logic of `apidoc` to caches, counter stores,
//! and the gateway collaborators. Construct an [`ApiConsole`] and call its
//! query methods; no subscriber or runtime is set up here.
//!
//! # Operations
//!
//! | Method | Module |
//! |--------|--------|
//! | [`ApiConsole::query_tree_menu`] | [`tree`] |
//! | [`ApiConsole::get_controllers`] | [`docs`] |
//! | [`ApiConsole::query_path_detail`] | [`docs`] |
//! | [`ApiConsole::query_instances_and_api_count`] | [`docs`] |
//! | [`ApiConsole::query_service_invoke`] | [`invocation`] |
//! | [`ApiConsole::query_api_invoke`] | [`invocation`] |

pub mod collaborators;
pub mod config;
pub mod console;
pub mod docs;
pub mod error;
pub mod invocation;
pub mod storage;
pub mod tree;

pub use collaborators::{RouteRegistry, SchemaSource, ServiceRegistry, SourceError, StaticCatalog};
pub use config::{open_stores, ConsoleConfig, Stores};
pub use console::ApiConsole;
pub use error::ConsoleError;
pub use storage::{memory::MemoryStorage, sqlite::SqliteStorage, CacheStore, CounterStore, StorageError};
