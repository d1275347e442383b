//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod helpers;
mod todo;
mod todo_list;
mod user;


pub use connection::SqliteDatabase;
pub use todo::SqliteTodoRepository;
pub use todo_list::SqliteTodoListRepository;
pub use user::SqliteUserRepository;
