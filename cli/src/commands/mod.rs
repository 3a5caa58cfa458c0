//! CLI command implementations

pub mod check;
pub mod extract;
pub mod schema;
pub mod tools;

pub use check::check_command;
pub use extract::extract_command;
pub use schema::schema_command;
pub use tools::tools_command;
