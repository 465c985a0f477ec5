pub mod database;
#[cfg(test)]
pub mod memory;
pub mod schema;
pub mod tasks;
