//! Backend adapter implementations of the task-service and remote API ports.

pub mod jira;
pub mod memory;
pub mod trello;
