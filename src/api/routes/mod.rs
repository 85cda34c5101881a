pub mod answers;
pub mod crawls;
pub mod health;
