pub mod factories;
pub mod health;
