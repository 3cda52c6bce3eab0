pub mod experiments;
pub mod health;
