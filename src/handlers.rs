pub mod applications;
pub mod auth;
pub mod employers;
pub mod health;
pub mod jobs;
pub mod students;
pub mod teams;
pub mod tracker;
pub mod users;
