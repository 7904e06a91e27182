//! SeaORM entity modules for the work-study job board.
//!
//! `user`, `job` and `application` form the core graph (employers own jobs,
//! students own applications, applications point at jobs). `team` and
//! `ws_tracker` are flat administrative registries. `session` backs the
//! server-side login sessions.

pub mod application;
pub mod job;
pub mod session;
pub mod team;
pub mod user;
pub mod ws_tracker;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::application::Entity as Application;
    pub use super::job::Entity as Job;
    pub use super::session::Entity as Session;
    pub use super::team::Entity as Team;
    pub use super::user::Entity as User;
    pub use super::ws_tracker::Entity as WsTracker;
}
