pub mod feedback;
pub mod portfolio;
pub mod user;
