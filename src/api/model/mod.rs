pub mod auth;
pub mod common;
pub mod company;
pub mod course;
pub mod enrollment;
pub mod file;
pub mod instructor;
pub mod staff;
pub mod student;
pub mod user;
pub mod visitor;
