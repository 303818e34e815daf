pub mod user;

pub use user::{CreateUser, NewUser, User};
