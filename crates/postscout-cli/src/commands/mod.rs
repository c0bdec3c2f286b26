pub mod find;
pub mod login;
