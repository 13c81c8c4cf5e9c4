pub mod client;
pub mod inventory;
