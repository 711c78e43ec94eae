//! Domain records exchanged with the inventory API.

pub mod deleted_item;
pub mod history;
pub mod item;
pub mod movement;
pub mod observation;
pub mod shed;
pub mod types;
pub mod user;
