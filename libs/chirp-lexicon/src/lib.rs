#[macro_use]
extern crate serde_derive;

pub mod actor;
pub mod feed;
pub mod notification;
