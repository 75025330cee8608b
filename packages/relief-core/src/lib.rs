// Relief Matching & Assignment Engine - Core
//
// This crate ranks verified volunteers against open help requests and turns a
// chosen candidate into an assignment while keeping the request's fulfillment
// count consistent. Persistence lives behind sqlx models; the scoring core is pure.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
