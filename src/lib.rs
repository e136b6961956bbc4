//! InteriorRec Library
//!
//! Room layout and furniture interaction model: room geometry and the
//! grid/world coordinate mapping, the active design with its selection and
//! drag state machine, like/dislike feedback, item replacement and
//! epoch-tagged generation of alternative designs.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod session;

#[cfg(feature = "web")]
pub mod web;
