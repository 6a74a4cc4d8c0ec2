//! # surikata-core
//!
//! Domain vocabulary for the Surikata live Q&A backend.
//!
//! - **Branded IDs**: [`ids::QuestionId`], [`ids::SpeakerId`], [`ids::ConnectionId`],
//!   and the opaque [`ids::EventToken`] / [`ids::SessionToken`] pair
//! - **Scope**: [`scope::Scope`], the (event, session) key used for live fan-out
//! - **Domain model**: [`question::Question`], [`event::Event`], [`event::Room`],
//!   [`event::Session`], [`event::Speaker`]
//! - **Tokens**: [`tokens::generate_token`] and [`tokens::fill_tokens`]
//! - **Validation**: [`validator::validate_event`] schedule consistency checks
//! - **Errors**: [`errors::ValidationError`] via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other surikata crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod event;
pub mod ids;
pub mod logging;
pub mod question;
pub mod scope;
pub mod tokens;
pub mod validator;
