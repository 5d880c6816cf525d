//! Bookchat is a full-screen terminal chat client for asking questions about
//! the *Physical AI & Humanoid Robotics* book.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript state, the pure state transitions, query
//!   dispatch, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`api`] defines the wire payloads and HTTP client used to talk to a
//!   real retrieval backend.
//! - [`utils`] holds small shared helpers for wrapping, input sanitization,
//!   URL handling, and transcript logging.
//!
//! The binary entrypoint (`src/main.rs`) parses the CLI, selects a
//! [`core::query::QueryService`] implementation, and hands control to
//! [`ui::chat_loop::run_chat`].

pub mod api;
pub mod core;
pub mod ui;
pub mod utils;
