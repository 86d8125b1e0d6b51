//! A small keyboard- and mouse-driven calculator.
//!
//! [`calc_engine`] parses and evaluates the arithmetic grammar without any
//! generic code evaluation, [`session`] holds the expression, last answer and
//! history, and the front ends (`tui_mode`, `line_mode`) render the session
//! and feed it [`session::Command`]s.

pub mod calc_engine;
pub mod config;
pub mod logging;
pub mod session;

#[cfg(feature = "tui")]
pub mod render_help;
#[cfg(feature = "tui")]
pub mod tui_mode;

#[cfg(feature = "line")]
pub mod line_mode;
