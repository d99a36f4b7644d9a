#![forbid(unsafe_code)]

//! Terminal front end for the cardform credit-card entry form.
//!
//! - [`event`]: input events mapped from crossterm
//! - [`terminal_session`]: RAII raw-mode/alternate-screen guard
//! - [`frame`] and [`style`]: the cell grid views draw into
//! - [`input`]: single-line text fields, masked or plain
//! - [`runtime`]: the model/update/view loop
//! - [`app`]: the card form screen
//! - [`cli`] and [`logging`]: binary configuration

pub mod app;
pub mod cli;
pub mod event;
pub mod frame;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod style;
pub mod terminal_session;

pub use app::CardFormApp;
pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use frame::Frame;
pub use runtime::{Cmd, Model, Program, ProgramConfig};
