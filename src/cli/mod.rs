//! Terminal front end: table rendering, the investment form and the REPL

pub mod modal;
pub mod repl;
pub mod setup;
pub mod ui;
pub mod view;
