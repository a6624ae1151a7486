//! Terminal front end: configuration, logging, effect execution and the
//! line-command loop around the core `update` function.
mod app;
mod config;
mod effects;
mod history;
mod logging;
mod persistence;
mod ui;

pub(crate) use app::run_app;
