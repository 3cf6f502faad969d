//! opsdash: a terminal operations dashboard. It polls a service's telemetry
//! endpoint, keeps a bounded history, and renders cards and charts. Keys trigger
//! demo load against the same service.

pub mod actions;
pub mod api;
pub mod app;
pub mod cards;
pub mod charts;
pub mod cli;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod logging;
pub mod notify;
pub mod profiles;
pub mod state;
pub mod types;
pub mod ui;
