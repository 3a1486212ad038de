pub mod app;
pub mod commands;
pub mod config;
pub mod controller;
pub mod engine;
pub mod input;
pub mod logging;
pub mod popup;
pub mod state;
pub mod style;
pub mod view;

pub use app::Browser;
pub use commands::{CommandTable, CommandTableError};
pub use config::Config;
pub use controller::{ControllerEvent, ModalController};
pub use popup::{PopupContainer, PopupWidget};
pub use state::Mode;
