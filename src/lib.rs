pub mod ai;
pub mod autosave;
pub mod config;
pub mod session;
pub mod storage;
pub mod studio;
pub mod styles;
pub mod timer;
pub mod types;

#[cfg(feature = "gui")]
pub mod theme;
#[cfg(feature = "gui")]
pub mod ui;
#[cfg(feature = "gui")]
pub mod views;
