pub mod ui;

mod actions;
mod component;
mod dialog;
mod error_handler;
mod feed_view;
mod list;
mod main_view;
mod player_view;
mod session_provider;
mod status_label;
