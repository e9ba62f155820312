pub mod actions;
pub mod app;
pub mod factory;
pub mod list_view;
pub mod toolbar;
