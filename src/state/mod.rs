pub mod action;
pub mod binding;
pub mod config;
pub mod data_model;
pub mod element;
pub mod evaluator;
pub mod expander;
pub mod list_state;
pub mod pagination;
