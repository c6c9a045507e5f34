pub mod app;
pub mod async_task;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod main_lib;
pub mod model;
pub mod navigation;
pub mod screenshot;
pub mod service;
pub mod session;
pub mod theme;
pub mod ui;
