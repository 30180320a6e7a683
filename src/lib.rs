pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod io;
pub mod logger;
pub mod ops;
pub mod project;
pub mod viewer;
