pub mod filters;
pub mod list_factory;
pub mod service;
