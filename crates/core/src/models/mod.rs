pub mod cache;
pub mod chart;
pub mod event;
pub mod forecast;
pub mod reference;
pub mod settings;
