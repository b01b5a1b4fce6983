mod handler;
mod model;

pub use handler::search;
