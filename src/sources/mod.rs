pub mod apod;

pub use apod::ApodSource;
