pub mod outlets;
pub mod scenario;
