pub mod window_finder;
