pub mod activation;
pub mod activation_scheduler;
pub mod slot_label;
pub mod time_resolver;
