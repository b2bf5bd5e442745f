pub mod daily_trigger;
