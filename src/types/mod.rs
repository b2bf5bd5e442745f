pub mod price;
pub mod price_entry;
pub mod price_table;
pub mod window;
