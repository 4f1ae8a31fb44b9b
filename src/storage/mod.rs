pub mod json_store;
pub mod csv_export;

pub use csv_export::write_scan_csv;
pub use json_store::{read_scan_json, write_json, write_scan_json};
