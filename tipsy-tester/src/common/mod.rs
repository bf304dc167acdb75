pub mod scenario;
pub mod util;

pub use util::{digest_hex, report_timestamp, split_csv};
