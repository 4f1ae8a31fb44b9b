pub mod panic;
pub mod urls;

pub use panic::panic_message;
pub use urls::{dedupe_preserve_order, normalize, resolve, site_root, strip_fragment, variants};
