pub mod constants;
pub mod fs_utils;
pub mod url_utils;

pub use constants::*;
pub use fs_utils::write_file_ensuring_dir;
pub use url_utils::{file_name_of, is_valid_url, normalize_stylesheet_href};
