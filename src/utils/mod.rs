pub mod paths;
pub mod terminal;

pub use paths::{collect_export_files, expand_tilde, format_path_with_tilde, validate_file_size};
pub use terminal::{sanitize_for_terminal, strip_ansi_codes};
