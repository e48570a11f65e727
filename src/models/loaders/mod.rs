pub mod file_loader;
pub mod parse;
pub mod presets;

pub use file_loader::{load_all_quiz_files, load_quiz_file};
pub use parse::{parse_json, parse_json_bytes, parse_toml, DocumentFormat};
pub use presets::{load_preset, preset_names, preset_source};
