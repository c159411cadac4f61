pub mod build_spec;
pub mod discovery;
pub mod error;
pub mod external;
pub mod output;
pub mod plugin;
pub mod validation;

// Re-export main types
pub use build_spec::BuildSpec;
pub use error::*;
pub use external::{is_bare_specifier, package_root};
pub use output::{ModuleFormat, OutputTarget, UnknownFormat};
pub use plugin::PluginRef;

// Re-export discovery and validation
pub use discovery::{CONFIG_FILE_NAMES, ConfigDiscovery, load_from_path};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator};
