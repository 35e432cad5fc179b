/// Parsed selector expressions kept by the default evaluator before the cache is reset
pub const SELECTOR_CACHE_CAPACITY: usize = 1024;
/// Declaration written in front of a serialized document node
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
/// Descriptor files with this extension are read as TOML, everything else as YAML
pub const TOML_EXTENSION: &str = "toml";
