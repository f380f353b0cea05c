mod model;
pub mod parse;

pub use model::{AssistantConfig, ExportConfig, GatewayConfig, GuidiaConfig, ServerConfig};
pub use parse::parse_config_content;
