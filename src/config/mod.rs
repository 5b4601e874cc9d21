mod settings;

pub use settings::{
    ConverterConfig, DataConfig, LogFormat, LoggingConfig, ServerConfig, Settings, TemplatesConfig,
};
