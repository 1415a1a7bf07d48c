mod config_override;

pub use config_override::CliConfigOverrides;
