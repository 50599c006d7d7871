//! Configuration loaded from `.mqttcred.toml`.

pub mod settings;

pub use settings::Settings;
