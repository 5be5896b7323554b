mod update_settings;

pub use update_settings::update_settings;
