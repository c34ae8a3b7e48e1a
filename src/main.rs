use hex_tile::{application, settings::Settings};

fn main() {
    // Setup logging before the settings are read so bad values are reported
    env_logger::init();

    // Run the application
    pollster::block_on(application::run(Settings::from_env()));
}
