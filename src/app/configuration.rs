use color_eyre::eyre::eyre;
use config::{Config, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub(crate) struct Configuration {
    pub(crate) bands: BandsConfiguration,
    pub(crate) dos: DosConfiguration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BandsConfiguration {
    pub(crate) divisions: usize,
    pub(crate) path: Vec<PathVertex>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PathVertex {
    pub(crate) label: String,
    pub(crate) point: [f64; 3],
}

#[derive(Debug, Deserialize)]
pub(crate) struct DosConfiguration {
    pub(crate) grid: [usize; 3],
    pub(crate) minimum_energy: f64,
    pub(crate) maximum_energy: f64,
    pub(crate) number_of_energy_points: usize,
    pub(crate) broadening: f64,
}

impl Configuration {
    pub(crate) fn build() -> color_eyre::Result<Self> {
        // If I am running it here we should automatically be more debuggy
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // The default settings for the calculation which we use in the general case
            .add_source(File::with_name(".config/default"))
            // The override settings which may be set by the user, optional
            .add_source(File::with_name(&format!(".config/{}", run_mode)).required(false))
            .build()?;

        s.try_deserialize()
            .map_err(|e| eyre!(format!("Failed to deserialize the config file: {:?}", e)))
    }
}

#[cfg(test)]
mod test {
    use super::Configuration;

    #[test]
    fn the_default_configuration_on_disk_parses() {
        let config = Configuration::build().unwrap();
        assert!(config.bands.divisions > 0);
        assert!(config.bands.path.len() >= 2);
        assert!(config.dos.number_of_energy_points > 1);
        assert!(config.dos.broadening > 0.);
    }
}
