/// This module governs the high-level implementation of the command line application
mod configuration;
mod telemetry;
pub(crate) use configuration::Configuration;

use crate::{
    brillouin::{BandPath, MonkhorstPack},
    hamiltonian::TightBinding,
    model::ModelFile,
    phase::Gauge,
};
use clap::{ArgEnum, Parser};
use color_eyre::eyre::eyre;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct App {
    file_path: Option<PathBuf>,
    #[clap(arg_enum, short, long)]
    log_level: LogLevel,
    #[clap(arg_enum, short, long)]
    calculation: Calculation,
    #[clap(arg_enum, short, long, default_value = "lattice")]
    gauge: GaugeChoice,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub(crate) enum LogLevel {
    Trace,
    Info,
    Debug,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Error => "error",
        };
        write!(f, "{}", level)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
pub(crate) enum Calculation {
    Bands,
    Dos,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ArgEnum)]
enum GaugeChoice {
    Lattice,
    Orbital,
}

impl From<GaugeChoice> for Gauge {
    fn from(choice: GaugeChoice) -> Self {
        match choice {
            GaugeChoice::Lattice => Gauge::Lattice,
            GaugeChoice::Orbital => Gauge::Orbital,
        }
    }
}

/// Parse the command line, read the model and run the requested calculation
pub fn run() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = App::parse();

    let results_directory = std::path::Path::new("results");
    std::fs::create_dir_all(results_directory)?;
    let (subscriber, _guard) = telemetry::get_subscriber(cli.log_level, results_directory);
    telemetry::init_subscriber(subscriber);

    let config = Configuration::build()?;
    let path = cli
        .file_path
        .ok_or(eyre!("A model file path needs to be passed."))?;

    let model_file = ModelFile::build(path)?;
    let model = model_file.assemble()?;
    tracing::info!(
        "assembled a model with {} orbitals over {} images",
        model.num_orbitals(),
        model.lattice().num_supercells()
    );
    if !model.is_hermitian(1e-10) {
        tracing::warn!("the model Hamiltonian is not Hermitian under image conjugation");
    }

    let gauge = cli.gauge.into();
    match cli.calculation {
        Calculation::Bands => run_bands(&model, &config, gauge),
        Calculation::Dos => run_dos(&model, &config, gauge),
    }
}

fn run_bands(
    model: &TightBinding,
    config: &Configuration,
    gauge: Gauge,
) -> color_eyre::Result<()> {
    let vertices: Vec<(&str, [f64; 3])> = config
        .bands
        .path
        .iter()
        .map(|vertex| (vertex.label.as_str(), vertex.point))
        .collect();
    let path = BandPath::new(model.lattice(), &vertices, config.bands.divisions)?;
    tracing::info!("solving {} k-points along the path", path.num_points());

    let bands = model.band_structure(path.points(), gauge)?;

    let mut file = std::fs::File::create("results/bands.dat")?;
    for (label, distance) in path
        .labels()
        .iter()
        .map(|(index, label)| (label, path.distances()[*index]))
    {
        writeln!(file, "# {} {:.8}", label, distance)?;
    }
    for (index, distance) in path.distances().iter().enumerate() {
        write!(file, "{:.8}", distance)?;
        for energy in bands.row(index) {
            write!(file, " {:.8}", energy)?;
        }
        writeln!(file)?;
    }
    tracing::info!("wrote results/bands.dat");
    Ok(())
}

fn run_dos(model: &TightBinding, config: &Configuration, gauge: Gauge) -> color_eyre::Result<()> {
    let grid = MonkhorstPack::new(config.dos.grid)?;
    tracing::info!("sampling the zone with {} k-points", grid.num_points());

    let n_energies = config.dos.number_of_energy_points;
    if n_energies < 2 {
        return Err(eyre!("The energy grid needs at least two points."));
    }
    let step = (config.dos.maximum_energy - config.dos.minimum_energy) / (n_energies - 1) as f64;
    let energies: Vec<f64> = (0..n_energies)
        .map(|index| config.dos.minimum_energy + index as f64 * step)
        .collect();

    let dos = model.density_of_states(&grid, &energies, config.dos.broadening, gauge)?;

    let mut file = std::fs::File::create("results/dos.dat")?;
    for (energy, density) in energies.iter().zip(dos.iter()) {
        writeln!(file, "{:.8} {:.8}", energy, density)?;
    }
    tracing::info!("wrote results/dos.dat");
    Ok(())
}
