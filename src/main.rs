use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use particle_life::resources::simulation::{parse_seed_fragment, seed_fragment};
use particle_life::{ConfigError, ParticleLifePlugin, Preset, SimulationConfig, Universe};

const DEFAULT_TICKS: u64 = 600;

/// Simulation particle life sans fenêtre
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graine partageable (`#1234` ou `1234`), tirée au hasard si absente
    #[arg(value_parser = parse_seed_fragment)]
    seed: Option<u64>,

    /// Nombre de ticks avant l'arrêt
    #[arg(short, long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,

    /// Tire aussi couleurs, nombre d'atomes, viscosité et murs depuis la graine
    #[arg(long)]
    random_setup: bool,

    /// Dossier où sauvegarder un preset à la fin
    #[arg(long, value_name = "DOSSIER")]
    save_preset: Option<PathBuf>,
}

#[derive(Resource, Debug, Clone)]
struct RunOptions {
    ticks: u64,
    save_dir: Option<PathBuf>,
}

fn build_config(args: &Args, seed: u64) -> Result<SimulationConfig, ConfigError> {
    let defaults = SimulationConfig::default();
    if args.random_setup {
        SimulationConfig::randomized(seed, defaults.grid.width, defaults.grid.height)
    } else {
        Ok(SimulationConfig { seed, ..defaults })
    }
}

fn main() -> AppExit {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| u64::from(rand::random::<u32>()));

    let config = match build_config(&args, seed) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration refusée pour la graine {}: {}", seed_fragment(seed), e);
            return AppExit::error();
        }
    };
    let options = RunOptions {
        ticks: args.ticks,
        save_dir: args.save_preset,
    };

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
            LogPlugin::default(),
        ))
        .add_plugins(ParticleLifePlugin::with_config(config))
        .insert_resource(options)
        .add_systems(Update, (stop_after_ticks, exit_without_universe))
        .run()
}

fn stop_after_ticks(
    universe: Option<Res<Universe>>,
    options: Res<RunOptions>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    let Some(universe) = universe else {
        return;
    };
    if universe.tick_count() < options.ticks {
        return;
    }

    info!(
        "Fin après {} ticks | graine {} | activité {:.3} | clusters actifs {}",
        universe.tick_count(),
        seed_fragment(universe.seed()),
        universe.activity(),
        universe.clusters().iter().filter(|c| c.is_active()).count()
    );

    if let Some(dir) = &options.save_dir {
        let preset = Preset::from_universe(&universe, seed_fragment(universe.seed()), None);
        info!("{}", preset.summary());
        if let Err(e) = preset.save_to_dir(dir) {
            error!("Erreur lors de la sauvegarde du preset: {}", e);
            app_exit_events.write(AppExit::error());
            return;
        }
    }

    app_exit_events.write(AppExit::Success);
}

/// La configuration a été refusée au démarrage : rien à simuler
fn exit_without_universe(universe: Option<Res<Universe>>, mut app_exit_events: EventWriter<AppExit>) {
    if universe.is_none() {
        app_exit_events.write(AppExit::error());
    }
}
