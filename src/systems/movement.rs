use rayon::prelude::*;

use crate::components::particle::Particle;
use crate::globals::*;
use crate::resources::boundary::BoundaryMode;
use crate::resources::grid::torus_axis;
use crate::resources::rules::RuleMatrix;
use crate::resources::simulation::SimulationConfig;

/// Impulsion de clic : force radiale depuis un point, qui s'éteint
/// linéairement sur une durée en ticks. Magnitude négative = attraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impulse {
    pub x: f64,
    pub y: f64,
    pulse: f64,
    remaining_ticks: u32,
}

impl Impulse {
    pub fn new(x: f64, y: f64, magnitude: f64, duration_ticks: u32) -> Self {
        Self {
            x,
            y,
            pulse: magnitude,
            remaining_ticks: duration_ticks,
        }
    }

    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ticks > 0 && self.pulse != 0.0
    }

    /// Un pas de décroissance vers zéro
    pub fn decay(&mut self) {
        if self.remaining_ticks == 0 {
            self.pulse = 0.0;
            return;
        }
        self.pulse -= self.pulse / f64::from(self.remaining_ticks);
        self.remaining_ticks -= 1;
    }
}

/// Paramètres physiques figés pour un tick
#[derive(Clone, Copy, Debug)]
struct StepParameters {
    width: f64,
    height: f64,
    mode: BoundaryMode,
    time_scale: f64,
    viscosity: f64,
    gravity: f64,
    wall_repel: f64,
    wall_strength: f64,
}

impl From<&SimulationConfig> for StepParameters {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            width: config.grid.width,
            height: config.grid.height,
            mode: config.boundary_mode(),
            time_scale: config.time_scale,
            viscosity: config.viscosity,
            gravity: config.gravity,
            wall_repel: config.wall_repel,
            wall_strength: config.wall_strength,
        }
    }
}

/// Avance la simulation d'un pas et retourne l'activité (vitesse absolue
/// moyenne par axe).
///
/// Phase 1 : nouvelles vitesses pour toutes les particules, lues sur les
/// positions du tick précédent. Phase 2 : intégration des positions et bords.
/// La phase 2 ne commence qu'une fois la phase 1 terminée pour toutes.
pub fn step(
    particles: &mut [Particle],
    rules: &RuleMatrix,
    config: &SimulationConfig,
    impulse: Option<&Impulse>,
    velocities: &mut Vec<(f64, f64)>,
) -> f64 {
    let params = StepParameters::from(config);
    let impulse = impulse.filter(|i| i.is_active());

    calculate_velocities(particles, rules, &params, impulse, velocities);
    let activity = mean_abs_velocity(velocities);
    apply_movement(particles, velocities, config);
    activity
}

/// Phase 1, parallélisée par particule. Chaque somme reste séquentielle dans
/// l'ordre des indices : le résultat est identique à une exécution simple.
fn calculate_velocities(
    particles: &[Particle],
    rules: &RuleMatrix,
    params: &StepParameters,
    impulse: Option<&Impulse>,
    velocities: &mut Vec<(f64, f64)>,
) {
    particles
        .par_iter()
        .enumerate()
        .map(|(index, a)| {
            let (mut fx, mut fy) = pair_forces(index, a, particles, rules, params);

            if let Some(impulse) = impulse {
                let (px, py) = impulse_force(a, impulse, params.time_scale);
                fx += px;
                fy += py;
            }

            if !params.mode.is_toroidal() && params.wall_repel > 0.0 {
                let (wx, wy) = wall_force(a, params);
                fx += wx;
                fy += wy;
            }

            fy += params.gravity;

            let damping = 1.0 - params.viscosity;
            (
                a.vx * damping + fx * params.time_scale,
                a.vy * damping + fy * params.time_scale,
            )
        })
        .collect_into_vec(velocities);
}

/// Somme des forces de règles exercées sur `a` par toutes les autres particules
fn pair_forces(
    index: usize,
    a: &Particle,
    particles: &[Particle],
    rules: &RuleMatrix,
    params: &StepParameters,
) -> (f64, f64) {
    let source = a.color_index();
    let r2 = rules.radius_squared(source);
    let row = rules.row(source);
    let (mut fx, mut fy) = (0.0, 0.0);

    for (other, b) in particles.iter().enumerate() {
        if other == index {
            continue;
        }
        let mut dx = b.x - a.x;
        let mut dy = b.y - a.y;
        if params.mode.is_toroidal() {
            dx = torus_axis(dx, params.width);
            dy = torus_axis(dy, params.height);
        }
        if dx == 0.0 && dy == 0.0 {
            continue;
        }
        let d2 = dx * dx + dy * dy;
        if d2 >= r2 {
            continue;
        }
        // Loi en 1/d, non bornée près de zéro
        let force = row[b.color_index()] / d2.sqrt();
        fx += force * dx;
        fy += force * dy;
    }
    (fx, fy)
}

fn impulse_force(a: &Particle, impulse: &Impulse, time_scale: f64) -> (f64, f64) {
    let dx = a.x - impulse.x;
    let dy = a.y - impulse.y;
    let d2 = dx * dx + dy * dy;
    if d2 == 0.0 {
        return (0.0, 0.0);
    }
    let force = PULSE_STRENGTH * impulse.pulse() / (d2 * time_scale);
    (force * dx, force * dy)
}

/// Poussée linéaire vers l'intérieur, proportionnelle à la pénétration
/// dans la bande de répulsion de chaque mur
fn wall_force(a: &Particle, params: &StepParameters) -> (f64, f64) {
    let repel = params.wall_repel;
    let strength = params.wall_strength;
    let (mut fx, mut fy) = (0.0, 0.0);
    if a.x < repel {
        fx += (repel - a.x) * strength;
    }
    if a.y < repel {
        fy += (repel - a.y) * strength;
    }
    if a.x > params.width - repel {
        fx += (params.width - repel - a.x) * strength;
    }
    if a.y > params.height - repel {
        fy += (params.height - repel - a.y) * strength;
    }
    (fx, fy)
}

fn mean_abs_velocity(velocities: &[(f64, f64)]) -> f64 {
    if velocities.is_empty() {
        return 0.0;
    }
    let total: f64 = velocities.iter().map(|(vx, vy)| vx.abs() + vy.abs()).sum();
    total / (2 * velocities.len()) as f64
}

/// Phase 2 : applique la vitesse (déjà mise à l'échelle) puis le mode de bord
fn apply_movement(particles: &mut [Particle], velocities: &[(f64, f64)], config: &SimulationConfig) {
    let mode = config.boundary_mode();
    particles
        .par_iter_mut()
        .zip(velocities.par_iter())
        .for_each(|(particle, &(vx, vy))| {
            particle.vx = vx;
            particle.vy = vy;
            particle.x += vx;
            particle.y += vy;
            config.grid.apply_bounds(
                &mut particle.x,
                &mut particle.y,
                &mut particle.vx,
                &mut particle.vy,
                mode,
            );
        });
}
