use bytemuck::{Pod, Zeroable};

use crate::globals::FIELDS_PER_PARTICLE;
use crate::resources::grid::GridParameters;
use crate::resources::particle_types::ColorIndex;
use crate::resources::random::SeededRandom;

/// Particule telle que vue par le moteur de rendu : 5 flottants contigus
/// (x, y, vx, vy, couleur), lisibles sans copie.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    color: f64,
}

const _: () = assert!(std::mem::size_of::<Particle>() == FIELDS_PER_PARTICLE * std::mem::size_of::<f64>());

impl Particle {
    pub fn new(x: f64, y: f64, color: ColorIndex) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            color: color.0 as f64,
        }
    }

    pub fn color(&self) -> ColorIndex {
        ColorIndex(self.color as usize)
    }

    pub fn color_index(&self) -> usize {
        self.color as usize
    }
}

/// Ensemble des particules. L'identité d'une particule est son indice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Place `atoms_per_color` particules par couleur, couleur par couleur,
    /// uniformément dans le monde et à vitesse nulle
    pub fn spawn(
        color_count: usize,
        atoms_per_color: usize,
        grid: &GridParameters,
        rng: &mut SeededRandom,
    ) -> Self {
        let mut particles = Vec::with_capacity(color_count * atoms_per_color);
        for color in 0..color_count {
            for _ in 0..atoms_per_color {
                let x = rng.next() * grid.width;
                let y = rng.next() * grid.height;
                particles.push(Particle::new(x, y, ColorIndex(color)));
            }
        }
        Self { particles }
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Vue plate `[x, y, vx, vy, couleur]` par particule
    pub fn as_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_places_particles_inside_the_world() {
        let grid = GridParameters::new(300.0, 200.0).unwrap();
        let set = ParticleSet::spawn(3, 50, &grid, &mut SeededRandom::new(1));
        assert_eq!(set.len(), 150);
        for p in set.iter() {
            assert!(grid.is_in_bounds(p.x, p.y));
            assert_eq!((p.vx, p.vy), (0.0, 0.0));
        }
    }

    #[test]
    fn spawn_is_color_major() {
        let grid = GridParameters::default();
        let set = ParticleSet::spawn(3, 4, &grid, &mut SeededRandom::new(2));
        let colors: Vec<usize> = set.iter().map(Particle::color_index).collect();
        assert_eq!(colors, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn flat_view_has_five_fields_per_particle() {
        let mut p = Particle::new(1.0, 2.0, ColorIndex(3));
        p.vx = 4.0;
        p.vy = 5.0;
        let set = ParticleSet::from_particles(vec![p, Particle::new(6.0, 7.0, ColorIndex(1))]);
        assert_eq!(
            set.as_flat(),
            &[1.0, 2.0, 4.0, 5.0, 3.0, 6.0, 7.0, 0.0, 0.0, 1.0]
        );
    }
}
