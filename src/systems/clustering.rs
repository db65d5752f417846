use crate::components::cluster::{Cluster, ClusterAccumulator};
use crate::components::particle::Particle;
use crate::globals::*;
use crate::resources::grid::GridParameters;
use crate::resources::particle_types::ColorIndex;
use crate::resources::random::{SeededRandom, reduce_seed};
use crate::resources::simulation::ClusterSettings;

/// Suivi approximatif des groupes de particules.
///
/// Une seule passe d'affectation par tick (pas de convergence à la Lloyd) :
/// chaque particule rejoint le centroïde le plus proche, puis chaque cluster
/// assez peuplé se recentre. Ne modifie jamais les particules.
#[derive(Clone, Debug)]
pub struct ClusterTracker {
    settings: ClusterSettings,
    clusters: Vec<Cluster>,
    rng: SeededRandom,
}

impl ClusterTracker {
    pub fn new(settings: ClusterSettings, seed: u64) -> Self {
        Self {
            settings,
            clusters: Vec::with_capacity(settings.max_clusters),
            rng: SeededRandom::new(reduce_seed(seed) ^ CLUSTER_SEED_SALT),
        }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn active_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.is_active()).count()
    }

    pub fn settings(&self) -> ClusterSettings {
        self.settings
    }

    pub fn update(&mut self, particles: &[Particle], grid: &GridParameters) {
        if !self.settings.enabled || self.settings.max_clusters == 0 {
            return;
        }
        self.refill(grid);

        let mut accumulators = vec![ClusterAccumulator::default(); self.clusters.len()];
        for particle in particles {
            let Some((index, d2)) = self.nearest(particle.x, particle.y) else {
                continue;
            };
            let acc = &mut accumulators[index];
            acc.count += 1;
            acc.sum_x += particle.x;
            acc.sum_y += particle.y;
            acc.sum_d2 += d2;
            acc.sum_color += particle.color_index() as f64;
        }

        for (cluster, acc) in self.clusters.iter_mut().zip(&accumulators) {
            if acc.count > self.settings.min_cluster_size {
                let count = acc.count as f64;
                cluster.x = acc.sum_x / count;
                cluster.y = acc.sum_y / count;
                let computed = CLUSTER_RADIUS_FACTOR * (acc.sum_d2 / count).sqrt();
                // Un rayon nul voudrait dire inactif, même pour des particules empilées
                cluster.radius = (CLUSTER_RADIUS_SMOOTHING * cluster.radius
                    + (1.0 - CLUSTER_RADIUS_SMOOTHING) * computed)
                    .max(f64::MIN_POSITIVE);
                cluster.color = Some(ColorIndex((acc.sum_color / count).round() as usize));
            } else {
                cluster.deactivate();
            }
        }
    }

    /// Complète le pool quand moins de la moitié des clusters sont actifs,
    /// en replaçant aussi les clusters inactifs au hasard
    fn refill(&mut self, grid: &GridParameters) {
        if self.active_count() * 2 >= self.settings.max_clusters {
            return;
        }
        for cluster in self.clusters.iter_mut().filter(|c| !c.is_active()) {
            *cluster = Cluster::at(self.rng.next() * grid.width, self.rng.next() * grid.height);
        }
        while self.clusters.len() < self.settings.max_clusters {
            let cluster = Cluster::at(self.rng.next() * grid.width, self.rng.next() * grid.height);
            self.clusters.push(cluster);
        }
    }

    /// Centroïde le plus proche (distance euclidienne simple)
    fn nearest(&self, x: f64, y: f64) -> Option<(usize, f64)> {
        self.clusters
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let dx = x - c.x;
                let dy = y - c.y;
                (i, dx * dx + dy * dy)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
