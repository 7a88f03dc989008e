use rand::Rng;

/// Running summary a domain keeps over the particles of one belief state.
///
/// `update` is called exactly once for every particle inserted, so the summary
/// always describes the particles currently owned by the belief.
pub trait BeliefStats<S>: Clone {
    fn update(&mut self, particle: &S);

    /// Reset to the summary of an empty belief.
    fn clear(&mut self);
}

/// Summary for domains that keep no belief statistics.
impl<S> BeliefStats<S> for () {
    fn update(&mut self, _particle: &S) {}

    fn clear(&mut self) {}
}

/// Particle approximation of the posterior over hidden state.
///
/// The belief owns its particles; cloning it deep-copies every particle
/// and the statistics, and dropping it frees them.
#[derive(Debug, Clone)]
pub struct BeliefState<S, B> {
    particles: Vec<S>,
    stats: B,
}

impl<S, B: BeliefStats<S>> BeliefState<S, B> {
    /// Create an empty belief around a fresh summary.
    pub fn new(stats: B) -> Self {
        BeliefState {
            particles: Vec::new(),
            stats,
        }
    }

    /// Take ownership of a particle.
    pub fn add_particle(&mut self, particle: S) {
        self.stats.update(&particle);
        self.particles.push(particle);
    }

    /// Move every particle of `other` into this belief.
    /// The resulting summary is the one `other` carried, extended with this belief's own particles.
    pub fn absorb(&mut self, other: BeliefState<S, B>) {
        let BeliefState { particles, stats } = other;
        let mut merged = stats;
        for particle in &self.particles {
            merged.update(particle);
        }
        self.stats = merged;
        let mut own = std::mem::replace(&mut self.particles, particles);
        self.particles.append(&mut own);
    }

    /// Drop every particle and reset the summary.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.stats.clear();
    }

    pub fn particle(&self, index: usize) -> Option<&S> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[S] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn stats(&self) -> &B {
        &self.stats
    }
}

impl<S: Clone, B: BeliefStats<S>> BeliefState<S, B> {
    /// Copy of one particle drawn uniformly; the caller owns the copy.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<S> {
        if self.particles.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.particles.len());
        Some(self.particles[index].clone())
    }
}
