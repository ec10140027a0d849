//! Particle bursts for perfect placements and growth
//!
//! Particle positions are closed-form in burst age rather than integrated,
//! so a burst is fully described by its origin, age and fixed per-particle
//! velocities.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::BurstTuning;

/// One point particle within a burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub vel: Vec3,
    /// Seconds after which the particle freezes in place
    pub lifetime: f32,
    /// Offset from the burst origin
    pub offset: Vec3,
}

impl Particle {
    /// Offset from the origin at burst age `t`: a lobbed arc
    pub fn offset_at(&self, t: f32, drop: f32) -> Vec3 {
        Vec3::new(self.vel.x * t, (self.vel.y - drop * t) * t, self.vel.z * t)
    }

    pub fn is_alive(&self, age: f32) -> bool {
        age <= self.lifetime
    }
}

/// A short-lived radial spray sharing one origin and colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub origin: Vec3,
    /// 0xRRGGBB
    pub color: u32,
    pub age: f32,
    pub opacity: f32,
    pub particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn new<R: Rng>(origin: Vec3, color: u32, tuning: &BurstTuning, rng: &mut R) -> Self {
        let mut particles = Vec::with_capacity(tuning.particles);
        for _ in 0..tuning.particles {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let up = sample(rng, tuning.upward);
            let radial = sample(rng, tuning.radial);
            particles.push(Particle {
                vel: Vec3::new(angle.cos() * radial, up, angle.sin() * radial),
                lifetime: sample(rng, tuning.lifetime),
                offset: Vec3::ZERO,
            });
        }
        Self {
            origin,
            color,
            age: 0.0,
            opacity: tuning.opacity,
            particles,
        }
    }

    /// Age the burst, fade it, and move particles still within their lifetime
    pub fn update(&mut self, tuning: &BurstTuning, dt: f32) {
        self.age += dt;
        let fade = (1.0 - self.age / tuning.fade_age).clamp(0.0, 1.0);
        self.opacity = tuning.opacity * fade;

        let age = self.age;
        for particle in self.particles.iter_mut().filter(|p| p.is_alive(age)) {
            particle.offset = particle.offset_at(age, tuning.drop);
        }
    }

    /// World-space particle positions
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| self.origin + p.offset)
    }

    pub fn is_expired(&self, max_age: f32) -> bool {
        self.age >= max_age
    }
}

fn sample<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// All live bursts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BurstField {
    bursts: Vec<ParticleBurst>,
}

impl BurstField {
    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    pub fn len(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bursts.is_empty()
    }

    pub fn clear(&mut self) {
        self.bursts.clear();
    }

    pub fn spawn<R: Rng>(&mut self, origin: Vec3, color: u32, tuning: &BurstTuning, rng: &mut R) {
        log::trace!("Burst #{:06x} at {:?}", color, origin);
        self.bursts.push(ParticleBurst::new(origin, color, tuning, rng));
    }

    /// Advance every burst and drop the ones past their max age
    pub fn update(&mut self, tuning: &BurstTuning, dt: f32) {
        for burst in &mut self.bursts {
            burst.update(tuning, dt);
        }
        self.bursts.retain(|b| !b.is_expired(tuning.max_age));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn burst() -> ParticleBurst {
        let mut rng = Pcg32::seed_from_u64(11);
        let origin = Vec3::new(0.0, 1.0, 0.0);
        ParticleBurst::new(origin, 0x111111, &BurstTuning::default(), &mut rng)
    }

    #[test]
    fn test_spawn_ranges() {
        let tuning = BurstTuning::default();
        let burst = burst();
        assert_eq!(burst.particles.len(), tuning.particles);
        assert_eq!(burst.opacity, tuning.opacity);
        for p in &burst.particles {
            let radial = Vec3::new(p.vel.x, 0.0, p.vel.z).length();
            assert!(radial >= tuning.radial.0 - 1e-4 && radial <= tuning.radial.1 + 1e-4);
            assert!(p.vel.y >= tuning.upward.0 && p.vel.y < tuning.upward.1);
            assert!(p.lifetime >= tuning.lifetime.0 && p.lifetime < tuning.lifetime.1);
            assert_eq!(p.offset, Vec3::ZERO);
        }
    }

    #[test]
    fn test_closed_form_arc() {
        let tuning = BurstTuning::default();
        let mut burst = burst();
        burst.update(&tuning, 0.2);
        burst.update(&tuning, 0.1);

        let p = &burst.particles[0];
        let t = burst.age;
        let expected = Vec3::new(p.vel.x * t, (p.vel.y - tuning.drop * t) * t, p.vel.z * t);
        assert!((p.offset - expected).length() < 1e-5);
        // Stepping in one go lands in the same place
        let mut single = self::burst();
        single.update(&tuning, t);
        assert!((single.particles[0].offset - p.offset).length() < 1e-5);
    }

    #[test]
    fn test_particles_freeze_after_lifetime() {
        let tuning = BurstTuning::default();
        let mut burst = burst();
        burst.update(&tuning, 0.44);
        let before: Vec<Vec3> = burst.particles.iter().map(|p| p.offset).collect();
        burst.update(&tuning, 0.3);

        for (p, old) in burst.particles.iter().zip(before) {
            // Every lifetime is below 0.74, so all particles froze
            assert_eq!(p.offset, old);
        }
    }

    #[test]
    fn test_fade_and_expiry() {
        let tuning = BurstTuning::default();
        let mut field = BurstField::default();
        let mut rng = Pcg32::seed_from_u64(5);
        field.spawn(Vec3::ZERO, 0xc8a100, &tuning, &mut rng);

        field.update(&tuning, 0.35);
        let opacity = field.bursts()[0].opacity;
        assert!((opacity - tuning.opacity * 0.5).abs() < 1e-5);

        field.update(&tuning, 0.35);
        assert!(field.bursts()[0].opacity.abs() < 1e-5);
        assert_eq!(field.len(), 1);

        field.update(&tuning, 0.11);
        assert!(field.is_empty());
    }

    proptest! {
        #[test]
        fn prop_expired_bursts_never_return(
            steps in proptest::collection::vec(0.0f32..0.033, 1..80),
        ) {
            let tuning = BurstTuning::default();
            let mut field = BurstField::default();
            let mut rng = Pcg32::seed_from_u64(9);
            field.spawn(Vec3::ZERO, 0x111111, &tuning, &mut rng);
            let mut gone = false;
            for dt in steps {
                field.update(&tuning, dt);
                if gone {
                    prop_assert!(field.is_empty());
                }
                prop_assert!(field.bursts().iter().all(|b| b.age < tuning.max_age));
                gone = field.is_empty();
            }
        }
    }
}
