use crate::integrator::IntegratorRadiance;
use crate::interaction::SurfaceInteraction;
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::Ray;
use cgmath::prelude::*;

/// Unidirectional path tracer with explicit light sampling and
/// Russian-roulette termination. All policy constants (continuation
/// probability, epsilons, the hard depth cap) come from the scene's
/// `RenderSettings`.
pub struct PathIntegrator;

impl IntegratorRadiance for PathIntegrator {
    fn incident_radiance(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u16,
    ) -> anyhow::Result<Spectrum> {
        match scene.intersect(ray)? {
            Some(isect) => self.shade(&isect, scene, sampler, depth),
            None => Ok(scene.background),
        }
    }
}

impl PathIntegrator {
    /// Outgoing radiance at `isect`: the sum of a light-sampled direct term
    /// and a BRDF-sampled, roulette-terminated indirect term. The Lambertian
    /// BRDF is independent of the outgoing direction, so none is taken.
    fn shade(
        &self,
        isect: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u16,
    ) -> anyhow::Result<Spectrum> {
        let settings = scene.settings;
        let material = scene.material(isect.material);

        // Surfaces that emit return their radiance directly; paths never
        // continue past an emitter.
        if material.has_emission() {
            return Ok(material.emission);
        }

        let mut radiance = Spectrum::black();

        // Direct term: one sample on the aggregate emissive surface.
        let light = scene.sample_light(sampler.get_1d(), sampler.get_1d(), sampler.get_2d());
        if let Some(light) = light {
            let to_light = light.hit.p - isect.p;
            let dist2 = to_light.magnitude2();
            if dist2 > 0.0 && light.pdf > settings.pdf_epsilon {
                let dist = dist2.sqrt();
                let wi = to_light / dist;

                let shadow_ray = isect.spawn_ray(wi, settings.ray_offset);
                // The light point is visible unless something sits strictly
                // closer along the shadow ray (the nearest hit being the
                // light surface itself counts as visible).
                let occluded = match scene.intersect(&shadow_ray)? {
                    Some(hit) => hit.t + settings.shadow_epsilon < dist,
                    None => false,
                };

                if !occluded {
                    let f = material.eval(wi, isect.n);
                    let cos_surface = isect.n.dot(wi).max(0.0);
                    let cos_light = light.hit.n.dot(-wi).max(0.0);
                    radiance +=
                        light.emission * f * (cos_surface * cos_light / dist2 / light.pdf);
                }
            }
        }

        // Indirect term: continue the path with probability `russian_roulette`
        // and reweight survivors, keeping the estimator unbiased. The depth
        // cap only guards the stack.
        if depth < settings.max_depth && sampler.get_1d() < settings.russian_roulette {
            let wi = material.sample_wi(isect.n, sampler.get_2d());
            let pdf = material.pdf(wi, isect.n);
            if pdf > settings.pdf_epsilon {
                let bounce_ray = isect.spawn_ray(wi, settings.ray_offset);
                if let Some(next) = scene.intersect(&bounce_ray)? {
                    // Emitters are already accounted for by light sampling.
                    if !scene.material(next.material).has_emission() {
                        let li = self.shade(&next, scene, sampler, depth + 1)?;
                        let cos = isect.n.dot(wi).max(0.0);
                        radiance += li
                            * material.eval(wi, isect.n)
                            * (cos / pdf / settings.russian_roulette);
                    }
                }
            }
        }

        Ok(radiance)
    }
}
