use anyhow::Context;
use clap::{App, Arg};
use pathtracer::camera::PerspectiveCamera;
use pathtracer::film::Film;
use pathtracer::integrator::{PathIntegrator, SamplerIntegrator};
use pathtracer::material::Material;
use pathtracer::sampler::RandomSampler;
use pathtracer::scene::Scene;
use pathtracer::shapes::Mesh;
use pathtracer::{Float, Point2i, Point3f, Spectrum, Vec3f};
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let matches = App::new("render")
        .about("Renders the Cornell box with the path tracer")
        .arg(Arg::with_name("width").long("width").takes_value(true).default_value("512"))
        .arg(Arg::with_name("height").long("height").takes_value(true).default_value("512"))
        .arg(Arg::with_name("spp").long("spp").takes_value(true).default_value("16"))
        .arg(Arg::with_name("seed").long("seed").takes_value(true).default_value("0"))
        .arg(Arg::with_name("rr").long("rr").takes_value(true).default_value("0.8"))
        .arg(Arg::with_name("output").long("output").short("o").takes_value(true).default_value("render.png"))
        .get_matches();

    let width: i32 = matches.value_of("width").unwrap().parse().context("invalid width")?;
    let height: i32 = matches.value_of("height").unwrap().parse().context("invalid height")?;
    let spp: u32 = matches.value_of("spp").unwrap().parse().context("invalid spp")?;
    let seed: u64 = matches.value_of("seed").unwrap().parse().context("invalid seed")?;
    let rr: Float = matches.value_of("rr").unwrap().parse().context("invalid rr probability")?;
    let output = matches.value_of("output").unwrap();

    let mut scene = cornell_box();
    scene.settings.russian_roulette = rr;
    scene.build();

    let camera = PerspectiveCamera::new(
        Point3f::new(278.0, 273.0, -800.0),
        Point3f::new(278.0, 273.0, 0.0),
        Vec3f::new(0.0, 1.0, 0.0),
        40.0,
        Point2i::new(width, height),
    );

    let film = Film::new(Point2i::new(width, height));
    let sampler = RandomSampler::new_with_seed(spp, seed);
    let integrator = SamplerIntegrator { camera: Box::new(camera), radiance: PathIntegrator };

    let start = Instant::now();
    integrator.render(&scene, &film, &sampler)?;
    tracing::info!(elapsed = ?start.elapsed(), spp, "render finished");

    film.write_png(output)?;
    tracing::info!(output, "wrote image");
    Ok(())
}

/// The classic Cornell box, built from two-triangle quads with all normals
/// facing the interior.
fn cornell_box() -> Scene {
    let mut scene = Scene::new();

    let white = scene.add_material(Material::diffuse(Spectrum::new(0.725, 0.71, 0.68)));
    let red = scene.add_material(Material::diffuse(Spectrum::new(0.63, 0.065, 0.05)));
    let green = scene.add_material(Material::diffuse(Spectrum::new(0.14, 0.45, 0.091)));
    let light = scene.add_material(Material::emissive(
        Spectrum::new(0.65, 0.65, 0.65),
        Spectrum::new(47.8, 38.6, 31.1),
    ));

    // floor
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(556.0, 0.0, 0.0),
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(0.0, 0.0, 559.0),
        Point3f::new(556.0, 0.0, 559.0),
        white,
    )));
    // ceiling
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(556.0, 548.0, 559.0),
        Point3f::new(0.0, 548.0, 559.0),
        Point3f::new(0.0, 548.0, 0.0),
        Point3f::new(556.0, 548.0, 0.0),
        white,
    )));
    // back wall
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(556.0, 0.0, 559.0),
        Point3f::new(0.0, 0.0, 559.0),
        Point3f::new(0.0, 548.0, 559.0),
        Point3f::new(556.0, 548.0, 559.0),
        white,
    )));
    // red wall
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(556.0, 0.0, 0.0),
        Point3f::new(556.0, 0.0, 559.0),
        Point3f::new(556.0, 548.0, 559.0),
        Point3f::new(556.0, 548.0, 0.0),
        red,
    )));
    // green wall
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(0.0, 0.0, 559.0),
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(0.0, 548.0, 0.0),
        Point3f::new(0.0, 548.0, 559.0),
        green,
    )));
    // area light, slightly below the ceiling
    scene.add_shape(Arc::new(Mesh::quad(
        Point3f::new(343.0, 547.8, 332.0),
        Point3f::new(213.0, 547.8, 332.0),
        Point3f::new(213.0, 547.8, 227.0),
        Point3f::new(343.0, 547.8, 227.0),
        light,
    )));

    scene
}
