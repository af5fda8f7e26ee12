use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};

use decal_clip::math::vec3::Vec3;
use decal_clip::{DecalConfig, DecalProjector, Model, Transform};

/// Parses `x,y,z`.
fn parse_triple(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got '{s}'")),
    }
}

fn command() -> Command {
    Command::new("decal-clip")
        .about("Projects a box-shaped decal onto an OBJ model and writes the clipped decal mesh")
        .arg(
            Arg::new("input")
                .value_name("INPUT.obj")
                .help("Model receiving the decal")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT.obj")
                .help("Where to write the decal mesh")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML bake configuration")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("mesh")
                .short('m')
                .long("mesh")
                .value_name("NAME")
                .help("Only project onto this object/group of the input"),
        )
        .arg(
            Arg::new("position")
                .long("position")
                .value_name("X,Y,Z")
                .help("Projector position")
                .allow_hyphen_values(true)
                .value_parser(parse_triple),
        )
        .arg(
            Arg::new("rotation")
                .long("rotation")
                .value_name("X,Y,Z")
                .help("Projector rotation in degrees")
                .allow_hyphen_values(true)
                .value_parser(parse_triple),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .value_name("X,Y,Z")
                .help("Projector size")
                .allow_hyphen_values(true)
                .value_parser(parse_triple),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Clip source triangles on all cores")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    let matches = command().get_matches();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if matches.get_flag("verbose") {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DecalConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DecalConfig::default(),
    };
    if matches.get_flag("parallel") {
        config.clip.parallel = true;
    }

    let mut transform = Transform::new();
    if let Some(&position) = matches.get_one::<Vec3>("position") {
        transform.set_position(position);
    }
    if let Some(&degrees) = matches.get_one::<Vec3>("rotation") {
        transform.set_rotation_xyz(
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
    }
    if let Some(&scale) = matches.get_one::<Vec3>("scale") {
        transform.set_scale(scale);
    }

    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing input path")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("missing output path")?;

    let mut model = Model::from_obj("input", input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    if let Some(name) = matches.get_one::<String>("mesh") {
        let mesh = model
            .mesh(name)
            .cloned()
            .with_context(|| format!("No mesh named '{}' in {}", name, input.display()))?;
        model = Model::from_mesh("input", mesh);
    }
    log::info!(
        "Loaded {} ({} meshes, {} triangles)",
        input.display(),
        model.mesh_count(),
        model.triangle_count()
    );

    let projector = DecalProjector::new(transform, config);
    let bake = projector.bake(&[model]).context("Decal bake failed")?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    bake.mesh
        .write_obj(&mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} decal triangles to {}",
        bake.emitted,
        output.display()
    );
    if bake.truncated {
        println!(
            "Note: output was capped at {} triangles",
            config.clip.max_output_triangles
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triples() {
        assert_eq!(parse_triple("1, -2,3.5").unwrap(), Vec3::new(1.0, -2.0, 3.5));
        assert!(parse_triple("1,2").is_err());
        assert!(parse_triple("a,b,c").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn mesh_filter_is_optional() {
        let matches = command()
            .try_get_matches_from(["decal-clip", "in.obj", "-o", "out.obj", "-m", "floor"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("mesh").map(String::as_str), Some("floor"));
        let matches = command()
            .try_get_matches_from(["decal-clip", "in.obj", "-o", "out.obj"])
            .unwrap();
        assert!(matches.get_one::<String>("mesh").is_none());
    }

    #[test]
    fn accepts_negative_values() {
        let matches = command()
            .try_get_matches_from(["decal-clip", "in.obj", "-o", "out.obj", "--position", "-1,0,2"])
            .unwrap();
        assert_eq!(
            matches.get_one::<Vec3>("position"),
            Some(&Vec3::new(-1.0, 0.0, 2.0))
        );
    }
}
