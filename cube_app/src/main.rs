//! Cube demo application
//!
//! Demonstrates the software rendering pipeline by spinning a lit cube and
//! pyramid for a fixed number of frames, then writing the final frame to a
//! PNG file.

use soft_engine::prelude::*;
use soft_engine::scene::{GeometrySortMode, ObjectSortMode};

const CONFIG_PATH: &str = "cube_app.toml";
const OUTPUT_PATH: &str = "cube_demo.png";
const FRAME_STEP: f32 = 1.0 / 60.0;

fn build_scene(config: &RenderConfig) -> Scene {
    let cube_style = Style::default()
        .with_shade_mode(ShadeMode::LightSource)
        .with_color([70, 130, 220])
        .with_geometry_sort_mode(GeometrySortMode::Automatic)
        .with_object_sort_mode(ObjectSortMode::Sorted);

    let cube = SceneNode::mesh(shapes::cube(2.0), cube_style)
        .with_id("cube")
        .with_world_position_tracking()
        .on_before_transform(|node, ctx| {
            node.local_transform = Mat4::rotation_euler(ctx.time * 0.7, ctx.time, 0.0);
        });

    let pyramid_style = Style::default()
        .with_shade_mode(ShadeMode::LightSource)
        .with_color([220, 150, 60]);
    let pyramid = SceneNode::mesh(shapes::pyramid(1.2), pyramid_style)
        .with_id("pyramid")
        .on_before_transform(|node, ctx| {
            let orbit = Mat4::rotation_y(-ctx.time * 0.5);
            node.local_transform = orbit * Mat4::new_translation(&Vec3::new(3.0, -0.5, 0.0));
        });

    let sun = SceneNode::light(Light::directional(
        Vec3::new(0.2, -0.5, 1.0),
        Vec3::new(1.0, 1.0, 0.95),
        0.9,
    ));
    let lamp = SceneNode::light(Light::point(Vec3::new(0.9, 0.8, 0.6), 1.2, 0.15))
        .with_transform(Mat4::new_translation(&Vec3::new(-2.0, 2.5, -2.0)));

    Scene::new(
        Camera::new(Vec3::new(0.0, 2.0, -7.0), Vec3::zeros()),
        Perspective::new(60.0, 0.1, 100.0),
        Viewport::new(config.width, config.height),
    )
    .with_node(cube)
    .with_node(pyramid)
    .with_node(sun)
    .with_node(lamp)
}

fn save_frame(buffer: &Framebuffer, background: [u8; 3], path: &str) -> Result<(), image::ImageError> {
    let image = image::RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        match buffer.pixel(x, y) {
            Some([r, g, b, a]) if a != 0 => image::Rgb([r, g, b]),
            _ => image::Rgb(background),
        }
    });
    image.save(path)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = RenderConfig::load_or_default(CONFIG_PATH)?;
    log::info!(
        "rendering {} frames at {}x{}",
        config.frames,
        config.width,
        config.height
    );

    let mut scene = build_scene(&config);
    let mut buffer = Framebuffer::new(config.width, config.height);
    let rasterizer = SoftwareRasterizer::new();
    let mut timer = Timer::new();

    for frame in 0..config.frames {
        let time = frame as f32 * FRAME_STEP;
        let list = scene.compute_frame(time)?;
        rasterizer.render(&list, &mut buffer)?;
        timer.update();
    }

    if let Some(position) = scene.find_node("cube").and_then(|node| node.world_position) {
        log::debug!("cube world position after final frame: {position:?}");
    }
    log::info!(
        "rendered {} frames, average {:.1} fps",
        timer.frame_count(),
        timer.average_fps()
    );

    save_frame(&buffer, config.background, OUTPUT_PATH)?;
    log::info!("wrote final frame to {OUTPUT_PATH}");
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        log::error!("cube demo failed: {error}");
        std::process::exit(1);
    }
}
