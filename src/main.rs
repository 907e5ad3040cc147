use bevy::prelude::*;
use bevy::window::PresentMode;

mod constants;
mod decals;
mod engine;
mod order;

use decals::registry::{DecalEdit, DecalRegistry, sync_decal_placements};
use decals::upload::{UploadRequested, poll_decode_tasks, start_decode_tasks};
use engine::camera::{OrbitCamera, camera_controller};
use engine::composer::{RebuildBox, SceneRoots, rebuild_gift_box};
use engine::config::{BoxConfig, Pattern, parse_color, parse_dimension};
use order::{OrderContact, OrderDetails};

/// Colour swatches offered by the UI layer.
const BOX_SWATCHES: [&str; 5] = ["#ffffff", "#f9a8d4", "#93c5fd", "#fde047", "#a7f3d0"];
const RIBBON_SWATCHES: [&str; 5] = ["#ef4444", "#3b82f6", "#22c55e", "#eab308", "#a855f7"];
const PATTERN_SWATCHES: [&str; 4] = ["#00000026", "#ffffff66", "#ef444480", "#1d4ed880"];

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: String::from("Gift Box Configurator"),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .init_resource::<BoxConfig>()
        .init_resource::<DecalRegistry>()
        .init_resource::<SceneRoots>()
        .init_resource::<OrbitCamera>()
        .add_event::<RebuildBox>()
        .add_event::<UploadRequested>()
        .add_systems(
            Startup,
            (apply_cli_config, setup_scene, queue_cli_uploads).chain(),
        )
        .add_systems(
            Update,
            (
                handle_config_input,
                handle_decal_input,
                handle_camera_input,
                // The rebuild runs first so the decal layer exists before
                // any finished decode spawns a decal into it.
                rebuild_gift_box,
                start_decode_tasks,
                poll_decode_tasks,
                sync_decal_placements,
                camera_controller,
            )
                .chain(),
        )
        .run();
}

/// Viewport camera, lighting, and the initial box build.
fn setup_scene(
    mut commands: Commands,
    orbit: Res<OrbitCamera>,
    mut rebuilds: EventWriter<RebuildBox>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        orbit.transform(),
    ));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 50.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("box: arrows = width/height, [ ] = length, B = ribbon, P = pattern");
    info!("colours: C = box, V = ribbon, N = pattern ink");
    info!("decals: Tab = select, WASD = offset, -/= = scale, Q/E = rotate, F = face, Del = remove");
    info!("camera: R = auto-rotate, 0 = reset | O = order preview");

    rebuilds.write(RebuildBox);
}

/// Seed the configuration from command-line flags. Dimension and colour
/// values go through the same coercion as any other UI input.
fn apply_cli_config(mut config: ResMut<BoxConfig>) {
    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--width=") {
            config.width = parse_dimension(value);
        } else if let Some(value) = arg.strip_prefix("--height=") {
            config.height = parse_dimension(value);
        } else if let Some(value) = arg.strip_prefix("--length=") {
            config.length = parse_dimension(value);
        } else if let Some(value) = arg.strip_prefix("--box-color=") {
            config.box_color = parse_color(value);
        } else if let Some(value) = arg.strip_prefix("--ribbon-color=") {
            config.ribbon_color = parse_color(value);
        } else if let Some(value) = arg.strip_prefix("--pattern-color=") {
            config.pattern_color = parse_color(value);
        } else if let Some(value) = arg.strip_prefix("--pattern=") {
            config.pattern = Pattern::from_string(value);
        } else if arg == "--no-ribbon" {
            config.has_ribbon = false;
        }
    }
}

/// Read image files named on the command line and feed them into the
/// upload pipeline as raw byte buffers. This is the file-picking
/// collaborator seam; the core never touches the filesystem.
fn queue_cli_uploads(mut uploads: EventWriter<UploadRequested>) {
    for path in std::env::args().skip(1).filter(|arg| !arg.starts_with("--")) {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let name = std::path::Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone());
                info!("queueing upload '{name}'");
                uploads.write(UploadRequested { name, bytes });
            }
            Err(err) => warn!("cannot read {path}: {err}"),
        }
    }
}

/// Keyboard edits to the box configuration. Any change triggers a full
/// rebuild.
fn handle_config_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut config: ResMut<BoxConfig>,
    mut rebuilds: EventWriter<RebuildBox>,
) {
    let mut edited = config.clone();

    if keyboard.just_pressed(KeyCode::ArrowRight) {
        edited.width = (edited.width + 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        edited.width = (edited.width - 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        edited.height = (edited.height + 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        edited.height = (edited.height - 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        edited.length = (edited.length + 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        edited.length = (edited.length - 1.0).clamp(1.0, 100.0);
    }
    if keyboard.just_pressed(KeyCode::KeyB) {
        edited.has_ribbon = !edited.has_ribbon;
    }
    if keyboard.just_pressed(KeyCode::KeyP) {
        edited.pattern = edited.pattern.next();
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        edited.box_color = cycle_swatch(edited.box_color, &BOX_SWATCHES);
    }
    if keyboard.just_pressed(KeyCode::KeyV) {
        edited.ribbon_color = cycle_swatch(edited.ribbon_color, &RIBBON_SWATCHES);
    }
    if keyboard.just_pressed(KeyCode::KeyN) {
        edited.pattern_color = cycle_swatch(edited.pattern_color, &PATTERN_SWATCHES);
    }

    if edited != *config {
        info!("{}", edited.product_details());
        *config = edited;
        rebuilds.write(RebuildBox);
    }
}

/// Next swatch after the current colour, starting over when the current
/// value is not on the palette.
fn cycle_swatch(current: Color, palette: &[&str]) -> Color {
    let colors: Vec<Color> = palette.iter().map(|hex| parse_color(hex)).collect();
    let index = colors
        .iter()
        .position(|c| *c == current)
        .map(|i| (i + 1) % colors.len())
        .unwrap_or(0);
    colors[index]
}

/// Keyboard edits to the decal collection and the active decal's config.
fn handle_decal_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut registry: ResMut<DecalRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut camera: ResMut<OrbitCamera>,
) {
    if keyboard.just_pressed(KeyCode::Tab) && registry.cycle_active().is_some() {
        camera.auto_rotate = false;
        if let Some(decal) = registry.active_decal() {
            info!("editing decal '{}' ({})", decal.name, decal.config.face.as_str());
        }
    }

    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        if let Some(id) = registry.active_id() {
            if let Some(decal) = registry.remove(id) {
                commands.entity(decal.anchor).despawn();
                meshes.remove(&decal.mesh);
                materials.remove(&decal.material);
                images.remove(&decal.texture);
                info!("decal '{}' removed", decal.name);
            }
        }
    }

    let Some(current) = registry.active_decal().map(|d| d.config) else {
        return;
    };
    let mut edit = None;
    if keyboard.just_pressed(KeyCode::KeyF) {
        edit = Some(DecalEdit::Face(current.face.next()));
    }
    if keyboard.just_pressed(KeyCode::KeyA) {
        edit = Some(DecalEdit::OffsetX(current.offset_x - 0.5));
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        edit = Some(DecalEdit::OffsetX(current.offset_x + 0.5));
    }
    if keyboard.just_pressed(KeyCode::KeyW) {
        edit = Some(DecalEdit::OffsetY(current.offset_y + 0.5));
    }
    if keyboard.just_pressed(KeyCode::KeyS) {
        edit = Some(DecalEdit::OffsetY(current.offset_y - 0.5));
    }
    if keyboard.just_pressed(KeyCode::Equal) {
        edit = Some(DecalEdit::Scale(current.scale + 0.1));
    }
    if keyboard.just_pressed(KeyCode::Minus) {
        edit = Some(DecalEdit::Scale((current.scale - 0.1).max(0.1)));
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        edit = Some(DecalEdit::Rotation(current.rotation_degrees + 5.0));
    }
    if keyboard.just_pressed(KeyCode::KeyQ) {
        edit = Some(DecalEdit::Rotation(current.rotation_degrees - 5.0));
    }
    if let Some(edit) = edit {
        registry.apply_edit(edit);
    }
}

/// Camera toggles and the order-document preview.
fn handle_camera_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut camera: ResMut<OrbitCamera>,
    config: Res<BoxConfig>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        let enabled = !camera.auto_rotate;
        camera.auto_rotate = enabled;
        info!("auto-rotate {}", if enabled { "on" } else { "off" });
    }
    if keyboard.just_pressed(KeyCode::Digit0) {
        camera.reset();
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        let order = OrderDetails::from_config(&config, &OrderContact::default());
        match serde_json::to_string_pretty(&order) {
            Ok(json) => info!("order preview:\n{json}"),
            Err(err) => warn!("order preview unavailable: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_cycle_wraps_and_recovers_from_off_palette_colours() {
        let first = parse_color(BOX_SWATCHES[0]);
        let second = parse_color(BOX_SWATCHES[1]);
        assert_eq!(cycle_swatch(first, &BOX_SWATCHES), second);
        let last = parse_color(BOX_SWATCHES[4]);
        assert_eq!(cycle_swatch(last, &BOX_SWATCHES), first);
        // A colour that is not on the palette restarts the cycle.
        assert_eq!(cycle_swatch(Color::BLACK, &BOX_SWATCHES), first);
    }
}
