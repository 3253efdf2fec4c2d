//! Headless sculpting demo: runs scripted strokes in every mode against a
//! fresh terrain, then writes the radar minimap and the level file.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --brush <PNG>      Brush image, red channel is the kernel (default: radial)
//!   --config <JSON>    Editor config overrides
//!   --terrain <JSON>   Terrain description (default: 200x60x200, 257² heights)
//!   --out <DIR>        Output directory (default: "out")
//!   --ticks <N>        Ticks per stroke (default: 60)
//!
//! Output:
//!   <out>/radar.png       Dominant splat layer per alpha cell
//!   <out>/terrain.tslv    Compressed level file

use std::path::{Path, PathBuf};
use std::time::Duration;

use terrasculpt::brush::BrushKernel;
use terrasculpt::core::{logging, time::TickClock, Result, Vec3};
use terrasculpt::edit::{
    pointing_height_label, EditMode, EditorConfig, HeightTool, OccupancyGridBridge, ReadinessGate,
    TerrainFieldEditor, TickInput, UndoStack,
};
use terrasculpt::storage;
use terrasculpt::terrain::{render_radar, TerrainData, TerrainDesc, DEFAULT_RADAR_PALETTE};

/// Stand-in for a gameplay grid: counts evictions in 4m cells
#[derive(Default)]
struct EvictionCounter {
    evicted: usize,
}

impl OccupancyGridBridge for EvictionCounter {
    fn sample(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        ((world_x / 4.0).floor() as i32, (world_z / 4.0).floor() as i32)
    }

    fn evict(&mut self, _grid_x: i32, _grid_y: i32) {
        self.evicted += 1;
    }
}

/// Everything one scripted stroke touches
struct Session {
    editor: TerrainFieldEditor,
    terrain: TerrainData,
    undo: UndoStack,
    occupancy: EvictionCounter,
    clock: TickClock,
}

impl Session {
    /// Drag from `from` to `to` over `ticks` held ticks, then release
    fn stroke(&mut self, from: Vec3, to: Vec3, ticks: usize, invert: bool, copy_height: bool) {
        let mut cells = 0;
        for i in 0..ticks {
            let t = i as f32 / ticks.max(2).saturating_sub(1) as f32;
            let mut point = from.lerp(to, t);
            point.y = self.terrain.sample_world_height(point.x, point.z);

            let mut input = TickInput::held(point, self.clock.tick());
            input.invert = invert;
            input.copy_height = copy_height;
            let outcome = self
                .editor
                .update(&mut self.terrain, &input, &mut self.undo, &mut self.occupancy);
            cells += outcome.cells_modified;

            if let Some(h) = outcome.copied_height {
                println!("  copied flatten target {:.3}", h);
            }
            if i + 1 == ticks {
                if let Some(h) = outcome.pointing_height {
                    println!("  {}", pointing_height_label(h));
                }
            }
        }

        let release = TickInput::hover(to, self.clock.tick());
        self.editor
            .update(&mut self.terrain, &release, &mut self.undo, &mut self.occupancy);
        println!("  {} cell writes, {} undo entries", cells, self.undo.undo_count());
    }

    fn set(&mut self, mode: EditMode, tool: HeightTool, strength: f32) {
        let session = self.editor.session_mut();
        session.set_mode(mode);
        session.set_height_tool(tool);
        session.set_strength(strength);
    }
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let brush_path = parse_str_arg(&args, "--brush");
    let config_path = parse_str_arg(&args, "--config");
    let terrain_path = parse_str_arg(&args, "--terrain");
    let out_dir = PathBuf::from(parse_str_arg(&args, "--out").unwrap_or_else(|| "out".to_string()));
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(60);

    let config = match config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let desc = match terrain_path {
        Some(path) => load_desc(Path::new(&path))?,
        None => TerrainDesc::default(),
    };
    let brush = match brush_path {
        Some(path) => BrushKernel::load(path)?,
        None => BrushKernel::radial(64, 0.4)?,
    };

    println!("=== Terrasculpt ===");
    println!("Terrain: {:?}", desc.size);
    println!("Output:  {}", out_dir.display());
    println!();

    let terrain = TerrainData::new(&desc)?;
    let gate = ReadinessGate::new();
    let mut editor = TerrainFieldEditor::new(config.clone())?;
    editor.set_brush(brush);

    // The loader thread would flip this; headless, the level is ready at once
    gate.mark_ready();
    editor.enable_when_ready(&gate);

    let mut s = Session {
        editor,
        terrain,
        undo: UndoStack::new(config.undo_capacity),
        occupancy: EvictionCounter::default(),
        clock: TickClock::fixed(Duration::from_secs_f32(1.0 / 60.0)),
    };

    let size = s.terrain.size();
    let at = |fx: f32, fz: f32| Vec3::new(size.x * fx, 0.0, size.z * fz);
    s.editor.session_mut().set_brush_radius(size.x * 0.08);
    println!("{}", s.editor.session().brush_size_label());

    println!("Raise ridge");
    s.set(EditMode::EditTerrain, HeightTool::RaiseLower, 1.0);
    s.stroke(at(0.2, 0.5), at(0.8, 0.5), ticks, false, false);
    s.stroke(at(0.5, 0.5), at(0.5, 0.5), ticks, false, false);

    println!("Dig crater");
    s.stroke(at(0.3, 0.3), at(0.3, 0.3), ticks, true, false);

    println!("Smooth ridge");
    s.set(EditMode::EditTerrain, HeightTool::Smooth, 0.5);
    s.stroke(at(0.2, 0.5), at(0.8, 0.5), ticks, false, false);

    println!("Flatten plateau at ridge height");
    s.set(EditMode::EditTerrain, HeightTool::FlattenByValue, 1.0);
    s.stroke(at(0.5, 0.5), at(0.5, 0.5), 1, false, true);
    s.stroke(at(0.7, 0.7), at(0.8, 0.8), ticks, false, false);

    println!("Flatten by pointer height");
    s.set(EditMode::EditTerrain, HeightTool::FlattenByHeight, 1.0);
    s.stroke(at(0.5, 0.45), at(0.5, 0.55), ticks, false, false);

    println!("Paint layers");
    let layers = s.terrain.alpha().layers();
    s.set(EditMode::PaintTerrain, HeightTool::RaiseLower, 0.2);
    for layer in 1..layers {
        s.editor.session_mut().set_selected_layer(layer);
        let f = layer as f32 / layers as f32;
        s.stroke(at(f, 0.1), at(f, 0.9), ticks, false, false);
    }

    println!("Scatter details");
    s.set(EditMode::PaintDetails, HeightTool::RaiseLower, 0.3);
    s.stroke(at(0.1, 0.9), at(0.9, 0.1), ticks, false, false);

    println!();
    println!("Occupants evicted: {}", s.occupancy.evicted);
    println!(
        "Undo history: {} entries, {} KiB compressed",
        s.undo.undo_count(),
        s.undo.memory_bytes() / 1024
    );

    let sculpted = s.terrain.clone();
    if let Some(kind) = s.undo.undo(&mut s.terrain)? {
        println!("Undid last {:?} stroke", kind);
    }
    s.undo.redo(&mut s.terrain)?;
    if s.terrain != sculpted {
        log::warn!("Redo did not restore the sculpted terrain");
    }

    std::fs::create_dir_all(&out_dir)?;
    let radar = render_radar(s.terrain.alpha(), &DEFAULT_RADAR_PALETTE, config.radar_threshold);
    let radar_path = out_dir.join("radar.png");
    radar.save(&radar_path)?;
    println!("Radar:   {}", radar_path.display());

    let level_path = out_dir.join("terrain.tslv");
    storage::save_terrain(&level_path, &s.terrain)?;
    let reloaded = storage::load_terrain(&level_path)?;
    if reloaded != s.terrain {
        log::warn!("Reloaded terrain differs from the saved one");
    }
    println!("Level:   {}", level_path.display());

    Ok(())
}

fn load_desc(path: &Path) -> Result<TerrainDesc> {
    let text = std::fs::read_to_string(path)?;
    let desc: TerrainDesc = serde_json::from_str(&text)?;
    desc.validate()?;
    Ok(desc)
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
