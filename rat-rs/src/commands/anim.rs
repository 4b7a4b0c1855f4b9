//! RAT animation command implementations

use anyhow::{Context, Result};
use humansize::{DECIMAL, format_size};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use rat_anim::{CompressOptions, RatAnimation, Vec3, compress};

/// JSON interchange format for uncompressed vertex frames
///
/// Each frame is a list of `[x, y, z]` positions; every frame must hold the
/// same number of vertices.
#[derive(Serialize, Deserialize)]
struct FrameFile {
    frames: Vec<Vec<[f32; 3]>>,
}

impl FrameFile {
    fn to_positions(&self) -> Vec<Vec<Vec3>> {
        self.frames
            .iter()
            .map(|frame| frame.iter().map(|&[x, y, z]| Vec3::new(x, y, z)).collect())
            .collect()
    }
}

pub fn handle_info(path: PathBuf, detailed: bool) -> Result<()> {
    let anim = RatAnimation::load(&path)
        .with_context(|| format!("Failed to load RAT animation from {}", path.display()))?;

    println!("=== RAT Animation Information ===");
    println!("File:            {}", path.display());
    println!("Vertices:        {}", anim.vertex_count);
    println!("Frames:          {}", anim.frame_count);
    println!("Indices:         {}", anim.index_count);
    println!("Mesh data file:  {}", anim.mesh_data_filename);
    println!(
        "Bounds:          ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        anim.bounds.min.x,
        anim.bounds.min.y,
        anim.bounds.min.z,
        anim.bounds.max.x,
        anim.bounds.max.y,
        anim.bounds.max.z
    );
    println!(
        "Raw first frame: {}",
        if anim.raw_first_frame.is_some() {
            "yes"
        } else {
            "no"
        }
    );
    println!("File size:       {}", format_size(anim.file_size(), DECIMAL));

    let capacity = anim.frame_capacity();
    if capacity < anim.frame_count {
        println!(
            "Chunk file:      holds {capacity} of {} frames",
            anim.frame_count
        );
    }

    let raw_size = u64::from(anim.vertex_count) * u64::from(anim.frame_count) * 12;
    if raw_size > 0 {
        println!(
            "Compression:     {:.1}x vs raw float frames ({})",
            raw_size as f64 / anim.file_size() as f64,
            format_size(raw_size, DECIMAL)
        );
    }

    if detailed {
        println!("\n=== Detailed Information ===");
        println!("Bits per frame:  {}", anim.bits_per_frame());
        println!("Delta words:     {}", anim.delta_stream.len());
        for (axis, widths) in [
            ("x", &anim.bit_widths_x),
            ("y", &anim.bit_widths_y),
            ("z", &anim.bit_widths_z),
        ] {
            let min = widths.iter().min().copied().unwrap_or(0);
            let max = widths.iter().max().copied().unwrap_or(0);
            let avg = widths.iter().map(|&w| u64::from(w)).sum::<u64>() as f64
                / widths.len().max(1) as f64;
            println!("Widths {axis}:        min {min}, max {max}, avg {avg:.2} bits");
        }
    }

    Ok(())
}

pub fn handle_validate(path: PathBuf) -> Result<()> {
    println!("Validating RAT animation: {}", path.display());

    match RatAnimation::load(&path) {
        Ok(anim) => {
            println!(
                "✓ Valid animation: {} vertices, {} frames",
                anim.vertex_count, anim.frame_count
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Validation failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_compress(
    input: PathBuf,
    output: PathBuf,
    mesh: String,
    indices: u32,
    keep_raw_first_frame: bool,
    bit_width_cap: Option<u8>,
    budget: Option<u64>,
) -> Result<()> {
    println!("Loading frames: {}", input.display());
    let file = File::open(&input)
        .with_context(|| format!("Failed to open frame file {}", input.display()))?;
    let frame_file: FrameFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON frames from {}", input.display()))?;
    let frames = frame_file.to_positions();

    let options = CompressOptions {
        mesh_data_filename: mesh,
        index_count: indices,
        keep_raw_first_frame,
        bit_width_cap,
    };
    let anim = compress(&frames, &options).context("Compression failed")?;

    let paths = match budget {
        Some(budget) => anim
            .save_chunked(&output, budget)
            .with_context(|| format!("Failed to save animation to {}", output.display()))?,
        None => {
            anim.save(&output)
                .with_context(|| format!("Failed to save animation to {}", output.display()))?;
            vec![output]
        }
    };

    for path in &paths {
        let size = std::fs::metadata(path)?.len();
        println!("Wrote {} ({})", path.display(), format_size(size, DECIMAL));
    }
    println!(
        "Compressed {} frames x {} vertices into {} file(s)",
        anim.frame_count,
        anim.vertex_count,
        paths.len()
    );
    Ok(())
}

pub fn handle_decompress(input: PathBuf, output: PathBuf) -> Result<()> {
    println!("Loading RAT animation: {}", input.display());
    let anim = RatAnimation::load(&input)
        .with_context(|| format!("Failed to load RAT animation from {}", input.display()))?;

    let capacity = anim.frame_capacity();
    if capacity < anim.frame_count {
        log::warn!(
            "input is a chunk file: decoding {capacity} of {} frames",
            anim.frame_count
        );
    }

    let mut cursor = anim.create_cursor();
    let mut frames = Vec::with_capacity(capacity as usize);
    for frame in 0..capacity {
        cursor
            .decode_to(&anim, frame)
            .with_context(|| format!("Failed to decode frame {frame}"))?;
        frames.push(
            cursor
                .dequantized(&anim)
                .iter()
                .map(|v| [v.x, v.y, v.z])
                .collect(),
        );
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    serde_json::to_writer(BufWriter::new(file), &FrameFile { frames })
        .context("Failed to write JSON frames")?;
    println!("Wrote {} frames to {}", capacity, output.display());
    Ok(())
}

pub fn handle_assemble(chunks: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    println!("Assembling {} chunk(s)", chunks.len());
    let anim = RatAnimation::assemble(&chunks).context("Failed to assemble chunks")?;
    anim.save(&output)
        .with_context(|| format!("Failed to save animation to {}", output.display()))?;
    println!(
        "Wrote {} ({} frames, {})",
        output.display(),
        anim.frame_count,
        format_size(anim.file_size(), DECIMAL)
    );
    Ok(())
}
