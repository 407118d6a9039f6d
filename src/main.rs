use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use std::{env, fs};

use log::{error, info};

use huffpix::grayscale::{load_matrix, save_matrix};
use huffpix::{compress, decompress, Artifact, CodecError, GrayscaleRule, Result, SampleMatrix};

#[derive(Clone, Copy)]
enum Action {
    Compress,
    Decompress,
    Test,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 && args.len() != 4 {
        return usage("Invocation doesn't match usage! Provide 2 or 3 arguments.");
    }
    let action = match args[1].as_str() {
        "c" => Action::Compress,
        "d" => Action::Decompress,
        "t" => Action::Test,
        _ => return usage("Unrecognized option -> <action>!"),
    };
    let rule = match args.get(3).map(|s| s.parse::<GrayscaleRule>()) {
        None => GrayscaleRule::default(),
        Some(Ok(rule)) => rule,
        Some(Err(msg)) => return usage(&msg),
    };

    let path = PathBuf::from(&args[2]);
    match run_path(&path, action, rule) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}

fn run_path(path: &Path, action: Action, rule: GrayscaleRule) -> Result<()> {
    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() {
                run(&file_path, action, rule)?;
            }
        }
        Ok(())
    } else if path.is_file() {
        run(path, action, rule)
    } else {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "path must be a file or a directory").into())
    }
}

fn run(file_path: &Path, action: Action, rule: GrayscaleRule) -> Result<()> {
    let (compress_path, decompress_path) = output_paths(&env::current_dir()?, file_path);

    match action {
        Action::Compress => {
            compress_file(file_path, &compress_path, rule)?;
        }
        Action::Decompress => {
            decompress_file(file_path, &decompress_path)?;
        }
        Action::Test => {
            let original = compress_file(file_path, &compress_path, rule)?;
            let restored = decompress_file(&compress_path, &decompress_path)?;
            if original != restored {
                let msg = format!("{} decodes to a different matrix", compress_path.display());
                return Err(CodecError::CorruptArtifact(msg));
            }
            info!("{}: round trip OK", file_path.display());
        }
    }
    Ok(())
}

/// `<name>.hpx` and `<name>.out.png` inside `out_dir`
fn output_paths(out_dir: &Path, file_path: &Path) -> (PathBuf, PathBuf) {
    let out_path = out_dir.join(file_path.file_name().unwrap_or_default());
    (out_path.with_extension("hpx"), out_path.with_extension("out.png"))
}

fn compress_file(input: &Path, output: &Path, rule: GrayscaleRule) -> Result<SampleMatrix> {
    let timer = Instant::now();
    let matrix = load_matrix(input, rule)?;
    let artifact = compress(&matrix)?;
    artifact.save(output)?;

    let stats = artifact.stats();
    info!(
        "[c] {} -> {}: {}x{}, {} bytes raw, {} bytes packed, {} bytes total (ratio: {:.3}, {:.3} bits/sample), took {:?}",
        input.display(),
        output.display(),
        matrix.width(),
        matrix.height(),
        stats.raw_bytes,
        stats.packed_bytes,
        stats.artifact_bytes,
        stats.ratio,
        stats.bits_per_sample,
        timer.elapsed()
    );
    Ok(matrix)
}

fn decompress_file(input: &Path, output: &Path) -> Result<SampleMatrix> {
    let timer = Instant::now();
    let artifact = Artifact::load(input)?;
    let matrix = decompress(&artifact)?;
    save_matrix(&matrix, output)?;
    info!(
        "[d] {} -> {}: {}x{}, took {:?}",
        input.display(),
        output.display(),
        matrix.width(),
        matrix.height(),
        timer.elapsed()
    );
    Ok(matrix)
}

fn usage(msg: &str) -> ExitCode {
    eprintln!("Usage: huffpix <Action> <Path> [GrayscaleRule]");
    eprintln!("<Action>: c (compress image), d (decompress .hpx to .out.png), t (test = c + d + compare)");
    eprintln!("<Path> can be a single file or a directory");
    eprintln!("[GrayscaleRule]: exact (default, colored pixels become 0) or luma");
    eprintln!("Note: Directories are shallow traversed, outputs go to the current directory");
    eprintln!("{msg}");
    ExitCode::from(2)
}
