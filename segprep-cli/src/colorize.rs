// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use segprep_core::class::{Palette, RemapPolicy};
use segprep_core::constant;
use segprep_core::error::SegprepError;
use segprep_core::im::ClassMask;
use segprep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Render colored visualizations from class-indexed masks.")]
pub struct ColorizeArgs {
    #[arg(short = 'm', long, help = "Mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(short = 'o', long, help = "Output directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Palette JSON array of #rrggbb strings. Defaults to the SegPath palette."
    )]
    pub palette: Option<String>,

    #[arg(
        long,
        help = "Clamp out-of-domain pixel values to background instead of skipping the file."
    )]
    pub clamp: bool,

    #[arg(long, help = "Substring specifying masks (e.g. _mask).")]
    pub mask_substring: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn colorize_masks(args: &ColorizeArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            eprintln!(
                "[segprep::colorize] ERROR: Threads must be a positive integer if provided."
            );
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let palette = match &args.palette {
        Some(path) => Palette::open(path).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
        None => Palette::segpath(),
    };

    let policy = if args.clamp {
        RemapPolicy::Clamp
    } else {
        RemapPolicy::Strict
    };

    let mask_files = ut::path::collect_file_paths(
        args.masks.to_owned().unwrap(),
        constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
        args.mask_substring.to_owned(),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if mask_files.is_empty() {
        eprintln!(
            "[segprep::colorize] ERROR: No mask files were detected. Please check your path and/or substring identifier."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Colorizing {} masks with a {}-class palette.",
            ut::track::thousands_format(mask_files.len()),
            palette.len()
        ),
        args.verbose,
    );

    let output = PathBuf::from(args.output.to_owned().unwrap());

    let output = ut::path::ensure_directory(&output).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let pb = ut::track::progress_bar(mask_files.len(), "Colorizing", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let path = &mask_files[idx];

            if let Err(err) = colorize_one(path, &output, &palette, policy) {
                failure
                    .lock()
                    .unwrap()
                    .push(format!("{}\t{}", path.display(), err));
            }
        });

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    for line in &failure {
        eprintln!("[segprep::colorize] WARNING: Skipped mask {}.", line);
    }

    ut::track::progress_log(
        &format!(
            "Complete. Colorized {} of {} masks into {}.",
            ut::track::thousands_format(mask_files.len() - failure.len()),
            ut::track::thousands_format(mask_files.len()),
            output.display()
        ),
        args.verbose,
    );
}

fn colorize_one(
    path: &Path,
    output: &Path,
    palette: &Palette,
    policy: RemapPolicy,
) -> Result<(), SegprepError> {
    let mask = ClassMask::open(path)?;
    let colored = mask.colorize(palette, policy)?;

    let name = path
        .file_name()
        .ok_or_else(|| SegprepError::NoFileError(path.display().to_string()))?;

    let destination = output.join(name);

    colored
        .save(&destination)
        .map_err(|_| SegprepError::MaskWriteError(destination.display().to_string()))
}
