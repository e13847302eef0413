// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use segprep_core::class::{ClassMap, RemapPolicy};
use segprep_core::constant;
use segprep_core::error::SegprepError;
use segprep_core::im::ClassMask;
use segprep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Remap original mask class indices to a reduced class set.")]
pub struct ReduceArgs {
    #[arg(short = 'm', long, help = "Mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(short = 'o', long, help = "Output directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Class mapping JSON of {\"original\": reduced} entries.",
        required = true
    )]
    pub mapping: Option<String>,

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

pub fn reduce_mask_classes(args: &ReduceArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            eprintln!("[segprep::reduce] ERROR: Threads must be a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let map = ClassMap::open(args.mapping.to_owned().unwrap()).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

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
            "[segprep::reduce] ERROR: No mask files were detected. Please check your path and/or substring identifier."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Reducing {} masks over {} mapped classes ({} reduced).",
            ut::track::thousands_format(mask_files.len()),
            map.domain_size(),
            map.reduced_classes()
        ),
        args.verbose,
    );

    let output = PathBuf::from(args.output.to_owned().unwrap());

    let output = ut::path::ensure_directory(&output).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let pb = ut::track::progress_bar(mask_files.len(), "Reducing", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let path = &mask_files[idx];

            if let Err(err) = reduce_one(path, &output, &map, policy) {
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
        eprintln!("[segprep::reduce] WARNING: Skipped mask {}.", line);
    }

    ut::track::progress_log(
        &format!(
            "Complete. Reduced {} of {} masks into {}.",
            ut::track::thousands_format(mask_files.len() - failure.len()),
            ut::track::thousands_format(mask_files.len()),
            output.display()
        ),
        args.verbose,
    );
}

fn reduce_one(
    path: &Path,
    output: &Path,
    map: &ClassMap,
    policy: RemapPolicy,
) -> Result<(), SegprepError> {
    let mask = ClassMask::open(path)?;
    let reduced = mask.remap(map, policy)?;

    let name = path
        .file_name()
        .ok_or_else(|| SegprepError::NoFileError(path.display().to_string()))?;

    // Always write PNG: a lossy encoder (e.g. jpg input kept as jpg output)
    // would perturb the class indices
    reduced.save(output.join(name).with_extension("png"))
}
