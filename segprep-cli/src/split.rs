// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use segprep_core::constant;
use segprep_core::split::split_at_percentage;
use segprep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Split tissue-type image/mask pairs into train and validation sets.")]
pub struct SplitArgs {
    #[arg(
        short = 'i',
        long,
        help = "Input directory holding one subdirectory per tissue type.",
        required = true
    )]
    pub input: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output directory for the train/val layout.",
        required = true
    )]
    pub output: Option<String>,

    #[arg(
        short = 'p',
        long,
        help = "Percentage of pairs assigned to training, in [0, 100].",
        default_value = "80"
    )]
    pub percentage: Option<u8>,

    #[arg(long, help = "Seed for the shuffle.")]
    pub seed: Option<u64>,

    #[arg(
        long,
        help = "Substring specifying images (e.g. _HE).",
        default_value = "_HE"
    )]
    pub image_substring: Option<String>,

    #[arg(
        long,
        help = "Substring specifying masks (e.g. _mask).",
        default_value = "_mask"
    )]
    pub mask_substring: Option<String>,

    #[arg(long, help = "Remove original pairs after a verified copy.")]
    pub clean: bool,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn split_dataset(args: &SplitArgs) {
    let percentage = args.percentage.unwrap_or(80);

    if percentage > 100 {
        eprintln!("[segprep::split] ERROR: Percentage must be an integer in [0, 100].");
        std::process::exit(1);
    }

    if args.image_substring == args.mask_substring {
        eprintln!(
            "[segprep::split] ERROR: Image and mask substrings must differ to distinguish pairs."
        );
        std::process::exit(1);
    }

    let input = PathBuf::from(args.input.to_owned().unwrap());

    if !input.is_dir() {
        eprintln!(
            "[segprep::split] ERROR: Input directory does not exist: {}.",
            input.display()
        );
        std::process::exit(1);
    }

    let mut tissue_dirs = ut::path::collect_subdirectories(&input).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    // A flat directory of pairs is treated as a single tissue type
    if tissue_dirs.is_empty() {
        tissue_dirs.push(input.clone());
    }

    let mut pairs: Vec<(String, PathBuf, PathBuf)> = Vec::new();
    let mut unpaired = 0;

    for tissue_dir in &tissue_dirs {
        let images = ut::path::collect_file_paths(
            tissue_dir,
            constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
            args.image_substring.to_owned(),
        )
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

        let masks = ut::path::collect_file_paths(
            tissue_dir,
            constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
            args.mask_substring.to_owned(),
        )
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

        let paired = ut::path::pair_files(
            &images,
            &masks,
            args.image_substring.to_owned(),
            args.mask_substring.to_owned(),
        );

        for file in &paired.unpaired {
            eprintln!(
                "[segprep::split] WARNING: Skipping unpaired file {}.",
                file.display()
            );
        }

        unpaired += paired.unpaired.len();
        pairs.extend(paired.pairs);
    }

    // The output layout is flat, so a pair identifier repeated across tissue
    // directories would overwrite another pair's files during the copy
    let mut seen: HashSet<String> = HashSet::with_capacity(pairs.len());

    pairs.retain(|(id, _, _)| {
        if seen.insert(id.clone()) {
            return true;
        }

        eprintln!(
            "[segprep::split] WARNING: Skipping duplicate pair identifier {}.",
            id
        );

        false
    });

    if pairs.is_empty() {
        eprintln!(
            "[segprep::split] ERROR: No image and mask pairs were detected. Please check your path and/or substring identifiers."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} image and mask pairs across {} tissue directories ({} unpaired).",
            ut::track::thousands_format(pairs.len()),
            tissue_dirs.len(),
            unpaired
        ),
        args.verbose,
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let total = pairs.len();
    let (train, val) = split_at_percentage(pairs, percentage, &mut rng);

    ut::track::progress_log(
        &format!(
            "Assigned {} pairs to train and {} to val ({}%).",
            ut::track::thousands_format(train.len()),
            ut::track::thousands_format(val.len()),
            percentage
        ),
        args.verbose,
    );

    let output = PathBuf::from(args.output.to_owned().unwrap());

    for subdir in constant::SPLIT_SUBDIRS {
        ut::path::ensure_directory(output.join(subdir)).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });
    }

    let assignments: Vec<(&str, &(String, PathBuf, PathBuf))> = train
        .iter()
        .map(|pair| ("train", pair))
        .chain(val.iter().map(|pair| ("val", pair)))
        .collect();

    let pb = ut::track::progress_bar(assignments.len(), "Copying", args.verbose);

    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..assignments.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let (subset, (id, image, mask)) = assignments[idx];

            let run = copy_pair(&output, subset, image, mask);

            if let Err(err) = run {
                failure.lock().unwrap().push(format!("{}\t{}", id, err));
            }
        });

    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    for line in &failure {
        eprintln!("[segprep::split] WARNING: Failed to copy pair {}.", line);
    }

    ut::track::progress_log(
        &format!(
            "Complete. Copied {} of {} pairs into {}.",
            ut::track::thousands_format(assignments.len() - failure.len()),
            ut::track::thousands_format(total),
            output.display()
        ),
        args.verbose,
    );

    if args.clean {
        clean_originals(&output, &train, &val, !failure.is_empty(), args.verbose);
    }
}

fn copy_pair(
    output: &PathBuf,
    subset: &str,
    image: &PathBuf,
    mask: &PathBuf,
) -> Result<(), std::io::Error> {
    let image_name = image.file_name().unwrap_or_default();
    let mask_name = mask.file_name().unwrap_or_default();

    std::fs::copy(mask, output.join(subset).join("source").join(mask_name))?;
    std::fs::copy(image, output.join(subset).join("target").join(image_name))?;

    Ok(())
}

/// Remove original pairs, but only once all four output directories are
/// verified non-empty and every copy succeeded
fn clean_originals(
    output: &PathBuf,
    train: &[(String, PathBuf, PathBuf)],
    val: &[(String, PathBuf, PathBuf)],
    had_failures: bool,
    verbose: bool,
) {
    if had_failures {
        eprintln!(
            "[segprep::split] WARNING: Skipping cleanup because some pairs failed to copy."
        );
        return;
    }

    for subdir in constant::SPLIT_SUBDIRS {
        let populated = std::fs::read_dir(output.join(subdir))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);

        if !populated {
            eprintln!(
                "[segprep::split] WARNING: Skipping cleanup because {} is empty.",
                output.join(subdir).display()
            );
            return;
        }
    }

    let mut removed = 0;

    for (_, image, mask) in train.iter().chain(val.iter()) {
        if std::fs::remove_file(image).is_ok() {
            removed += 1;
        }

        if std::fs::remove_file(mask).is_ok() {
            removed += 1;
        }
    }

    ut::track::progress_log(
        &format!(
            "Cleanup removed {} original files.",
            ut::track::thousands_format(removed)
        ),
        verbose,
    );
}
