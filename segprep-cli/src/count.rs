// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::PathBuf;
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use polars::prelude::*;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use segprep_core::class::ClassTable;
use segprep_core::constant;
use segprep_core::im::ClassMask;
use segprep_core::io;
use segprep_core::tally::ClassHistogram;
use segprep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Count per-class pixel distributions across a directory of masks.")]
pub struct CountArgs {
    #[arg(short = 'm', long, help = "Mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output table file (.csv, .tsv, .txt).",
        required = true
    )]
    pub output: Option<String>,

    #[arg(long, help = "Class name TSV (code <TAB> label). Defaults to the SegPath table.")]
    pub labels: Option<String>,

    #[arg(long, help = "Number of classes. Defaults to the class table size.")]
    pub classes: Option<usize>,

    #[arg(long, help = "Substring specifying masks (e.g. _mask).")]
    pub mask_substring: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn count_pixel_classes(args: &CountArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            eprintln!("[segprep::count] ERROR: Threads must be a positive integer if provided.");
            std::process::exit(1);
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .unwrap();
    }

    let table = match &args.labels {
        Some(labels) => ClassTable::open_tsv(labels).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        }),
        None => ClassTable::segpath(),
    };

    let num_classes = args.classes.unwrap_or(table.len());

    if num_classes == 0 {
        eprintln!("[segprep::count] ERROR: Number of classes must be positive.");
        std::process::exit(1);
    }

    let output = PathBuf::from(args.output.to_owned().unwrap());

    let extension = output
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    if !extension.is_some_and(|ext| constant::SUPPORTED_TABLE_FORMATS.contains(&ext.as_str())) {
        eprintln!(
            "[segprep::count] ERROR: Invalid output extension. Must end with one of: {:?}.",
            constant::SUPPORTED_TABLE_FORMATS
        );
        std::process::exit(1);
    }

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
            "[segprep::count] ERROR: No mask files were detected. Please check your path and/or substring identifier."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} mask files.",
            ut::track::thousands_format(mask_files.len())
        ),
        args.verbose,
    );

    let pb = ut::track::progress_bar(mask_files.len(), "Counting", args.verbose);

    let totals: Mutex<ClassHistogram> = Mutex::new(ClassHistogram::new(num_classes));
    let processed: Mutex<usize> = Mutex::new(0);
    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let path = &mask_files[idx];

            let run = ClassMask::open(path)
                .and_then(|mask| ClassHistogram::from_mask(&mask, num_classes));

            match run {
                Ok(histogram) => {
                    totals.lock().unwrap().merge(&histogram);
                    *processed.lock().unwrap() += 1;
                }
                Err(err) => {
                    failure
                        .lock()
                        .unwrap()
                        .push(format!("{}\t{}", path.display(), err));
                }
            }
        });

    let totals = totals.into_inner().unwrap();
    let processed = processed.into_inner().unwrap();
    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    for line in &failure {
        eprintln!("[segprep::count] WARNING: Skipped mask {}.", line);
    }

    if processed == 0 {
        eprintln!("[segprep::count] ERROR: No masks could be processed.");
        std::process::exit(1);
    }

    let class_names: Vec<String> = (0..num_classes)
        .map(|index| {
            table
                .name(index as u8)
                .map(str::to_string)
                .unwrap_or_else(|| format!("class {}", index))
        })
        .collect();

    let mut df = DataFrame::new(vec![
        Column::new("class_name".into(), &class_names),
        Column::new("pixel_count".into(), totals.counts()),
        Column::new("percentage".into(), totals.percentages()),
    ])
    .unwrap();

    io::write_table(&mut df, &output).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    ut::track::progress_log(
        &format!(
            "Complete. Tallied {} pixels across {} masks into {}.",
            ut::track::thousands_format(totals.total()),
            ut::track::thousands_format(processed),
            output.display()
        ),
        args.verbose,
    );
}
