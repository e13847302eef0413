// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Args;
use kdam::TqdmParallelIterator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use segprep_core::class::ClassTable;
use segprep_core::constant;
use segprep_core::error::SegprepError;
use segprep_core::im::ClassMask;
use segprep_core::io::{ManifestEntry, write_manifest};
use segprep_core::prompt::{PromptAugmenter, PromptOptions, render_prompt};
use segprep_core::tally::ClassHistogram;
use segprep_core::ut;

#[derive(Debug, Args)]
#[command(about = "Generate natural-language prompts describing mask class composition.")]
pub struct PromptArgs {
    #[arg(short = 'm', long, help = "Reduced mask directory.", required = true)]
    pub masks: Option<String>,

    #[arg(
        short = 'o',
        long,
        help = "Output manifest file (.json).",
        required = true
    )]
    pub output: Option<String>,

    #[arg(long, help = "Class name TSV (code <TAB> label). Defaults to the SegPath table.")]
    pub labels: Option<String>,

    #[arg(
        long,
        help = "Prompt template containing the {class_descriptions} placeholder.",
        default_value = constant::DEFAULT_PROMPT_TEMPLATE
    )]
    pub template: Option<String>,

    #[arg(
        long,
        help = "Background fraction in [0, 1] at or above which a mask is described as empty.",
        default_value = "0.98"
    )]
    pub empty_threshold: Option<f64>,

    #[arg(
        long,
        help = "Minimum class percentage included in a description.",
        default_value = "1.0"
    )]
    pub min_percentage: Option<f64>,

    #[arg(
        long,
        help = "Directory prefix written into manifest source paths.",
        default_value = "source"
    )]
    pub source_prefix: Option<String>,

    #[arg(
        long,
        help = "Directory prefix written into manifest target paths.",
        default_value = "target"
    )]
    pub target_prefix: Option<String>,

    #[arg(long, help = "Append a random dataset-context sentence to short prompts.")]
    pub augment: bool,

    #[arg(long, help = "Seed making augmentation reproducible per image.")]
    pub seed: Option<u64>,

    #[arg(long, help = "Substring specifying masks (e.g. _mask).")]
    pub mask_substring: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn generate_prompts(args: &PromptArgs) {
    if let Some(threads) = args.threads {
        if threads < 1 {
            eprintln!("[segprep::prompt] ERROR: Threads must be a positive integer if provided.");
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

    let options = PromptOptions {
        template: args
            .template
            .to_owned()
            .unwrap_or_else(|| constant::DEFAULT_PROMPT_TEMPLATE.to_string()),
        empty_mask_threshold: args
            .empty_threshold
            .unwrap_or(constant::DEFAULT_EMPTY_MASK_THRESHOLD),
        min_class_percentage: args
            .min_percentage
            .unwrap_or(constant::DEFAULT_MIN_CLASS_PERCENTAGE),
    };

    if let Err(err) = options.validate() {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    let output = PathBuf::from(args.output.to_owned().unwrap());

    if output.extension().and_then(|s| s.to_str()) != Some("json") {
        eprintln!("[segprep::prompt] ERROR: Output manifest must end with .json.");
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
            "[segprep::prompt] ERROR: No mask files were detected. Please check your path and/or substring identifier."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Generating prompts for {} masks.",
            ut::track::thousands_format(mask_files.len())
        ),
        args.verbose,
    );

    let source_prefix = args.source_prefix.to_owned().unwrap_or_default();
    let target_prefix = args.target_prefix.to_owned().unwrap_or_default();

    let pb = ut::track::progress_bar(mask_files.len(), "Prompting", args.verbose);

    // Scan-order index travels with each record so the manifest can be
    // assembled in order by a single writer after the parallel fan-out
    let records: Mutex<Vec<(usize, ManifestEntry)>> =
        Mutex::new(Vec::with_capacity(mask_files.len()));
    let failure: Mutex<Vec<String>> = Mutex::new(vec![]);

    (0..mask_files.len())
        .into_par_iter()
        .tqdm_with_bar(pb)
        .for_each(|idx| {
            let path = &mask_files[idx];

            let run = describe_mask(path, &table, &options, &source_prefix, &target_prefix);

            match run {
                Ok(entry) => records.lock().unwrap().push((idx, entry)),
                Err(err) => {
                    failure
                        .lock()
                        .unwrap()
                        .push(format!("{}\t{}", path.display(), err));
                }
            }
        });

    let mut records = records.into_inner().unwrap();
    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    for line in &failure {
        eprintln!("[segprep::prompt] WARNING: Skipped mask {}.", line);
    }

    records.sort_by_key(|&(idx, _)| idx);

    let augmenter = PromptAugmenter::segpath();
    let mut augmented = 0;

    let entries: Vec<ManifestEntry> = records
        .into_iter()
        .map(|(idx, mut entry)| {
            if args.augment {
                let mut rng = match args.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(idx as u64)),
                    None => StdRng::from_entropy(),
                };

                let prompt = augmenter.augment(&entry.prompt, &mut rng);

                if prompt.len() > entry.prompt.len() {
                    augmented += 1;
                }

                entry.prompt = prompt;
            }

            entry
        })
        .collect();

    write_manifest(&output, &entries).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    ut::track::progress_log(
        &format!(
            "Complete. Wrote {} prompts ({} augmented, {} skipped) to {}.",
            ut::track::thousands_format(entries.len()),
            augmented,
            failure.len(),
            output.display()
        ),
        args.verbose,
    );
}

fn describe_mask(
    path: &Path,
    table: &ClassTable,
    options: &PromptOptions,
    source_prefix: &str,
    target_prefix: &str,
) -> Result<ManifestEntry, SegprepError> {
    let mask = ClassMask::open(path)?;
    let histogram = ClassHistogram::from_mask(&mask, table.len())?;

    let prompt = render_prompt(&histogram, table, options);

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SegprepError::NoFileError(path.display().to_string()))?;

    Ok(ManifestEntry {
        source: join_prefix(source_prefix, name),
        target: join_prefix(target_prefix, name),
        prompt,
    })
}

fn join_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), name)
    }
}
