// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use clap::{Parser, Subcommand};
use segprep_cli::{colorize, count, prompt, reduce, split};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Split(split::SplitArgs),
    Count(count::CountArgs),
    Reduce(reduce::ReduceArgs),
    Colorize(colorize::ColorizeArgs),
    Prompt(prompt::PromptArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Split(split_args)) => split::split_dataset(split_args),
        Some(Commands::Count(count_args)) => count::count_pixel_classes(count_args),
        Some(Commands::Reduce(reduce_args)) => reduce::reduce_mask_classes(reduce_args),
        Some(Commands::Colorize(colorize_args)) => colorize::colorize_masks(colorize_args),
        Some(Commands::Prompt(prompt_args)) => prompt::generate_prompts(prompt_args),
        None => {}
    }
}
