// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use rand::Rng;
use rand::seq::SliceRandom;

use crate::class::ClassTable;
use crate::constant;
use crate::error::SegprepError;
use crate::tally::ClassHistogram;

/// Thresholds and template controlling prompt synthesis
///
/// `empty_mask_threshold` is a fraction in [0, 1]: an image whose background
/// class holds at least this fraction of pixels is described with the fixed
/// empty text. `min_class_percentage` is in percent: classes below it are
/// left out of the description.
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub template: String,
    pub empty_mask_threshold: f64,
    pub min_class_percentage: f64,
}

impl Default for PromptOptions {
    fn default() -> PromptOptions {
        PromptOptions {
            template: constant::DEFAULT_PROMPT_TEMPLATE.to_string(),
            empty_mask_threshold: constant::DEFAULT_EMPTY_MASK_THRESHOLD,
            min_class_percentage: constant::DEFAULT_MIN_CLASS_PERCENTAGE,
        }
    }
}

impl PromptOptions {
    pub fn validate(&self) -> Result<(), SegprepError> {
        if !self.template.contains(constant::PROMPT_PLACEHOLDER) {
            return Err(SegprepError::TemplateError(format!(
                "Template must contain the {} placeholder",
                constant::PROMPT_PLACEHOLDER
            )));
        }

        if !(0.0..=1.0).contains(&self.empty_mask_threshold) {
            return Err(SegprepError::TemplateError(
                "empty_mask_threshold must be a fraction in [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

/// Format a percentage with up to two decimals, trailing zeros trimmed
pub fn format_percentage(percentage: f64) -> String {
    let formatted = format!("{:.2}", percentage);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    format!("{}%", trimmed)
}

/// Render a natural-language description of a mask's class composition
///
/// Classes at or above `min_class_percentage` (background excluded) are
/// rendered as `<pct>% <name>` fragments, ordered by descending percentage
/// with ties broken by original class index, joined with commas, and
/// substituted into the template. Masks that are background at or above
/// `empty_mask_threshold`, or with no class passing the filter, receive the
/// fixed empty description instead.
///
/// # Examples
///
/// ```
/// use segprep_core::class::ClassTable;
/// use segprep_core::im::ClassMask;
/// use segprep_core::prompt::{PromptOptions, render_prompt};
/// use segprep_core::tally::ClassHistogram;
///
/// let mask = ClassMask::new(10, 10, vec![3u8; 100]).unwrap();
/// let histogram = ClassHistogram::from_mask(&mask, 9).unwrap();
///
/// let prompt = render_prompt(&histogram, &ClassTable::segpath(), &PromptOptions::default());
/// assert_eq!(prompt, "pathology image: 100% lymphocyte");
/// ```
pub fn render_prompt(
    histogram: &ClassHistogram,
    table: &ClassTable,
    options: &PromptOptions,
) -> String {
    let descriptions = if histogram.fraction(0) >= options.empty_mask_threshold {
        constant::EMPTY_MASK_DESCRIPTION.to_string()
    } else {
        let percentages = histogram.percentages();

        let mut selected: Vec<(usize, f64)> = percentages
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &percentage)| percentage >= options.min_class_percentage)
            .map(|(index, &percentage)| (index, percentage))
            .collect();

        // Stable sort keeps ties in original class-index order
        selected.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        if selected.is_empty() {
            constant::EMPTY_MASK_DESCRIPTION.to_string()
        } else {
            selected
                .iter()
                .map(|&(index, percentage)| {
                    let name = table
                        .name(index as u8)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("class {}", index));

                    format!("{} {}", format_percentage(percentage), name)
                })
                .collect::<Vec<String>>()
                .join(", ")
        }
    };

    options
        .template
        .replace(constant::PROMPT_PLACEHOLDER, &descriptions)
}

/// Optional wording perturbation appending a dataset-context sentence
///
/// The generator is threaded through the call explicitly so callers control
/// seeding: per-image seeds when a global seed is set, entropy otherwise.
#[derive(Debug, Clone)]
pub struct PromptAugmenter {
    contexts: Vec<String>,
    max_words: usize,
}

impl PromptAugmenter {
    pub fn new<S: AsRef<str>>(contexts: &[S], max_words: usize) -> PromptAugmenter {
        PromptAugmenter {
            contexts: contexts
                .iter()
                .map(|context| context.as_ref().to_string())
                .collect(),
            max_words,
        }
    }

    /// The built-in SegPath context sentences
    pub fn segpath() -> PromptAugmenter {
        PromptAugmenter::new(&constant::AUGMENT_CONTEXTS, constant::AUGMENT_MAX_WORDS)
    }

    /// Append a randomly chosen context sentence to short prompts
    ///
    /// Prompts already at or above the word cap pass through unchanged.
    pub fn augment<R: Rng>(&self, prompt: &str, rng: &mut R) -> String {
        if prompt.split_whitespace().count() >= self.max_words {
            return prompt.to_string();
        }

        match self.contexts.choose(rng) {
            Some(context) => format!("{}\nContext: {}", prompt, context),
            None => prompt.to_string(),
        }
    }
}
