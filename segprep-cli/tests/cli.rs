// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma, Rgb, RgbImage};
use predicates::prelude::*;

fn write_mask<P: AsRef<Path>>(path: P, width: u32, height: u32, fill: impl Fn(u32, u32) -> u8) {
    let mask = GrayImage::from_fn(width, height, |x, y| Luma([fill(x, y)]));
    mask.save(path).unwrap();
}

fn write_image<P: AsRef<Path>>(path: P, width: u32, height: u32) {
    let image = RgbImage::from_pixel(width, height, Rgb([180, 120, 160]));
    image.save(path).unwrap();
}

fn segprep() -> Command {
    Command::cargo_bin("segprep").unwrap()
}

#[test]
fn test_split_copies_pairs_into_layout() {
    let dir = tempfile::tempdir().unwrap();

    let tissue = dir.path().join("input").join("lymphocyte");
    std::fs::create_dir_all(&tissue).unwrap();

    for i in 0..5 {
        write_image(tissue.join(format!("tile_{}_HE.png", i)), 4, 4);
        write_mask(tissue.join(format!("tile_{}_mask.png", i)), 4, 4, |_, _| 3);
    }

    // An image without a mask is warned about and skipped
    write_image(tissue.join("tile_9_HE.png"), 4, 4);

    let output = dir.path().join("output");

    segprep()
        .args([
            "split",
            "-i",
            dir.path().join("input").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-p",
            "80",
            "--seed",
            "7",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("unpaired"));

    // floor(5 * 80 / 100) = 4 training pairs, 1 validation pair
    for (subdir, expected) in [
        ("train/source", 4),
        ("train/target", 4),
        ("val/source", 1),
        ("val/target", 1),
    ] {
        let count = std::fs::read_dir(output.join(subdir)).unwrap().count();
        assert_eq!(count, expected, "{}", subdir);
    }

    // Originals survive without --clean
    assert!(tissue.join("tile_0_mask.png").exists());
}

#[test]
fn test_split_clean_removes_originals() {
    let dir = tempfile::tempdir().unwrap();

    let tissue = dir.path().join("input").join("epithelium");
    std::fs::create_dir_all(&tissue).unwrap();

    for i in 0..4 {
        write_image(tissue.join(format!("tile_{}_HE.png", i)), 4, 4);
        write_mask(tissue.join(format!("tile_{}_mask.png", i)), 4, 4, |_, _| 1);
    }

    let output = dir.path().join("output");

    segprep()
        .args([
            "split",
            "-i",
            dir.path().join("input").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-p",
            "50",
            "--seed",
            "1",
            "--clean",
        ])
        .assert()
        .success();

    for i in 0..4 {
        assert!(!tissue.join(format!("tile_{}_mask.png", i)).exists());
        assert!(!tissue.join(format!("tile_{}_HE.png", i)).exists());
    }
}

#[test]
fn test_split_rejects_percentage_over_100() {
    let dir = tempfile::tempdir().unwrap();

    let tissue = dir.path().join("input").join("epithelium");
    std::fs::create_dir_all(&tissue).unwrap();

    write_image(tissue.join("tile_0_HE.png"), 4, 4);
    write_mask(tissue.join("tile_0_mask.png"), 4, 4, |_, _| 1);

    segprep()
        .args([
            "split",
            "-i",
            dir.path().join("input").to_str().unwrap(),
            "-o",
            dir.path().join("output").to_str().unwrap(),
            "-p",
            "101",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Percentage"));
}

#[test]
fn test_split_skips_duplicate_identifiers_across_tissues() {
    let dir = tempfile::tempdir().unwrap();

    // The same filenames in two tissue directories would collide in the
    // flat output layout
    for tissue in ["epithelium", "lymphocyte"] {
        let tissue = dir.path().join("input").join(tissue);
        std::fs::create_dir_all(&tissue).unwrap();

        write_image(tissue.join("tile_0_HE.png"), 4, 4);
        write_mask(tissue.join("tile_0_mask.png"), 4, 4, |_, _| 1);
    }

    let output = dir.path().join("output");

    segprep()
        .args([
            "split",
            "-i",
            dir.path().join("input").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-p",
            "100",
            "--seed",
            "3",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("duplicate"));

    // Only one pair survives, the other is warned about and skipped
    let count = std::fs::read_dir(output.join("train/source")).unwrap().count();
    assert_eq!(count, 1);
}

#[test]
fn test_split_fails_on_empty_input() {
    let dir = tempfile::tempdir().unwrap();

    let input = dir.path().join("input");
    std::fs::create_dir_all(&input).unwrap();

    segprep()
        .args([
            "split",
            "-i",
            input.to_str().unwrap(),
            "-o",
            dir.path().join("output").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image and mask pairs"));
}

#[test]
fn test_count_writes_statistics_table() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    // 16 background pixels and 16 lymphocyte pixels across two masks
    write_mask(masks.join("a.png"), 4, 4, |_, _| 0);
    write_mask(masks.join("b.png"), 4, 4, |_, _| 3);

    let output = dir.path().join("statistics.csv");

    segprep()
        .args([
            "count",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).unwrap();

    assert!(contents.starts_with("class_name,pixel_count,percentage"));
    assert!(contents.contains("background,16,50.0"));
    assert!(contents.contains("lymphocyte,16,50.0"));
}

#[test]
fn test_count_fails_on_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    segprep()
        .args([
            "count",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            dir.path().join("statistics.csv").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No mask files"));
}

#[test]
fn test_reduce_remaps_classes() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("a.png"), 2, 2, |x, _| x as u8 + 1);

    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"0": 0, "1": 1, "2": 1}"#).unwrap();

    let output = dir.path().join("reduced");

    segprep()
        .args([
            "reduce",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--mapping",
            mapping.to_str().unwrap(),
        ])
        .assert()
        .success();

    let reduced = image::open(output.join("a.png")).unwrap().into_luma8();
    assert_eq!(reduced.as_raw(), &vec![1u8, 1, 1, 1]);
}

#[test]
fn test_reduce_writes_png_for_lossy_input() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("a.jpg"), 8, 8, |_, _| 0);

    // Codes adjacent to 0 absorb any encoder wobble in the jpg input
    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"0": 1, "1": 1, "2": 1, "3": 1}"#).unwrap();

    let output = dir.path().join("reduced");

    segprep()
        .args([
            "reduce",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--mapping",
            mapping.to_str().unwrap(),
        ])
        .assert()
        .success();

    // A jpg output would re-encode lossily and corrupt the class indices
    assert!(!output.join("a.jpg").exists());

    let reduced = image::open(output.join("a.png")).unwrap().into_luma8();
    assert_eq!(reduced.as_raw(), &vec![1u8; 64]);
}

#[test]
fn test_reduce_skips_out_of_domain_by_default() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("bad.png"), 2, 2, |_, _| 9);

    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"0": 0, "1": 1}"#).unwrap();

    let output = dir.path().join("reduced");

    segprep()
        .args([
            "reduce",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--mapping",
            mapping.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipped mask"));

    assert!(!output.join("bad.png").exists());
}

#[test]
fn test_reduce_clamps_when_requested() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("bad.png"), 2, 2, |_, _| 9);

    let mapping = dir.path().join("mapping.json");
    std::fs::write(&mapping, r#"{"0": 0, "1": 1}"#).unwrap();

    let output = dir.path().join("reduced");

    segprep()
        .args([
            "reduce",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--mapping",
            mapping.to_str().unwrap(),
            "--clamp",
        ])
        .assert()
        .success();

    let reduced = image::open(output.join("bad.png")).unwrap().into_luma8();
    assert_eq!(reduced.as_raw(), &vec![0u8, 0, 0, 0]);
}

#[test]
fn test_colorize_applies_palette() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("a.png"), 2, 1, |x, _| x as u8);

    let output = dir.path().join("colored");

    segprep()
        .args([
            "colorize",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let colored = image::open(output.join("a.png")).unwrap().into_rgb8();

    // Background is black, epithelium is #e6194b
    assert_eq!(colored.get_pixel(0, 0), &Rgb([0, 0, 0]));
    assert_eq!(colored.get_pixel(1, 0), &Rgb([230, 25, 75]));
}

#[test]
fn test_prompt_writes_manifest() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    // Half background, half lymphocyte
    write_mask(masks.join("a.png"), 10, 10, |x, _| if x < 5 { 0 } else { 3 });

    // Effectively empty: 99 of 100 pixels background
    write_mask(masks.join("b.png"), 10, 10, |x, y| {
        if x == 0 && y == 0 { 3 } else { 0 }
    });

    let output = dir.path().join("prompts.json");

    segprep()
        .args([
            "prompt",
            "-m",
            masks.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&contents).unwrap();

    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Scan order is sorted by filename
    assert_eq!(entries[0]["source"], "source/a.png");
    assert_eq!(entries[0]["target"], "target/a.png");
    assert_eq!(entries[0]["prompt"], "pathology image: 50% lymphocyte");

    assert_eq!(entries[1]["prompt"], "pathology image: background");
}

#[test]
fn test_prompt_augmentation_is_seeded() {
    let dir = tempfile::tempdir().unwrap();

    let masks = dir.path().join("masks");
    std::fs::create_dir_all(&masks).unwrap();

    write_mask(masks.join("a.png"), 4, 4, |_, _| 1);

    let run = |output: &Path| {
        segprep()
            .args([
                "prompt",
                "-m",
                masks.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "--augment",
                "--seed",
                "42",
            ])
            .assert()
            .success();

        std::fs::read_to_string(output).unwrap()
    };

    let first = run(&dir.path().join("first.json"));
    let second = run(&dir.path().join("second.json"));

    assert_eq!(first, second);
    assert!(first.contains("Context:"));
}

#[test]
fn test_missing_required_arguments_fail() {
    segprep().arg("count").assert().failure();
    segprep().arg("reduce").assert().failure();
}
