//! Runs the shnwave binary against generated files

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use shnwave_core::{CD_BLOCK_SIZE, WaveInfo, build_canonical_header};

fn shnwave(config_home: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shnwave"));
    cmd.args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    cmd
}

fn run(config_home: &Path, args: &[&str]) -> Output {
    shnwave(config_home, args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn cd_file(dir: &Path, name: &str, data_size: usize) -> PathBuf {
    let info = WaveInfo {
        wave_format: 1,
        channels: 2,
        samples_per_sec: 44100,
        avg_bytes_per_sec: 176400,
        block_align: 4,
        bits_per_sample: 16,
        data_size: data_size as u64,
        chunk_size: 36 + data_size as u64,
        ..Default::default()
    };
    let mut bytes = build_canonical_header(&info).unwrap().to_vec();
    bytes.resize(44 + data_size, 0);
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_len_lists_files_and_totals() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 176400 * 5);
    let b = cd_file(dir.path(), "b.wav", 1000);

    let output = run(dir.path(), &["len", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "    length     expanded size   cdr  WAVE problems filename");
    assert!(lines[1].starts_with("     0:05.00 "));
    assert!(lines[1].contains("    ---   --   -----   "));
    assert!(lines[2].contains("    -bs   --   -----   "));
    assert!(lines[3].contains("(totals for 2 files, 1.0000 overall compression ratio)"));
}

#[test]
fn test_len_skips_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = cd_file(dir.path(), "good.wav", 2352);
    let bad = dir.path().join("bad.wav");
    fs::write(&bad, b"RIFF\x04\0\0\0AVI ").unwrap();

    let output = run(dir.path(), &["len", "-u", "kb", bad.to_str().unwrap(), good.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("(total for 1 file,"));
    assert!(stdout(&output).contains(" KB "));
    assert!(stderr(&output).contains("missing WAVE tag"));
}

#[test]
fn test_file_names_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 2352);

    let mut child = shnwave(dir.path(), &["len"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(format!("{}\n", a.display()).as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("a.wav"));
    assert!(stdout(&output).contains("(total for 1 file,"));
}

#[test]
fn test_info_report() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 1001);

    let output = run(dir.path(), &["info", a.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("handled by:                   wav format module"));
    assert!(text.contains("  sector misalignment:        1001 bytes"));
    assert!(text.contains("  data chunk block-aligned:   no"));
    assert!(text.contains("  odd data size has pad byte: no"));
}

#[test]
fn test_pad_and_preview() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 1000);
    let padded = dir.path().join("a-prepadded.wav");

    let output = run(dir.path(), &["pad", "--prepad", "--preview", a.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("would be pre-padded"));
    assert!(stdout(&output).contains("with 1352 zero-bytes."));
    assert!(!padded.exists());

    let output = run(dir.path(), &["pad", "--prepad", a.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("done."));
    assert_eq!(fs::metadata(&padded).unwrap().len(), 44 + CD_BLOCK_SIZE);
}

#[test]
fn test_pad_skips_aligned_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 2352);

    let output = run(dir.path(), &["pad", a.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("already sector-aligned"));
    assert!(!dir.path().join("a-postpadded.wav").exists());
}

#[test]
fn test_debug_flag_enables_tracing() {
    let dir = tempfile::tempdir().unwrap();
    let a = cd_file(dir.path(), "a.wav", 2352);

    let output = run(dir.path(), &["-D", "len", a.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("parsed WAVE header"));
}

#[test]
fn test_strip_preview_and_write() {
    let dir = tempfile::tempdir().unwrap();
    let list = b"LIST\x04\0\0\0abcd";
    let info = WaveInfo {
        wave_format: 1,
        channels: 2,
        samples_per_sec: 44100,
        avg_bytes_per_sec: 176400,
        block_align: 4,
        bits_per_sample: 16,
        data_size: 2352,
        chunk_size: 36 + 2352 + list.len() as u64,
        ..Default::default()
    };
    let mut bytes = build_canonical_header(&info).unwrap().to_vec();
    bytes.resize(44 + 2352, 0);
    bytes.extend_from_slice(list);
    let input = dir.path().join("a.wav");
    fs::write(&input, bytes).unwrap();
    let stripped = dir.path().join("a-stripped.wav");

    let output = run(dir.path(), &["strip", "-p", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("  - will strip 12 bytes worth of extra RIFF chunk(s)"));
    assert!(!stdout(&output).contains("will rewrite"));
    assert!(!stripped.exists());

    let output = run(dir.path(), &["strip", input.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("done."));
    assert_eq!(fs::metadata(&stripped).unwrap().len(), 44 + 2352);

    let output = run(dir.path(), &["strip", "--keep-header", "--keep-chunks", input.to_str().unwrap()]);
    assert!(!output.status.success());
}
