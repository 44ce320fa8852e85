// A small CLI utility to download known pronunciation dictionary files into a
// target directory.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dict-downloader")]
#[command(about = "Download pronunciation dictionaries for Phonoscribe", long_about = None)]
struct Args {
    /// List supported dictionary names and exit.
    #[arg(long)]
    list: bool,

    /// Dictionary name (examples: cmudict-0.7b, cmudict-lower)
    ///
    /// We intentionally keep an allowlist of known-good artifacts.
    #[arg(long, required_unless_present = "list")]
    name: Option<String>,

    /// Target directory to store dictionaries (created if missing).
    #[arg(long, default_value = "./data")]
    dir: PathBuf,
}

/// Download source for a known dictionary artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DictSpec {
    /// Friendly name users type (e.g. "cmudict-0.7b").
    name: &'static str,

    /// Filename written to disk.
    filename: &'static str,

    /// Full download URL.
    url: &'static str,
}

// -----------------------------------------------------------------------------
// Known dictionaries (allowlist)
//
// The 0.7b artifact is the classic uppercase release with `;;;` comments; the
// lowercase variant is the maintained cmusphinx file. The engine parses both.
// -----------------------------------------------------------------------------
static DICTIONARIES: &[DictSpec] = &[
    DictSpec {
        name: "cmudict-0.7b",
        filename: "cmudict-0.7b",
        url: "https://raw.githubusercontent.com/Alexir/CMUdict/master/cmudict-0.7b",
    },
    DictSpec {
        name: "cmudict-0.7a",
        filename: "cmudict-0.7a",
        url: "https://raw.githubusercontent.com/Alexir/CMUdict/master/cmudict-0.7a",
    },
    DictSpec {
        name: "cmudict-lower",
        filename: "cmudict.dict",
        url: "https://raw.githubusercontent.com/cmusphinx/cmudict/master/cmudict.dict",
    },
];

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        print_dict_list();
        return Ok(());
    }

    let name = args.name.as_deref().expect("clap should require --name");

    fs::create_dir_all(&args.dir)
        .with_context(|| format!("failed to create target dir: {}", args.dir.display()))?;

    let spec = lookup_dict(name).with_context(|| {
        format!("unknown dictionary '{name}'. Run with --list to see supported names.")
    })?;

    let dest_path = args.dir.join(spec.filename);

    if dest_path.exists() {
        println!("✅ already exists: {}", dest_path.display());
        return Ok(());
    }

    println!("⬇️  downloading {}", spec.filename);
    println!("    {}", spec.url);

    let client = Client::builder()
        .user_agent("phonoscribe-dict-downloader")
        .build()
        .context("failed to build HTTP client")?;

    download_to_path(&client, spec.url, &dest_path)?;

    println!("✅ saved: {}", dest_path.display());
    Ok(())
}

fn lookup_dict(name: &str) -> Option<&'static DictSpec> {
    DICTIONARIES.iter().find(|d| d.name == name)
}

fn print_dict_list() {
    print!("{}", dict_list_string());
}

fn dict_list_string() -> String {
    let mut out = String::new();

    out.push_str("Pronunciation dictionaries:\n");
    for d in DICTIONARIES {
        out.push_str("  - ");
        out.push_str(d.name);
        out.push('\n');
    }

    out
}

/// Download a URL into `dest_path` safely:
/// - download to `dest_path.part`
/// - fsync + rename to final path
fn download_to_path(client: &Client, url: &str, dest_path: &Path) -> Result<()> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("download failed (bad status): {url}"))?;

    let total = resp.content_length();
    download_to_path_with_reader(resp, total, dest_path)
}

fn download_to_path_with_reader<R: Read>(
    mut reader: R,
    total_bytes: Option<u64>,
    dest_path: &Path,
) -> Result<()> {
    let total = total_bytes.unwrap_or(0);

    let pb = if total > 0 {
        ProgressBar::new(total)
    } else {
        ProgressBar::new_spinner()
    };

    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {bytes}/{total_bytes} {bar:40.cyan/blue} {eta}",
        )
        .unwrap()
        .progress_chars("#>-"),
    );

    let tmp_path = PathBuf::from(format!("{}.part", dest_path.display()));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            pb.inc(n as u64);
        }

        file.sync_all()?;
        pb.finish_and_clear();

        fs::rename(&tmp_path, dest_path)
            .with_context(|| format!("failed to move into place: {}", dest_path.display()))?;

        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
        pb.finish_and_clear();
    }

    result
}
