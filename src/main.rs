//! Blogless - a terminal reader for static markdown blogs.
//!
//! # Usage
//!
//! ```bash
//! blogless https://blog.example.net
//! blogless --theme dark https://blog.example.net
//! blogless --manifest assets/index.json http://localhost:8000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use reqwest::Url;

use blogless::app::{App, DEFAULT_MANIFEST_PATH};
use blogless::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use blogless::fetch::Fetcher;
use blogless::perf;
use blogless::ui::style::{ColorMode, set_color_mode};

/// A terminal reader for static markdown blogs
#[derive(Parser, Debug)]
#[command(name = "blogless", version, about, long_about = None)]
struct Cli {
    /// Root URL of the blog site (serves the manifest and posts)
    #[arg(value_name = "URL")]
    site: String,

    /// Manifest path relative to the site root
    #[arg(long, value_name = "PATH")]
    manifest: Option<String>,

    /// Force the color theme (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed event logs to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Ask the terminal for its background color and classify it, falling
/// back to the `COLORFGBG` hint some terminals export. `None` when the
/// terminal stays silent.
fn detect_theme() -> Option<ColorMode> {
    let _raw = enable_raw_mode();
    let reported = query_background_via_osc11();
    let _ = disable_raw_mode();
    reported.or_else(theme_from_colorfgbg)
}

// OSC 11 goes to /dev/tty so the terminal answers even when stdout is
// piped. Skipped on non-Unix platforms: the stdin fallback leaves an
// orphaned reader thread that blocks the console input buffer.
#[cfg(not(unix))]
fn query_background_via_osc11() -> Option<ColorMode> {
    None
}

#[cfg(unix)]
fn query_background_via_osc11() -> Option<ColorMode> {
    use std::io::{Read, Write};
    use std::sync::mpsc;

    let mut tty = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")
        .ok()?;
    let mut reply_source = tty.try_clone().ok()?;

    // OSC 11 query: ESC ] 11 ; ? BEL
    tty.write_all(b"\x1b]11;?\x07").ok()?;
    tty.flush().ok()?;

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut raw: Vec<u8> = Vec::new();
        let mut chunk = [0u8; 64];
        loop {
            match reply_source.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    raw.extend_from_slice(&chunk[..n]);
                    // Replies end with BEL or ST (ESC \).
                    if raw.contains(&0x07) || raw.windows(2).any(|w| w == b"\x1b\\") {
                        let reply = String::from_utf8_lossy(&raw);
                        let _ = tx.send(classify_osc11_reply(&reply));
                        break;
                    }
                }
            }
        }
    });

    rx.recv_timeout(Duration::from_millis(75)).ok().flatten()
}

/// Parse `rgb:RRRR/GGGG/BBBB` out of an OSC 11 reply and classify the
/// color by perceived luminance.
fn classify_osc11_reply(reply: &str) -> Option<ColorMode> {
    let channels = reply.split_once("rgb:")?.1;
    let mut parts = channels.split(|c: char| c == '/' || c.is_control());
    let r = parse_osc_channel(parts.next()?)?;
    let g = parse_osc_channel(parts.next()?)?;
    let b = parse_osc_channel(parts.next()?)?;
    let luma = 0.2126f32
        .mul_add(f32::from(r), 0.7152f32.mul_add(f32::from(g), 0.0722 * f32::from(b)));
    Some(if luma >= 140.0 {
        ColorMode::Light
    } else {
        ColorMode::Dark
    })
}

/// One OSC color channel: either 2 or 4+ hex digits; wide values keep
/// their high byte.
fn parse_osc_channel(raw: &str) -> Option<u8> {
    let hex = raw.trim();
    match hex.len() {
        2 => u8::from_str_radix(hex, 16).ok(),
        n if n >= 4 => {
            let wide = u16::from_str_radix(&hex[..4], 16).ok()?;
            Some((wide >> 8) as u8)
        }
        _ => None,
    }
}

/// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); low background
/// indices are the dark ANSI colors.
fn theme_from_colorfgbg() -> Option<ColorMode> {
    let value = std::env::var("COLORFGBG").ok()?;
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(if bg <= 6 || bg == 8 {
        ColorMode::Dark
    } else {
        ColorMode::Light
    })
}

/// Parse the site argument into a base URL with a trailing slash, so
/// manifest-relative paths resolve under it rather than beside it.
fn parse_site_url(raw: &str) -> Result<Url> {
    let parsed = Url::parse(raw).or_else(|_| Url::parse(&format!("https://{raw}")));
    let mut url = parsed.with_context(|| format!("Invalid site URL: {raw}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("BLOGLESS_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize debug log {}: {}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    // The saved preference wins; otherwise follow the terminal's
    // reported background, defaulting to dark when it stays silent.
    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_color_mode(detect_theme().unwrap_or(ColorMode::Dark)),
        ThemeMode::Light => set_color_mode(ColorMode::Light),
        ThemeMode::Dark => set_color_mode(ColorMode::Dark),
    }

    let site = parse_site_url(&cli.site)?;
    let fetcher = Fetcher::new(site).context("Failed to build HTTP client")?;

    let mut app = App::new(fetcher)
        .with_manifest_path(
            effective
                .manifest
                .unwrap_or_else(|| DEFAULT_MANIFEST_PATH.to_string()),
        )
        .with_config_path(Some(global_path));

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_osc11_reply_wide_channels() {
        // xterm-style reply for a near-white background
        let reply = "\x1b]11;rgb:ffff/fafa/f0f0\x07";
        assert_eq!(classify_osc11_reply(reply), Some(ColorMode::Light));

        let dark = "\x1b]11;rgb:1e1e/1e1e/2e2e\x1b\\";
        assert_eq!(classify_osc11_reply(dark), Some(ColorMode::Dark));
    }

    #[test]
    fn test_classify_osc11_reply_rejects_garbage() {
        assert_eq!(classify_osc11_reply("no color here"), None);
        assert_eq!(classify_osc11_reply("rgb:zz/zz/zz"), None);
    }

    #[test]
    fn test_parse_osc_channel_lengths() {
        assert_eq!(parse_osc_channel("ff"), Some(0xff));
        assert_eq!(parse_osc_channel("ffff"), Some(0xff));
        assert_eq!(parse_osc_channel("1e1e"), Some(0x1e));
        assert_eq!(parse_osc_channel("f"), None);
    }

    #[test]
    fn test_parse_site_url_normalizes() {
        assert_eq!(
            parse_site_url("https://blog.example.net").unwrap().as_str(),
            "https://blog.example.net/"
        );
        assert_eq!(
            parse_site_url("blog.example.net/notes").unwrap().as_str(),
            "https://blog.example.net/notes/"
        );
    }
}
