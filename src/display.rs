use crate::cli::Args;
use anyhow::{Context, Result, anyhow};
use std::io::{IsTerminal, Write};
use std::path::Path;
use viuer::{Config as ViuerConfig, print};

const DEFAULT_PREVIEW_WIDTH: u32 = 24;

/// Terminal cell size for the preview; width wins when both are given
#[must_use]
pub fn preview_size(width: Option<u32>, height: Option<u32>) -> (Option<u32>, Option<u32>) {
    match (width, height) {
        (Some(w), ..) => (Some(w), None),
        (None, Some(h)) => (None, Some(h)),
        (None, None) => (Some(DEFAULT_PREVIEW_WIDTH), None),
    }
}

/// Render a written PNG in the terminal
pub fn print_image(path: &Path, args: &Args) -> Result<()> {
    let image = image::open(path).with_context(|| format!("Failed to reopen {}", path.display()))?;
    let is_tty = std::io::stdout().is_terminal();
    let (width, height) = preview_size(args.width, args.height);

    let config = ViuerConfig {
        width,
        height,
        absolute_offset: false,
        use_kitty: is_tty,
        use_iterm: is_tty,
        use_sixel: is_tty,
        ..Default::default()
    };

    std::io::stdout()
        .flush()
        .map_err(|e| anyhow!("Failed to flush stdout: {e}"))?;

    print(&image, &config).map_err(|e| anyhow!("Failed to display image: {e}"))?;

    Ok(())
}
