use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// `glyphcloud` - inspect and pick glyph point clouds.
///
/// Point sets are JSON objects with `position`, and optionally `color`,
/// `size`, `glyph`, `orthographic` and `pickId`.
#[derive(Parser, Debug)]
#[command(name = "glyphcloud", version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand point sets and report vertex counts and bounds (no GPU needed).
    Inspect {
        /// Point-set files, or directories searched for `.json` files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Render a point set headlessly and resolve the point under a pixel.
    Pick(PickArgs),
}

#[derive(Args, Debug)]
pub struct PickArgs {
    /// Point-set file to render.
    pub input: PathBuf,

    /// Pixel column, from the left edge.
    #[arg(long)]
    pub x: u32,

    /// Pixel row, from the top edge.
    #[arg(long)]
    pub y: u32,

    /// Width of the offscreen targets in pixels.
    #[arg(long, env = "GLYPHCLOUD_VIEWPORT_WIDTH", default_value_t = 512)]
    pub width: u32,

    /// Height of the offscreen targets in pixels.
    #[arg(long, env = "GLYPHCLOUD_VIEWPORT_HEIGHT", default_value_t = 512)]
    pub height: u32,

    /// Point index to highlight in the draw pass.
    #[arg(long)]
    pub highlight: Option<u32>,

    /// Highlight color as `r,g,b` in 0..=1.
    #[arg(long, value_parser = parse_rgb, default_value = "1,0,0")]
    pub highlight_color: [f32; 3],
}

fn parse_rgb(s: &str) -> Result<[f32; 3], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f32; 3]>::try_from(parts).map_err(|v| format!("expected 3 components, got {}", v.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("1, 0.5,0"), Ok([1.0, 0.5, 0.0]));
        assert!(parse_rgb("1,0").is_err());
        assert!(parse_rgb("a,b,c").is_err());
    }

    #[test]
    fn test_pick_args() {
        let cfg = Config::try_parse_from([
            "glyphcloud", "pick", "points.json", "--x", "3", "--y", "4", "--highlight", "2",
        ])
        .unwrap();
        let Command::Pick(args) = cfg.command else {
            panic!("expected pick");
        };
        assert_eq!((args.x, args.y), (3, 4));
        assert_eq!(args.highlight, Some(2));
        assert_eq!(args.highlight_color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
