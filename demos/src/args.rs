use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::demos::DemoKind;

#[derive(Debug, Parser)]
#[command(about = "Small OpenGL shader demos")]
pub struct Args {
    /// Demo to run
    #[arg(value_enum, default_value_t = DemoArg::Simple)]
    pub demo: DemoArg,
    /// Window width, overrides the config file
    #[arg(long)]
    pub width: Option<u32>,
    /// Window height, overrides the config file
    #[arg(long)]
    pub height: Option<u32>,
    /// Disable vertical sync
    #[arg(long)]
    pub no_vsync: bool,
    /// TOML file with window and logging settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Log filter in env_logger syntax, e.g. "debug" or "gl_wrapper=debug"
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoArg {
    HelloWorld,
    SimpleShader,
    Simple,
    ElementArray,
    ColoredTriangle,
    UniformArray,
}

impl From<DemoArg> for DemoKind {
    fn from(d: DemoArg) -> Self {
        match d {
            DemoArg::HelloWorld => Self::HelloWorld,
            DemoArg::SimpleShader => Self::SimpleShader,
            DemoArg::Simple => Self::Simple,
            DemoArg::ElementArray => Self::ElementArray,
            DemoArg::ColoredTriangle => Self::ColoredTriangle,
            DemoArg::UniformArray => Self::UniformArray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_demo_and_overrides() {
        let args = Args::try_parse_from([
            "shader-demos",
            "uniform-array",
            "--width",
            "640",
            "--no-vsync",
            "--log",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.demo, DemoArg::UniformArray);
        assert_eq!(args.width, Some(640));
        assert_eq!(args.height, None);
        assert!(args.no_vsync);
        assert_eq!(args.log.as_deref(), Some("debug"));
    }

    #[test]
    fn defaults_to_simple() {
        let args = Args::try_parse_from(["shader-demos"]).unwrap();
        assert_eq!(args.demo, DemoArg::Simple);
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_demo() {
        assert!(Args::try_parse_from(["shader-demos", "teapot"]).is_err());
    }
}
