#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually, like the rest of the workspace's binaries.
//! Supports environment variable overrides via the `RAY_DEMO_*` prefix;
//! explicit flags win over the environment.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
RayActive demo: a reactive name/age card driven by clicks

USAGE:
    rayactive-demo [OPTIONS]

OPTIONS:
    --root-id=ID     Element the view mounts on (default: root)
    --ids=KIND       Binding ids: 'random' or 'sequential' (default: sequential)
    --clicks=N       Clicks to dispatch on the button (default: 1)
    --json           Print the data as JSON after every step
    --help, -h       Show this help message
    --version, -V    Show version

ENVIRONMENT VARIABLES:
    RAY_DEMO_ROOT_ID   Override --root-id
    RAY_DEMO_IDS       Override --ids (random|sequential)
    RAY_DEMO_CLICKS    Override --clicks
    RAY_DEMO_JSON      Override --json (1/true to enable)
    RUST_LOG           Log filter, e.g. rayactive=debug";

/// Binding id flavour requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ids {
    Random,
    Sequential,
}

impl Ids {
    fn parse(val: &str) -> Option<Self> {
        match val {
            "random" => Some(Self::Random),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Id of the mount element.
    pub root_id: String,
    pub ids: Ids,
    /// Number of click events to dispatch after mounting.
    pub clicks: u32,
    /// Print a JSON snapshot of the data after every step.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            root_id: "root".into(),
            ids: Ids::Sequential,
            clicks: 1,
            json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse `std::env::args` and `RAY_DEMO_*` variables.
    pub fn parse() -> Result<Parsed, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse_from(&args, |key| std::env::var(key).ok())
    }

    pub fn parse_from(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Parsed, String> {
        let mut opts = Self::default();

        // Environment first
        if let Some(val) = env("RAY_DEMO_ROOT_ID")
            && !val.is_empty()
        {
            opts.root_id = val;
        }
        if let Some(val) = env("RAY_DEMO_IDS")
            && let Some(ids) = Ids::parse(&val)
        {
            opts.ids = ids;
        }
        if let Some(val) = env("RAY_DEMO_CLICKS")
            && let Ok(n) = val.parse()
        {
            opts.clicks = n;
        }
        if let Some(val) = env("RAY_DEMO_JSON") {
            opts.json = val == "1" || val.eq_ignore_ascii_case("true");
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--json" => opts.json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--root-id=") {
                        if val.is_empty() {
                            return Err("--root-id must not be empty".into());
                        }
                        opts.root_id = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--ids=") {
                        opts.ids = Ids::parse(val)
                            .ok_or_else(|| format!("Invalid --ids value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--clicks=") {
                        opts.clicks = val
                            .parse()
                            .map_err(|_| format!("Invalid --clicks value: {val}"))?;
                    } else {
                        return Err(format!(
                            "Unknown argument: {other}\nRun with --help for usage information."
                        ));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}

pub fn version_line() -> String {
    format!("rayactive-demo {VERSION}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
