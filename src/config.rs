use clap::Parser;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Parser)]
#[command(name = "db-drain")]
#[command(version)]
#[command(
    about = "Delete every user and task from a REST service until both collections are empty",
    long_about = None
)]
pub struct Cli {
    /// Host name of the service to drain
    #[arg(short = 'u', long = "url", env = "DRAIN_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port of the service to drain
    #[arg(short = 'p', long, env = "DRAIN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Give up on a collection after this many non-empty listing passes (default: never)
    #[arg(long, env = "DRAIN_MAX_PASSES", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_passes: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_passes: Option<u64>,
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            max_passes: None,
        }
    }

    pub fn with_max_passes(mut self, max_passes: u64) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// `host:port`, as shown in the completion message
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Line printed once both collections are empty
    pub fn completion_message(&self) -> String {
        format!("All users and tasks removed at {}", self.target())
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.target())
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            host: cli.host,
            port: cli.port,
            max_passes: cli.max_passes,
        }
    }
}
