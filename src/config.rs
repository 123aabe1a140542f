use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use clap::Parser;

/// Serve the comment section of Conduit articles.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Options {
    /// Base URL of the Conduit REST API.
    #[arg(long, env = "CONDUIT_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: String,

    /// Address to serve on.
    #[arg(long, env = "CONDUIT_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Seconds to wait for the API before giving up on a request.
    #[arg(long, env = "CONDUIT_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Number of sessions whose comment lists are kept, least recently used dropped first.
    #[arg(long, env = "CONDUIT_CACHE_VIEWERS", default_value = "1024")]
    pub cache_viewers: NonZeroUsize,

    /// Number of articles whose comment lists are kept per session.
    #[arg(long, env = "CONDUIT_CACHE_LISTS", default_value = "16")]
    pub cache_lists: NonZeroUsize,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short = 'c', long)]
    pub no_color: bool,
}

impl Options {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Options::command().debug_assert();
    }

    #[test]
    fn cache_capacity_must_be_positive() {
        let result = Options::try_parse_from(["conduit-comments", "--cache-lists", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let options = Options::try_parse_from([
            "conduit-comments",
            "--api-url",
            "https://api.example.com/api",
            "--listen",
            "127.0.0.1:8000",
            "--timeout",
            "3",
            "--cache-viewers",
            "50",
            "-v",
        ])
        .unwrap();

        assert_eq!(options.api_url, "https://api.example.com/api");
        assert_eq!(options.listen, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(options.timeout(), Duration::from_secs(3));
        assert_eq!(options.cache_viewers.get(), 50);
        assert!(options.verbose);
        assert!(!options.no_color);
    }
}
