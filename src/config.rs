use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const DEFAULT_SCORING_PARALLELISM: usize = 4;
const DEFAULT_ROUND_DUMP_LIMIT: usize = 10;

pub fn scoring_parallelism() -> usize {
    env_usize("SCORING_PARALLELISM")
        .unwrap_or(DEFAULT_SCORING_PARALLELISM)
        .clamp(1, 32)
}

pub fn round_dump_limit() -> usize {
    env_usize("ROUND_DUMP_LIMIT")
        .unwrap_or(DEFAULT_ROUND_DUMP_LIMIT)
        .clamp(1, 100)
}

/// Run `action` on a pool sized by `SCORING_PARALLELISM`, or inline if the
/// pool can't be built.
pub fn with_scoring_pool<T>(action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = scoring_parallelism();
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

/// Load `.env` and install a fmt subscriber honouring `RUST_LOG`. For binaries only.
pub fn init_tool_env() {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Value of `--flag <path>` or `--flag=<path>` on the command line.
pub fn path_arg(flag: &str) -> Option<PathBuf> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    find_path_arg(&args, flag)
}

fn find_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<usize>().ok())
}
