//! Runs a pattern file without a browser and reports how the population evolves.
//!
//! ```text
//! life_headless glider.rle --generations 200 --export out.json
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The CLI stack is only linked for native targets.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use lifesim::config::LifeConfig;
    use lifesim::Universe;
    use tracing::info;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Pattern file (.rle, .lif, .lif.txt or .json).
        pattern: PathBuf,

        #[arg(short, long, default_value_t = 100)]
        generations: u64,

        /// Log a population summary every N generations (0 disables).
        #[arg(short, long, default_value_t = 10)]
        report_every: u64,

        /// JSON file overriding the default limits.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to save the final board as JSON.
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Virtual surface used to centre the imported pattern.
        #[arg(long, default_value_t = 800)]
        width: u32,

        #[arg(long, default_value_t = 600)]
        height: u32,
    }

    fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LifeConfig> {
        let Some(path) = path else {
            return Ok(LifeConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Ok(LifeConfig::from_json(&text)?)
    }

    pub fn main() -> anyhow::Result<()> {
        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "lifesim=info,life_headless=info".into());
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(filter))
            .with(tracing_subscriber::fmt::layer())
            .init();

        let args = Args::parse();
        let config = load_config(args.config.as_ref())?;
        let mut universe = Universe::with_config(config, args.width, args.height);

        let file_name = args
            .pattern
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = std::fs::read_to_string(&args.pattern)
            .with_context(|| format!("reading pattern {}", args.pattern.display()))?;
        universe.import(&text, &file_name)?;

        let mut peak = universe.board().population();
        for _ in 0..args.generations {
            let stats = universe.step();
            peak = peak.max(stats.population);
            if args.report_every > 0 && universe.generation() % args.report_every == 0 {
                info!(
                    generation = universe.generation(),
                    population = stats.population,
                    bounds = ?universe.board().bounds(),
                    "progress"
                );
            }
            if stats.population == 0 {
                info!(generation = universe.generation(), "population died out");
                break;
            }
        }

        info!(
            generations = universe.generation(),
            population = universe.board().population(),
            peak,
            "run finished"
        );

        if let Some(out) = &args.export {
            std::fs::write(out, universe.export())
                .with_context(|| format!("writing {}", out.display()))?;
            info!(path = %out.display(), "board exported");
        }
        Ok(())
    }
}
