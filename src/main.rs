use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use crate::mtg::api::Fetcher;
use crate::mtg::query::CardQuery;
use crate::platform::Platform;
use crate::render::RenderOptions;

mod mtg;
mod platform;
mod render;

/// Look up Magic: The Gathering cards by name.
///
/// Set MTG_API_HOST (and optionally MTG_API_SCHEME, MTG_API_PATH) to query
/// a mirror instead of api.magicthegathering.io.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Card names to look up. Join alternatives with `|` to match any of them.
    #[arg(default_values = ["Black Lotus", "Opt"])]
    names: Vec<String>,

    /// Only show cards with exactly this name. Repeat to allow several.
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// Show just the first matching card of each response.
    #[arg(long)]
    first: bool,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            allow_list: if self.only.is_empty() {
                None
            } else {
                Some(self.only.iter().cloned().collect::<BTreeSet<_>>())
            },
            first_only: self.first,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let cli = Cli::parse();
    let platform = Platform::detect();
    let config = platform.get_api_config()?;
    info!("querying {}://{}{} ({:?})", config.scheme, config.host, config.path, platform);

    let options = Arc::new(cli.render_options());
    let fetcher = Fetcher::new()?;

    let mut pending = Vec::new();
    for name in &cli.names {
        let url = match CardQuery::for_name(&config, name).to_url() {
            Ok(url) => url,
            Err(e) => {
                error!("skipping {:?}: {}", name, e);
                continue;
            }
        };

        let options = Arc::clone(&options);
        pending.push(fetcher.dispatch(url, move |outcome| {
            let mut block = Vec::new();
            let printed = render::render_outcome(&mut block, &outcome, &options)
                .and_then(|_| io::stdout().lock().write_all(&block));
            if let Err(e) = printed {
                error!("could not print result: {}", e);
            }
        }));
    }

    // Results print as they arrive; this only keeps the runtime alive.
    for handle in pending {
        if let Err(e) = handle.await {
            error!("lookup task failed: {}", e);
        }
    }

    Ok(())
}
